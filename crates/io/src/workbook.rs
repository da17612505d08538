// Request workbook reader (xlsx, xls, ods)
//
// Layout of every worksheet:
//   C3 request date, C4 store, C5 administrator
//   row 8 headers for the identity columns B..I
//   row 9 onward one person per row, uniform quantities in J..AH

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use cargos_core::{column_letter, fold_accents, RawRow, UniformCell};
use chrono::{Duration, NaiveDate};

use crate::error::WorkbookError;

pub const META_REQUEST_DATE: (u32, u32) = (2, 2);
pub const META_STORE: (u32, u32) = (3, 2);
pub const META_ADMINISTRATOR: (u32, u32) = (4, 2);
pub const HEADER_ROW: u32 = 7;
pub const DATA_START_ROW: u32 = 8;
/// Columns B..I.
pub const IDENTITY_COLUMNS: RangeInclusive<u32> = 1..=8;
/// Columns J..AH.
pub const UNIFORM_COLUMNS: RangeInclusive<usize> = 9..=33;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetMetadata {
    pub request_date: Option<String>,
    pub store: Option<String>,
    pub administrator: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreSheet {
    pub name: String,
    pub metadata: SheetMetadata,
    pub rows: Vec<RawRow>,
    pub warnings: Vec<String>,
}

impl StoreSheet {
    /// Store from C4; sheets without one are not processed.
    pub fn store(&self) -> Option<&str> {
        self.metadata.store.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct RequestWorkbook {
    pub path: PathBuf,
    pub sheets: Vec<StoreSheet>,
}

/// Identity columns located by header text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IdentityColumns {
    name: Option<u32>,
    document_id: Option<u32>,
    occupation: Option<u32>,
    upper_size: Option<u32>,
    lower_size: Option<u32>,
}

/// Read every worksheet. `uniform` is the column span holding quantities.
pub fn read_workbook(path: &Path, uniform: RangeInclusive<usize>) -> Result<RequestWorkbook, WorkbookError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(WorkbookError::NoSheets(path.to_path_buf()));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| WorkbookError::Sheet {
                sheet: sheet_name.clone(),
                message: e.to_string(),
            })?;
        let sheet = read_sheet(sheet_name, &range, uniform.clone());
        log::info!(
            "sheet '{}': {} people, {} warning(s)",
            sheet_name,
            sheet.rows.len(),
            sheet.warnings.len()
        );
        sheets.push(sheet);
    }

    Ok(RequestWorkbook {
        path: path.to_path_buf(),
        sheets,
    })
}

/// Parse one worksheet's cells. Never fails; problems become warnings.
pub fn read_sheet(name: &str, range: &Range<Data>, uniform: RangeInclusive<usize>) -> StoreSheet {
    let mut warnings = Vec::new();

    let metadata = SheetMetadata {
        request_date: range.get_value(META_REQUEST_DATE).and_then(cell_text),
        store: range.get_value(META_STORE).and_then(cell_text),
        administrator: range.get_value(META_ADMINISTRATOR).and_then(cell_text),
    };
    if metadata.request_date.is_none() {
        warnings.push("missing request date (C3)".to_string());
    }
    if metadata.store.is_none() {
        warnings.push("missing store (C4)".to_string());
    }
    if metadata.administrator.is_none() {
        warnings.push("missing administrator (C5)".to_string());
    }

    let columns = locate_identity_columns(range);
    let Some(name_col) = columns.name else {
        warnings.push("no name column in header row 8".to_string());
        return StoreSheet {
            name: name.to_string(),
            metadata,
            rows: Vec::new(),
            warnings,
        };
    };
    if columns.document_id.is_none() {
        warnings.push("no DNI column in header row 8".to_string());
    }

    let last_row = range.end().map(|(r, _)| r).unwrap_or(0);
    let text_at = |row: u32, col: Option<u32>| col.and_then(|c| range.get_value((row, c))).and_then(cell_text);

    let mut rows = Vec::new();
    for row in DATA_START_ROW..=last_row {
        let Some(full_name) = text_at(row, Some(name_col)) else {
            continue;
        };
        let row_number = row as usize + 1;

        let document_id = text_at(row, columns.document_id).unwrap_or_default();
        if document_id.is_empty() {
            warnings.push(format!("row {row_number}: {full_name} has no DNI"));
        }

        let mut cells = Vec::new();
        for position in uniform.clone() {
            let Some(cell) = range.get_value((row, position as u32)) else {
                continue;
            };
            match quantity(cell) {
                Ok(Some(q)) if q > 0 => cells.push(UniformCell { position, quantity: q }),
                Ok(_) => {}
                Err(raw) => warnings.push(format!(
                    "row {row_number}, column {}: invalid quantity '{raw}'",
                    column_letter(position)
                )),
            }
        }

        rows.push(RawRow {
            row_number,
            full_name,
            document_id,
            occupation_label: text_at(row, columns.occupation).unwrap_or_default(),
            upper_size: text_at(row, columns.upper_size),
            lower_size: text_at(row, columns.lower_size),
            uniform: cells,
        });
    }

    StoreSheet {
        name: name.to_string(),
        metadata,
        rows,
        warnings,
    }
}

fn locate_identity_columns(range: &Range<Data>) -> IdentityColumns {
    let mut found = IdentityColumns::default();
    for col in IDENTITY_COLUMNS {
        let Some(header) = range.get_value((HEADER_ROW, col)).and_then(cell_text) else {
            continue;
        };
        let header = fold_accents(&header.to_uppercase()).replace('_', " ");
        let slot = if header.contains("TALLA") {
            if header.contains("INFERIOR") || header.contains("PANTALON") {
                &mut found.lower_size
            } else {
                &mut found.upper_size
            }
        } else if header.contains("NOMBRE") {
            &mut found.name
        } else if header.contains("DNI") || header.contains("DOCUMENTO") || header.contains("IDENTIFICACION") {
            &mut found.document_id
        } else if header.contains("CARGO") || header.contains("PUESTO") || header.contains("OCUPACION") {
            &mut found.occupation
        } else {
            continue;
        };
        if slot.is_none() {
            *slot = Some(col);
        }
    }
    found
}

/// Display text of a cell; `None` for blanks.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
    };
    (!text.is_empty()).then_some(text)
}

/// Quantity in a uniform cell. `Err` carries the raw text of a value that is not
/// a whole, non-negative count.
fn quantity(cell: &Data) -> Result<Option<u32>, String> {
    let from_float = |n: f64, raw: String| {
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
            Ok(Some(n as u32))
        } else {
            Err(raw)
        }
    };
    match cell {
        Data::Empty => Ok(None),
        Data::Float(n) => from_float(*n, n.to_string()),
        Data::Int(n) => u32::try_from(*n).map(Some).map_err(|_| n.to_string()),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.replace(',', ".").parse::<f64>() {
                Ok(n) => from_float(n, s.to_string()),
                Err(_) => Err(s.to_string()),
            }
        }
        other => Err(cell_text(other).unwrap_or_default()),
    }
}

/// Excel 1900-system serial to a calendar date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}
