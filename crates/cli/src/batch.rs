//! `cargos generate` / `cargos check` - price a request workbook and write
//! the per-person and per-store documents.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use cargos_engine::{BatchReport, OccupationOutcome, PersonRecord, Pipeline};
use cargos_io::workbook::UNIFORM_COLUMNS;
use cargos_io::{combine, read_workbook, DocumentRenderer};

use crate::context::{self, TemplateKind};
use crate::exit_codes::{EXIT_CATALOG_INVALID, EXIT_WORKBOOK_UNREADABLE};
use crate::CliError;

/// Priced people of one store, in sheet and row order.
#[derive(Debug)]
pub struct StoreBatch {
    pub store: String,
    pub records: Vec<PersonRecord>,
}

#[derive(Debug)]
pub struct PricedRequest {
    pub stores: Vec<StoreBatch>,
    pub report: BatchReport,
}

impl PricedRequest {
    pub fn records(&self) -> impl Iterator<Item = &PersonRecord> {
        self.stores.iter().flat_map(|s| s.records.iter())
    }
}

/// Where and how documents are written.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub directory: PathBuf,
    pub templates: Vec<(TemplateKind, PathBuf)>,
    pub combine: bool,
    pub date: NaiveDate,
}

/// Price every row of every store sheet. Nothing is written; a column-table
/// fault aborts here, before any output exists.
pub fn price_request(pipeline: &Pipeline<'_>, workbook: &Path) -> Result<PricedRequest, CliError> {
    let scan = pipeline.columns().scan_range(UNIFORM_COLUMNS);
    let request = read_workbook(workbook, scan).map_err(|e| CliError {
        code: EXIT_WORKBOOK_UNREADABLE,
        message: e.to_string(),
        hint: None,
    })?;

    let mut report = BatchReport::new();
    let mut stores: Vec<StoreBatch> = Vec::new();

    for sheet in &request.sheets {
        for warning in &sheet.warnings {
            log::warn!("sheet '{}': {warning}", sheet.name);
            report.sheet_warning(&sheet.name, warning.as_str());
        }
        let Some(store) = sheet.store() else {
            log::warn!("skipping sheet '{}': no store in C4", sheet.name);
            report.skip_sheet(&sheet.name, "no store in C4");
            continue;
        };

        let mut records = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let record = pipeline.price_row(row, store).map_err(|e| CliError {
                code: EXIT_CATALOG_INVALID,
                message: format!("sheet '{}', row {}: {e}", sheet.name, row.row_number),
                hint: Some("the catalog's columns table must name every uniform column".to_string()),
            })?;
            report.record(&record);
            records.push(record);
        }

        match stores.iter_mut().find(|s| s.store == store) {
            Some(existing) => existing.records.extend(records),
            None => stores.push(StoreBatch {
                store: store.to_string(),
                records,
            }),
        }
    }

    Ok(PricedRequest { stores, report })
}

/// Keeps letters, digits, `_`, `-` and spaces, then turns spaces into `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

fn file_stub(record: &PersonRecord) -> String {
    let parts: Vec<&str> = [record.full_name.trim(), record.raw_occupation.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    sanitize_name(&parts.join("_"))
}

/// Render every person's documents, then combine them per store and kind.
/// Failures are recorded on the report and the run continues.
pub fn write_documents(
    priced: &mut PricedRequest,
    plan: &OutputPlan,
    renderer: &dyn DocumentRenderer,
) {
    let report = &mut priced.report;

    for batch in &priced.stores {
        let store_name = sanitize_name(&batch.store);
        let store_dir = plan.directory.join(&store_name);
        let mut written: BTreeMap<TemplateKind, Vec<PathBuf>> = BTreeMap::new();
        let mut person_dirs: HashSet<String> = HashSet::new();

        for record in &batch.records {
            if record.outcome == OccupationOutcome::Review {
                log::warn!(
                    "row {} ({}): occupation '{}' needs review, no documents written",
                    record.row_number,
                    record.full_name,
                    record.raw_occupation
                );
                continue;
            }

            let mut dir_name = sanitize_name(&record.full_name);
            if dir_name.is_empty() || !person_dirs.insert(dir_name.clone()) {
                dir_name = format!("{dir_name}_{}", record.row_number);
                person_dirs.insert(dir_name.clone());
            }
            let person_dir = store_dir.join(&dir_name);
            let stub = file_stub(record);

            for (kind, template) in &plan.templates {
                let output = person_dir.join(format!("{}_{stub}.docx", kind.name()));
                let ctx = context::build(*kind, record, plan.date);
                match renderer.render(template, &ctx, &output) {
                    Ok(()) => {
                        report.documents_written += 1;
                        written.entry(*kind).or_default().push(output);
                    }
                    Err(e) => {
                        log::error!("{}: {e}", output.display());
                        report.output_failure(&batch.store, kind.name(), e.to_string());
                    }
                }
            }
        }

        if !plan.combine {
            continue;
        }
        for (kind, documents) in &written {
            let output = store_dir.join(format!("{}_COMBINED_{store_name}.docx", kind.name()));
            match combine(documents, &output) {
                Ok(()) => report.combined_written += 1,
                Err(e) => {
                    log::error!("combining {} for {}: {e}", kind.name(), batch.store);
                    report.output_failure(&batch.store, kind.name(), e.to_string());
                }
            }
        }
    }
}
