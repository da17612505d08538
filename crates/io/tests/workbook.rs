use cargos_io::workbook::UNIFORM_COLUMNS;
use cargos_io::{read_workbook, WorkbookError};
use rust_xlsxwriter::Workbook;

fn write_store_sheet(
    workbook: &mut Workbook,
    sheet: &str,
    store: Option<&str>,
    people: &[(&str, &str, &str, &str, Vec<(u16, f64)>)],
) {
    let ws = workbook.add_worksheet();
    ws.set_name(sheet).unwrap();
    ws.write_string(2, 2, "01/03/2025").unwrap();
    if let Some(store) = store {
        ws.write_string(3, 2, store).unwrap();
    }
    ws.write_string(4, 2, "Administrador").unwrap();
    for (col, header) in [(2u16, "NOMBRES Y APELLIDOS"), (3, "DNI"), (4, "CARGO"), (5, "TALLA")] {
        ws.write_string(7, col, header).unwrap();
    }
    for (i, (name, dni, cargo, size, quantities)) in people.iter().enumerate() {
        let row = 8 + i as u32;
        ws.write_string(row, 2, *name).unwrap();
        ws.write_string(row, 3, *dni).unwrap();
        ws.write_string(row, 4, *cargo).unwrap();
        ws.write_string(row, 5, *size).unwrap();
        for (col, qty) in quantities.iter() {
            ws.write_number(row, *col, *qty).unwrap();
        }
    }
}

#[test]
fn reads_every_sheet_of_a_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pedido.xlsx");

    let mut workbook = Workbook::new();
    write_store_sheet(
        &mut workbook,
        "Tarapoto",
        Some("TARAPOTO"),
        &[
            ("PEREZ JUAN", "40404040", "MOZO", "M", vec![(9, 2.0), (13, 1.0)]),
            ("DIAZ ROSA", "41414141", "CAJERA", "S", vec![(10, 3.0)]),
        ],
    );
    write_store_sheet(&mut workbook, "Vacia", None, &[]);
    workbook.save(&path).unwrap();

    let request = read_workbook(&path, UNIFORM_COLUMNS).unwrap();
    assert_eq!(request.sheets.len(), 2);

    let tarapoto = &request.sheets[0];
    assert_eq!(tarapoto.store(), Some("TARAPOTO"));
    assert_eq!(tarapoto.rows.len(), 2);
    let first = &tarapoto.rows[0];
    assert_eq!(first.row_number, 9);
    assert_eq!(first.full_name, "PEREZ JUAN");
    assert_eq!(first.occupation_label, "MOZO");
    assert_eq!(first.upper_size.as_deref(), Some("M"));
    let cells: Vec<(usize, u32)> = first.uniform.iter().map(|c| (c.position, c.quantity)).collect();
    assert_eq!(cells, vec![(9, 2), (13, 1)]);

    let empty = &request.sheets[1];
    assert_eq!(empty.store(), None);
    assert!(empty.warnings.iter().any(|w| w.contains("missing store")));
}

#[test]
fn unreadable_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pedido.xlsx");
    std::fs::write(&path, "not a workbook").unwrap();
    assert!(matches!(
        read_workbook(&path, UNIFORM_COLUMNS),
        Err(WorkbookError::Open { .. })
    ));
}
