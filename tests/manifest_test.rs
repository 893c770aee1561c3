//! Tests for manifest loading

use delivery_notify::{
    load_manifest, normalize, read_table, resolve, CanonicalField, HeaderStrategy, LoadOptions,
    ManifestError,
};

const LABELS: [&str; 10] = [
    "Codigo",
    "Cliente",
    "Servicio",
    "Destinatario",
    "Telefono",
    "Direccion",
    "Referencia",
    "Bultos",
    "VisitaEstimada",
    "Estado",
];

/// Build a manifest whose columns follow `order` (indices into LABELS)
fn manifest(order: &[usize], rows: &[[&str; 10]]) -> String {
    let header: Vec<String> = order
        .iter()
        .map(|&i| format!("  {}  ", LABELS[i].to_uppercase()))
        .collect();
    let mut out = format!("Hoja de ruta 2024-05-02\n{}\n", header.join(";"));
    for row in rows {
        let cells: Vec<&str> = order.iter().map(|&i| row[i]).collect();
        out.push_str(&cells.join(";"));
        out.push('\n');
    }
    out
}

const ROW: [&str; 10] = [
    "A1",
    "Tienda Sol",
    "Express",
    "Ana",
    "+54 9 11-12345",
    "Calle 1",
    "Timbre",
    "2",
    "10:00",
    "Pendiente",
];

#[test]
fn test_any_column_order_reads_same_values() {
    // Given: the same row written under several column orders
    let orders: [[usize; 10]; 3] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
        [3, 0, 7, 1, 9, 2, 5, 8, 4, 6],
    ];

    for order in orders {
        // When: loading each manifest
        let text = manifest(&order, &[ROW]);
        let rows = load_manifest(text.as_bytes(), &LoadOptions::new(2)).unwrap();

        // Then: every field reads the value that sits under its label
        assert_eq!(rows.len(), 1);
        for (i, field) in CanonicalField::ALL.iter().enumerate() {
            assert_eq!(rows[0].field(*field), ROW[i], "order {order:?}, field {field}");
        }
    }
}

#[test]
fn test_missing_labels_are_named_exactly() {
    for dropped in [vec![2usize], vec![4, 8], vec![2, 3, 5, 6, 7, 9]] {
        // Given: a header without some labels
        let order: Vec<usize> = (0..10).filter(|i| !dropped.contains(i)).collect();
        let text = manifest(&order, &[ROW]);

        // When / Then: resolution names exactly those labels
        match load_manifest(text.as_bytes(), &LoadOptions::new(2)) {
            Err(ManifestError::MissingColumns(missing)) => {
                let expected: Vec<String> =
                    dropped.iter().map(|&i| LABELS[i].to_string()).collect();
                assert_eq!(missing, expected);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}

#[test]
fn test_no_header_row() {
    let text = "A1;Tienda;Express\nA2;Luna;Normal\n";
    let err = load_manifest(text.as_bytes(), &LoadOptions::new(2)).unwrap_err();
    assert!(matches!(err, ManifestError::HeaderNotFound));
}

#[test]
fn test_header_only_is_empty_not_error() {
    let text = manifest(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], &[]);
    let rows = load_manifest(text.as_bytes(), &LoadOptions::new(2)).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_short_rows_never_fail() {
    let mut text = manifest(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], &[]);
    text.push_str("A9\nA10;Sol;Express\n");

    let rows = load_manifest(text.as_bytes(), &LoadOptions::new(3)).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].code, "A9");
    assert_eq!(rows[0].client, "");
    assert_eq!(rows[1].service, "Express");
    assert_eq!(rows[1].status, "");
    assert!(rows.iter().all(|r| r.delivery_window_hours == 3));
}

#[test]
fn test_renormalizing_is_idempotent() {
    let text = manifest(&[5, 4, 3, 2, 1, 0, 6, 7, 8, 9], &[ROW, ROW]);
    let table = read_table(text.as_bytes()).unwrap();
    let header = resolve(&table, HeaderStrategy::Strict).unwrap();

    let first = normalize(&table, header.row_index, &header.map, 2);
    let second = normalize(&table, header.row_index, &header.map, 2);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_sentinel_strategy_falls_back_to_first_row() {
    // Given: an export whose header is not recognised
    let text = "cod;cli;serv;dest;tel\nA1;Sol;Express;Ana;111\n";
    let options = LoadOptions::new(2).with_strategy(HeaderStrategy::Sentinel);

    // When: loading with the permissive strategy
    let rows = load_manifest(text.as_bytes(), &options).unwrap();

    // Then: row 0 is the header and columns are positional
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].recipient, "Ana");
    assert_eq!(rows[0].phone, "111");
}
