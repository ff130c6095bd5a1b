mod common;

use std::fs::File;

use chrono::{TimeZone, Utc};
use common::{build_csv, credit, debit, fixture_dataset, ids, make_row, ts, FIXTURE};
use finance_dashboard::error::{DataError, Error};
use finance_dashboard::models::{FilterSpec, TransactionType};
use finance_dashboard::persistence::{read_table, write_table, Dataset, HEADER};
use finance_dashboard::{generate_table, views_from_csv};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

#[test]
fn test_round_trip_through_file() {
    let rows = vec![
        credit("a", "2024-01-05 09:15:00", dec!(100.25), "Travel"),
        debit("b", "2024-02-10 14:30:45.5", dec!(9999.99), "Dining Out"),
        make_row("c", "2024-03-01", TransactionType::Debit, None, "Other"),
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movements.csv");
    write_table(File::create(&path).unwrap(), &rows).unwrap();

    let loaded = read_table(File::open(&path).unwrap()).unwrap();
    assert_eq!(loaded, rows);
}

#[test]
fn test_written_header_and_layout() {
    let rows = vec![credit("a", "2024-01-05 09:15:00", dec!(100.25), "Dining Out")];
    let mut output = Vec::new();
    write_table(&mut output, &rows).unwrap();

    let text = String::from_utf8(output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
    assert_eq!(
        lines.next(),
        Some("a,2024-01-05 09:15:00,credit,100.25,Payment for a,Dining Out")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn test_empty_table_keeps_header() {
    let mut output = Vec::new();
    write_table(&mut output, &[]).unwrap();
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "transaction_id,timestamp,type,amount,description,category\n"
    );
}

#[test]
fn test_descriptions_with_delimiters_are_quoted() {
    let mut row = credit("a", "2024-01-05", dec!(1), "Other");
    row.description = "Payment to Ruiz, \"Hermanos\"".to_string();

    let mut output = Vec::new();
    write_table(&mut output, &[row.clone()]).unwrap();
    assert_eq!(read_table(output.as_slice()).unwrap(), vec![row]);
}

#[test]
fn test_generated_table_round_trips() {
    let mut rng = StdRng::seed_from_u64(11);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movements.csv");
    let records = generate_table(&mut rng, 250, now, File::create(&path).unwrap()).unwrap();

    let rows = read_table(File::open(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), records.len());
    for (row, record) in rows.iter().zip(&records) {
        assert_eq!(row.transaction_id, record.id.to_string());
        assert_eq!(row.tx_type, record.tx_type);
        assert_eq!(row.amount, Some(record.amount));
        assert_eq!(row.timestamp, record.created_date.naive_utc());
    }
}

#[test]
fn test_fixture_tolerates_bad_amounts() {
    let dataset = fixture_dataset();
    assert_eq!(dataset.len(), 9);

    let rows = dataset.rows();
    let by_id = |id: &str| rows.iter().find(|r| r.transaction_id == id).unwrap();
    assert_eq!(by_id("tx-006").amount, None);
    assert_eq!(by_id("tx-008").amount, None);
    assert_eq!(by_id("tx-003").amount, Some(dec!(25.50)));
    // offset dropped, wall-clock time kept
    assert_eq!(by_id("tx-007").timestamp, ts("2024-03-01 10:00:00"));
}

#[test]
fn test_dataset_bounds_and_categories() {
    let dataset = fixture_dataset();
    assert_eq!(
        dataset.date_bounds(),
        Some((ts("2024-01-05 09:15:00"), ts("2024-03-31 00:00:00")))
    );
    assert_eq!(
        dataset.categories(),
        vec!["Dining Out", "Groceries", "Housing", "Other", "Travel", "Utilities"]
    );
    assert_eq!(Dataset::new(Vec::new()).date_bounds(), None);
}

#[test]
fn test_unparseable_timestamp_reports_line() {
    let err = read_table(File::open("tests/fixtures/bad_timestamp.csv").unwrap()).unwrap_err();
    match err {
        Error::Data(DataError::Row { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("last tuesday"), "{}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_type_is_data_error() {
    let csv = build_csv(&[("a", "2024-01-01", "refund", "10", "x", "Other")]);
    let err = read_table(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Data(DataError::Row { line: 2, .. })));
}

#[test]
fn test_duplicate_ids_rejected() {
    let csv = build_csv(&[
        ("a", "2024-01-01", "credit", "10", "x", "Other"),
        ("a", "2024-01-02", "debit", "20", "y", "Travel"),
    ]);
    let err = read_table(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Data(DataError::DuplicateId(id)) if id == "a"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Dataset::load("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_views_from_csv() {
    let file = File::open(FIXTURE).unwrap();
    let spec = FilterSpec::new(ts("2024-02-01"), ts("2024-02-29 23:59:59"));
    let views = views_from_csv(file, &spec).unwrap();
    assert_eq!(ids(&views.detail), vec!["tx-004", "tx-005", "tx-006"]);
}
