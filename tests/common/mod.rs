#![allow(dead_code)]

use chrono::NaiveDateTime;
use finance_dashboard::models::transaction::parse_timestamp;
use finance_dashboard::models::{FilterSpec, FlatTransaction, TransactionType};
use finance_dashboard::persistence::{read_table, Dataset};
use rust_decimal::Decimal;

pub const FIXTURE: &str = "tests/fixtures/movements.csv";

/// Parse a timestamp literal, panicking on typos in the test itself
pub fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap_or_else(|| panic!("bad test timestamp '{}'", s))
}

/// Helper to create a table row
pub fn make_row(
    id: &str,
    timestamp: &str,
    tx_type: TransactionType,
    amount: Option<Decimal>,
    category: &str,
) -> FlatTransaction {
    FlatTransaction {
        transaction_id: id.to_string(),
        timestamp: ts(timestamp),
        tx_type,
        amount,
        description: format!("Payment for {}", id),
        category: category.to_string(),
    }
}

pub fn credit(id: &str, timestamp: &str, amount: Decimal, category: &str) -> FlatTransaction {
    make_row(id, timestamp, TransactionType::Credit, Some(amount), category)
}

pub fn debit(id: &str, timestamp: &str, amount: Decimal, category: &str) -> FlatTransaction {
    make_row(id, timestamp, TransactionType::Debit, Some(amount), category)
}

/// Spec covering `[start, end]` with no other restriction
pub fn spec(start: &str, end: &str) -> FilterSpec {
    FilterSpec::new(ts(start), ts(end))
}

pub fn fixture_rows() -> Vec<FlatTransaction> {
    let file = std::fs::File::open(FIXTURE).unwrap();
    read_table(file).unwrap()
}

pub fn fixture_dataset() -> Dataset {
    Dataset::load(FIXTURE).unwrap()
}

pub fn ids(rows: &[FlatTransaction]) -> Vec<&str> {
    rows.iter().map(|r| r.transaction_id.as_str()).collect()
}

/// Build a CSV table from (id, timestamp, type, amount, description, category) tuples
pub fn build_csv(rows: &[(&str, &str, &str, &str, &str, &str)]) -> String {
    let mut csv = String::from("transaction_id,timestamp,type,amount,description,category\n");

    for (id, timestamp, tx_type, amount, description, category) in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            id, timestamp, tx_type, amount, description, category
        ));
    }

    csv
}
