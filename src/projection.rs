use rand::Rng;

use crate::models::{FlatTransaction, TransactionRecord, CATEGORIES};

/// Uniformly random spending label.
///
/// Labels are synthetic and carry no relation to the record they end up on.
pub fn random_category<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CATEGORIES[rng.random_range(0..CATEGORIES.len())]
}

/// Flatten one record into a table row with the given category
pub fn flatten(record: &TransactionRecord, category: &str) -> FlatTransaction {
    FlatTransaction {
        transaction_id: record.id.to_string(),
        timestamp: record.created_date.naive_utc(),
        tx_type: record.tx_type,
        amount: Some(record.amount),
        description: record.payment_request_display_reference.clone(),
        category: category.to_string(),
    }
}

/// Project records into table rows, in input order, each with a random category
pub fn project<R: Rng + ?Sized>(rng: &mut R, records: &[TransactionRecord]) -> Vec<FlatTransaction> {
    records
        .iter()
        .map(|record| flatten(record, random_category(rng)))
        .collect()
}
