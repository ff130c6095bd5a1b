use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{DataError, Result};
use crate::models::FlatTransaction;

/// Column order of the persisted table
pub const HEADER: [&str; 6] = [
    "transaction_id",
    "timestamp",
    "type",
    "amount",
    "description",
    "category",
];

/// Write rows as CSV with a header line
pub fn write_table<W: Write>(writer: W, rows: &[FlatTransaction]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Written explicitly so an empty table still carries its header
    csv_writer.write_record(HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read every row of a persisted table.
///
/// Unparseable timestamps or types fail the whole read with the offending
/// line; unparseable amounts become `None`.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<FlatTransaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(DataError::EmptyTable.into());
    }
    for column in HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::Row {
                line: 1,
                message: format!("missing column '{}'", column),
            }
            .into());
        }
    }

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for result in csv_reader.deserialize::<FlatTransaction>() {
        let row = result.map_err(|err| DataError::Row {
            line: err.position().map(|p| p.line()).unwrap_or_default(),
            message: row_error_message(&err),
        })?;
        if !seen.insert(row.transaction_id.clone()) {
            return Err(DataError::DuplicateId(row.transaction_id).into());
        }
        rows.push(row);
    }

    Ok(rows)
}

fn row_error_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    }
}

/// Loaded, read-only transaction table shared by every dashboard session
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[FlatTransaction]>,
}

impl Dataset {
    pub fn new(rows: Vec<FlatTransaction>) -> Self {
        Self { rows: rows.into() }
    }

    /// Load a table from CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(read_table(reader)?))
    }

    /// Load a table from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Self::from_reader(File::open(path)?)?;
        info!(path = %path.display(), rows = dataset.len(), "loaded transaction table");
        Ok(dataset)
    }

    pub fn rows(&self) -> &[FlatTransaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest timestamp, `None` for an empty table
    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.rows.iter().map(|r| r.timestamp).min()?;
        let max = self.rows.iter().map(|r| r.timestamp).max()?;
        Some((min, max))
    }

    /// Distinct category labels present, sorted
    pub fn categories(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
