pub mod config;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod models;
pub mod persistence;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod upstream;

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use error::Result;
use models::{FilterSpec, TransactionRecord, Views};

/// Generate `count` synthetic records, project them and write the table as CSV.
///
/// Returns the full records so callers can keep them as well.
pub fn generate_table<R, W>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
    writer: W,
) -> Result<Vec<TransactionRecord>>
where
    R: Rng + ?Sized,
    W: Write,
{
    let records = generator::generate_records(rng, count, now)?;
    let rows = projection::project(rng, &records);
    persistence::write_table(writer, &rows)?;

    info!(rows = rows.len(), "wrote transaction table");
    Ok(records)
}

/// Read a CSV table and compute the views for one filter state
pub fn views_from_csv<R: Read>(reader: R, spec: &FilterSpec) -> Result<Views> {
    let rows = persistence::read_table(reader)?;
    Ok(pipeline::compute_views(&rows, spec)?)
}
