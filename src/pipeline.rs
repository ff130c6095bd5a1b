use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::DataError;
use crate::models::{
    CategoryTotal, CategoryView, FilterSpec, FlatTransaction, Granularity, SeriesPoint,
    TransactionType, Views,
};

/// Compute all three views for one filter state.
///
/// Pure: the same table and spec always give the same views. Fails only
/// when a group total does not fit in a `Decimal`.
pub fn compute_views(rows: &[FlatTransaction], spec: &FilterSpec) -> Result<Views, DataError> {
    let detail = filter_rows(rows, spec);
    let series = series_view(&detail, spec.granularity)?;
    let categories = category_view(&detail)?;

    debug!(
        total = rows.len(),
        matched = detail.len(),
        periods = series.len(),
        drill_down = spec.drill_down.as_deref().unwrap_or("-"),
        "recomputed views"
    );

    Ok(Views {
        series,
        categories,
        detail,
    })
}

/// Rows that pass the date range and then either the drill-down or the
/// type and category selections.
pub fn filter_rows(rows: &[FlatTransaction], spec: &FilterSpec) -> Vec<FlatTransaction> {
    rows.iter()
        .filter(|row| in_date_range(row, spec))
        .filter(|row| passes_selection(row, spec))
        .cloned()
        .collect()
}

fn in_date_range(row: &FlatTransaction, spec: &FilterSpec) -> bool {
    row.timestamp >= spec.start && row.timestamp <= spec.end
}

fn passes_selection(row: &FlatTransaction, spec: &FilterSpec) -> bool {
    match &spec.drill_down {
        // A chart click forces debit + clicked label, whatever the widgets say
        Some(label) => row.tx_type == TransactionType::Debit && row.category == *label,
        None => {
            spec.tx_type.matches(row.tx_type)
                && (spec.categories.is_empty() || spec.categories.contains(&row.category))
        }
    }
}

/// Add `amount` to a running group total; missing amounts add nothing
fn accumulate(
    total: &mut Decimal,
    amount: Option<Decimal>,
    group: impl FnOnce() -> String,
) -> Result<(), DataError> {
    if let Some(amount) = amount {
        *total = total
            .checked_add(amount)
            .ok_or_else(|| DataError::AmountOverflow(group()))?;
    }
    Ok(())
}

/// Sum amounts per (period, type), ordered by period then type.
///
/// Missing amounts are skipped.
pub fn series_view(
    rows: &[FlatTransaction],
    granularity: Granularity,
) -> Result<Vec<SeriesPoint>, DataError> {
    let mut groups: BTreeMap<(String, TransactionType), Decimal> = BTreeMap::new();
    for row in rows {
        let (period, tx_type) = (granularity.period_label(row.timestamp), row.tx_type);
        let total = groups.entry((period.clone(), tx_type)).or_insert(Decimal::ZERO);
        accumulate(total, row.amount, || format!("period {} ({})", period, tx_type))?;
    }

    Ok(groups
        .into_iter()
        .map(|((period, tx_type), amount)| SeriesPoint {
            period,
            tx_type,
            amount,
        })
        .collect())
}

/// Debit spending per category, largest first.
///
/// Only debit rows count, regardless of the type selection. Ties are broken
/// by category name.
pub fn category_view(rows: &[FlatTransaction]) -> Result<CategoryView, DataError> {
    let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.tx_type == TransactionType::Debit) {
        let total = sums.entry(row.category.as_str()).or_insert(Decimal::ZERO);
        accumulate(total, row.amount, || format!("category {}", row.category))?;
    }

    if sums.is_empty() {
        return Ok(CategoryView::NoDebitData);
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    // stable: equal amounts keep name order
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));

    Ok(CategoryView::Breakdown(totals))
}
