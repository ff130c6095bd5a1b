use rust_decimal::Decimal;

use crate::models::transaction::TIMESTAMP_FORMAT;
use crate::models::{CategoryView, FlatTransaction, SeriesPoint, Views};
use crate::persistence::HEADER;

pub const NO_SERIES_DATA: &str = "No data for selected range";
pub const NO_DEBIT_DATA: &str = "No debit data";
pub const NO_TRANSACTIONS: &str = "No transactions found";
const SHARE_UNAVAILABLE: &str = "n/a";

/// Left-aligned text table; numeric columns are right-aligned
fn table(header: &[&str], rows: &[Vec<String>], numeric: &[usize]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    let mut line = |cells: &[&str]| {
        let rendered: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if numeric.contains(&i) {
                    format!("{:>w$}", cell, w = widths[i])
                } else {
                    format!("{:<w$}", cell, w = widths[i])
                }
            })
            .collect();
        out.push_str(rendered.join("  ").trim_end());
        out.push('\n');
    };

    line(header);
    line(&separator.iter().map(String::as_str).collect::<Vec<_>>());
    for row in rows {
        line(&row.iter().map(String::as_str).collect::<Vec<_>>());
    }
    out
}

pub fn render_series(series: &[SeriesPoint]) -> String {
    if series.is_empty() {
        return format!("{}\n", NO_SERIES_DATA);
    }
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|p| vec![p.period.clone(), p.tx_type.to_string(), p.amount.to_string()])
        .collect();
    table(&["period", "type", "amount"], &rows, &[2])
}

/// Percentage of `total`, to one decimal place.
///
/// Divides before scaling so large totals stay in range.
fn share_of(amount: Decimal, total: Decimal) -> Option<Decimal> {
    amount
        .checked_div(total)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|s| s.round_dp(1))
}

/// Category totals with their share of all debit spending
pub fn render_categories(view: &CategoryView) -> String {
    let totals = match view {
        CategoryView::NoDebitData => return format!("{}\n", NO_DEBIT_DATA),
        CategoryView::Breakdown(totals) => totals,
    };

    // None when the grand total itself does not fit
    let grand_total = totals
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount));
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| {
            let share = match grand_total {
                Some(total) if total.is_zero() => Some(Decimal::ZERO),
                Some(total) => share_of(t.amount, total),
                None => None,
            };
            let share = share.map_or_else(|| SHARE_UNAVAILABLE.to_string(), |s| format!("{:.1}%", s));
            vec![t.category.clone(), t.amount.to_string(), share]
        })
        .collect();
    table(&["category", "amount", "share"], &rows, &[1, 2])
}

pub fn render_detail(rows: &[FlatTransaction]) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_TRANSACTIONS);
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.transaction_id.clone(),
                r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                r.tx_type.to_string(),
                r.amount.map(|a| a.to_string()).unwrap_or_default(),
                r.description.clone(),
                r.category.clone(),
            ]
        })
        .collect();
    table(&HEADER, &cells, &[3])
}

/// All three views, one titled section each
pub fn render_views(views: &Views) -> String {
    format!(
        "== Credit vs Debit by Selected Period ==\n{}\n== Spending by Category ==\n{}\n== Transactions ==\n{}",
        render_series(&views.series),
        render_categories(&views.categories),
        render_detail(&views.detail)
    )
}
