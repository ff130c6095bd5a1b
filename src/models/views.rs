use rust_decimal::Decimal;
use serde::Serialize;

use super::transaction::{FlatTransaction, TransactionType};

/// Summed amount for one (period, type) group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Debit spending per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "totals", rename_all = "snake_case")]
pub enum CategoryView {
    /// Sorted by amount, largest first
    Breakdown(Vec<CategoryTotal>),
    /// No debit rows survived the filters
    NoDebitData,
}

impl CategoryView {
    pub fn totals(&self) -> &[CategoryTotal] {
        match self {
            Self::Breakdown(totals) => totals,
            Self::NoDebitData => &[],
        }
    }
}

/// The three outputs of one recomputation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub series: Vec<SeriesPoint>,
    pub categories: CategoryView,
    pub detail: Vec<FlatTransaction>,
}
