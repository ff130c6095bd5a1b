use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::transaction::{parse_timestamp, FlatTransaction, TransactionType};
use crate::error::ConfigError;

/// Width of the time buckets in the series view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

impl Granularity {
    /// Label of the period containing `ts`.
    ///
    /// Labels sort lexicographically in chronological order: `2024-01-05`,
    /// `2024-01-01/2024-01-07` (Monday to Sunday) and `2024-01`.
    pub fn period_label(&self, ts: NaiveDateTime) -> String {
        let date = ts.date();
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                let end = start + Duration::days(6);
                format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Self::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Self::Day),
            "W" => Ok(Self::Week),
            "M" => Ok(Self::Month),
            _ => Err(ConfigError::Granularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
        })
    }
}

/// Transaction type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    All,
    Credit,
    Debit,
}

impl TypeFilter {
    pub fn matches(&self, tx_type: TransactionType) -> bool {
        match self {
            Self::All => true,
            Self::Credit => tx_type == TransactionType::Credit,
            Self::Debit => tx_type == TransactionType::Debit,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            _ => Err(ConfigError::TransactionType(s.to_string())),
        }
    }
}

/// Parse a date-range bound; offsets are stripped like table timestamps
pub fn parse_date_bound(raw: &str) -> Result<NaiveDateTime, ConfigError> {
    parse_timestamp(raw).ok_or_else(|| ConfigError::Date(raw.to_string()))
}

/// A single change coming from the interactive surface
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    DateChanged {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    CategoryChanged(BTreeSet<String>),
    TypeChanged(TypeFilter),
    GranularityChanged(Granularity),
    /// A slice of the category chart was clicked
    ChartClicked(String),
}

/// Everything the pipeline needs to compute one set of views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    /// Inclusive lower bound
    pub start: NaiveDateTime,
    /// Inclusive upper bound
    pub end: NaiveDateTime,
    /// Empty means no restriction
    pub categories: BTreeSet<String>,
    pub tx_type: TypeFilter,
    /// Overrides `tx_type` and `categories` when set
    pub drill_down: Option<String>,
    pub granularity: Granularity,
}

impl FilterSpec {
    /// Unrestricted spec over `[start, end]` with monthly buckets
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            categories: BTreeSet::new(),
            tx_type: TypeFilter::All,
            drill_down: None,
            granularity: Granularity::Month,
        }
    }

    /// Initial widget state for a table: its full date span, truncated to
    /// midnight on both ends.
    ///
    /// Returns `None` for an empty table.
    pub fn initial(rows: &[FlatTransaction]) -> Option<Self> {
        let min = rows.iter().map(|r| r.timestamp.date()).min()?;
        let max = rows.iter().map(|r| r.timestamp.date()).max()?;
        Some(Self::new(min.and_hms_opt(0, 0, 0)?, max.and_hms_opt(0, 0, 0)?))
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type(mut self, tx_type: TypeFilter) -> Self {
        self.tx_type = tx_type;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_drill_down(mut self, label: impl Into<String>) -> Self {
        self.drill_down = Some(label.into());
        self
    }

    /// Fold one interaction into the filter state.
    ///
    /// A drill-down only survives until the next event: any widget change
    /// clears it, a chart click replaces it.
    pub fn apply(mut self, event: FilterEvent) -> Self {
        match event {
            FilterEvent::ChartClicked(label) => {
                self.drill_down = Some(label);
                return self;
            }
            FilterEvent::DateChanged { start, end } => {
                self.start = start;
                self.end = end;
            }
            FilterEvent::CategoryChanged(categories) => self.categories = categories,
            FilterEvent::TypeChanged(tx_type) => self.tx_type = tx_type,
            FilterEvent::GranularityChanged(granularity) => self.granularity = granularity,
        }
        self.drill_down = None;
        self
    }

    /// Fold events that arrived together into one spec.
    ///
    /// Widget changes apply in order; if any chart click is among them the
    /// last click wins over the widgets, as it would for a lone click.
    pub fn apply_all<I>(self, events: I) -> Self
    where
        I: IntoIterator<Item = FilterEvent>,
    {
        let mut clicked = None;
        let mut spec = self;
        for event in events {
            match event {
                FilterEvent::ChartClicked(label) => clicked = Some(label),
                other => spec = spec.apply(other),
            }
        }
        match clicked {
            Some(label) => spec.apply(FilterEvent::ChartClicked(label)),
            None => spec,
        }
    }
}
