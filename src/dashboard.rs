use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, DataError, Error};
use crate::models::filter::parse_date_bound;
use crate::models::{FilterEvent, FilterSpec, Views};
use crate::persistence::Dataset;
use crate::pipeline::compute_views;

/// Raw control values as delivered by the interactive surface
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WidgetEvent {
    DateRange { start_date: String, end_date: String },
    Categories { value: Vec<String> },
    Type { value: String },
    Granularity { value: String },
    ChartClick { label: String },
}

impl TryFrom<WidgetEvent> for FilterEvent {
    type Error = ConfigError;

    fn try_from(event: WidgetEvent) -> Result<Self, Self::Error> {
        Ok(match event {
            WidgetEvent::DateRange {
                start_date,
                end_date,
            } => FilterEvent::DateChanged {
                start: parse_date_bound(&start_date)?,
                end: parse_date_bound(&end_date)?,
            },
            WidgetEvent::Categories { value } => FilterEvent::CategoryChanged(value.into_iter().collect()),
            WidgetEvent::Type { value } => FilterEvent::TypeChanged(value.parse()?),
            WidgetEvent::Granularity { value } => FilterEvent::GranularityChanged(value.parse()?),
            WidgetEvent::ChartClick { label } => FilterEvent::ChartClicked(label),
        })
    }
}

/// One interactive session over a loaded table.
///
/// Holds the current filter state and the last views that were computed
/// successfully. Every event recomputes the views from the full table.
#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    spec: FilterSpec,
    views: Views,
}

impl Dashboard {
    /// Start a session with the given filter state
    pub fn new(dataset: Dataset, spec: FilterSpec) -> Result<Self, DataError> {
        let views = compute_views(dataset.rows(), &spec)?;
        Ok(Self {
            dataset,
            spec,
            views,
        })
    }

    /// Start a session with the initial widget state for this table
    pub fn open(dataset: Dataset) -> Result<Self, DataError> {
        let spec = FilterSpec::initial(dataset.rows()).ok_or(DataError::EmptyTable)?;
        Self::new(dataset, spec)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Apply one event and recompute
    pub fn dispatch(&mut self, event: FilterEvent) -> Result<&Views, DataError> {
        self.dispatch_all([event])
    }

    /// Apply events that arrived together, then recompute once.
    ///
    /// If the recomputation fails, both the filter state and the views are
    /// left as they were.
    pub fn dispatch_all<I>(&mut self, events: I) -> Result<&Views, DataError>
    where
        I: IntoIterator<Item = FilterEvent>,
    {
        let spec = self.spec.clone().apply_all(events);
        let views = compute_views(self.dataset.rows(), &spec)?;
        self.spec = spec;
        self.views = views;
        debug!(spec = ?self.spec, "dashboard updated");
        Ok(&self.views)
    }

    /// Parse and apply a raw widget event.
    ///
    /// On a parse or aggregation error nothing changes: the previous views
    /// stay current.
    pub fn dispatch_widget(&mut self, event: WidgetEvent) -> Result<&Views, Error> {
        let event = FilterEvent::try_from(event)?;
        Ok(self.dispatch(event)?)
    }
}
