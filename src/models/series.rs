//! Series and report models
//!
//! These are the only entities that outlive a scrape call; everything else
//! is derived per invocation and discarded after assembly.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::catalog::ArtistCatalog;
use super::tooltip::TooltipResult;

/// One decoded timeframe: an ordered label→count series with its totals.
/// Insertion order of `daily` is bar order, which is chronological order.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesResult {
    pub timeframe: String,
    pub timestamp: DateTime<Utc>,
    /// Sum of the decoded per-period values.
    pub total: i64,
    /// Independently rendered headline figure, when the site exposes one.
    /// Never reconciled against `total`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_total: Option<i64>,
    pub daily: IndexMap<String, i64>,
    pub source: String,
}

impl SeriesResult {
    /// Structurally complete result carrying no data, used when a unit
    /// fails before assembly. Absence is empty fields, never a fault.
    pub fn empty(timeframe: &str, source: &str, captured_at: DateTime<Utc>) -> Self {
        Self {
            timeframe: timeframe.to_string(),
            timestamp: captured_at,
            total: 0,
            hero_total: None,
            daily: IndexMap::new(),
            source: source.to_string(),
        }
    }
}

/// What one concurrent unit produced for its timeframe.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TimeframeOutcome {
    Series(SeriesResult),
    Tooltip(TooltipResult),
    Catalog(ArtistCatalog),
}

/// Everything the caller gets back: one entry per requested timeframe,
/// keyed by timeframe identifier, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub results: IndexMap<String, TimeframeOutcome>,
}
