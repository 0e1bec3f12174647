//! Tooltip capture models

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Raw texts read from one bar's hover tooltip. Either field can be
/// missing; a bar whose tooltip never appeared keeps both as None.
#[derive(Debug, Clone, Serialize)]
pub struct TooltipCapture {
    pub plays: Option<String>,
    pub month: Option<String>,
}

/// Hover-derived series for one timeframe, keyed "Bar_1", "Bar_2", … in
/// bar order.
#[derive(Debug, Clone, Serialize)]
pub struct TooltipResult {
    pub data: IndexMap<String, TooltipCapture>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl TooltipResult {
    pub fn empty(source: &str, captured_at: DateTime<Utc>) -> Self {
        Self {
            data: IndexMap::new(),
            source: source.to_string(),
            timestamp: captured_at,
        }
    }
}
