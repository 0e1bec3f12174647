//! Scrape request models

/// How a timeframe's values are recovered from the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Calibrate the value axis and decode bar heights from transforms.
    ChartGeometry,
    /// Bars carry accessibility labels embedding period and count.
    LabeledBars,
    /// Values only appear in a tooltip; hover each bar live.
    TooltipHover,
}

/// One unit of work: a timeframe window rendered at a URL, decoded with
/// the given extraction mode. Requests are built by the site adapters.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Timeframe identifier, used as the report key (e.g. "streams7days").
    pub timeframe: String,
    pub url: String,
    pub mode: ExtractionMode,
}

impl ScrapeRequest {
    pub fn new(timeframe: impl Into<String>, url: impl Into<String>, mode: ExtractionMode) -> Self {
        Self {
            timeframe: timeframe.into(),
            url: url.into(),
            mode,
        }
    }
}
