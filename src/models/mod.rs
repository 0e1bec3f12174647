//! Data models for the scrape pipeline
//!
//! Decoding intermediates (ticks, calibration, bar geometry) live next to
//! the request/report types they feed. Each model is the output of one
//! pipeline stage.

pub mod catalog;
pub mod chart;
pub mod request;
pub mod series;
pub mod tooltip;

// Re-export commonly used types for convenience
pub use catalog::{ArtistCatalog, TrackPlays};
pub use chart::{AxisTick, BarGeometry, Calibration, LabeledBar};
pub use request::{ExtractionMode, ScrapeRequest};
pub use series::{CombinedReport, SeriesResult, TimeframeOutcome};
pub use tooltip::{TooltipCapture, TooltipResult};
