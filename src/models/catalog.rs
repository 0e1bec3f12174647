//! Public artist-page models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One track from the public artist page. Play count is None when the
/// rendered name and count lists disagree in length, or when the count
/// text is unparseable; the name is still kept in position.
#[derive(Debug, Clone, Serialize)]
pub struct TrackPlays {
    pub track_name: String,
    pub play_count: Option<i64>,
}

/// Snapshot of the public artist page: headline listener figure plus the
/// visible track list, in page order.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistCatalog {
    pub monthly_listeners: Option<i64>,
    pub tracks: Vec<TrackPlays>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}
