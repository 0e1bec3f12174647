//! SoundCloud artist-insights profile
//!
//! The insights charts expose no per-bar labels, so daily values come from
//! axis-calibrated bar geometry and the 12-month view needs live tooltip
//! hovering.

use chrono::{DateTime, Duration, Utc};

use super::{GeometrySelectors, SiteProfile, SiteSelectors, TooltipSelectors};
use crate::models::{ExtractionMode, ScrapeRequest};

// Scoped to the clipped drawing group; the insights page renders more
// than one chart and stray MuiBarElement rects outside the clip group
// are not series bars.
const BARS: &str = "g[clip-path] rect[class*='MuiBarElement']";

pub const PROFILE: SiteProfile = SiteProfile {
    id: "soundcloud",
    base_url: "https://artists.soundcloud.com",
    login_url: "https://secure.soundcloud.com/signin",
    settle_secs: 10,
    tooltip_settle_ms: 1500,
    selectors: SiteSelectors {
        geometry: Some(GeometrySelectors {
            value_axis_ticks: "g.MuiChartsAxis-directionY g.MuiChartsAxis-tickContainer",
            category_axis: "g.MuiChartsAxis-directionX",
            category_tick_labels: "g.MuiChartsAxis-directionX g.MuiChartsAxis-tickContainer text",
            bars: BARS,
        }),
        labeled_bars: None,
        hero_total: None,
        tooltip: Some(TooltipSelectors {
            bars: BARS,
            value: ".MuiChartsTooltip-root .MuiChartsTooltip-valueCell",
            period: ".MuiChartsTooltip-root .MuiChartsTooltip-labelCell",
        }),
        catalog: None,
    },
};

/// The standard timeframe set: daily streams over the last 7 and 30 days
/// from chart geometry, plus monthly values over 12 months via tooltips.
pub fn default_requests(now: DateTime<Utc>) -> Vec<ScrapeRequest> {
    vec![
        ScrapeRequest::new(
            "streams7days",
            insights_url("DAYS_7", now - Duration::days(7), now, "DAY"),
            ExtractionMode::ChartGeometry,
        ),
        ScrapeRequest::new(
            "streams30days",
            insights_url("DAYS_30", now - Duration::days(30), now, "DAY"),
            ExtractionMode::ChartGeometry,
        ),
        ScrapeRequest::new(
            "tooltip12months",
            insights_url("MONTHS_12", now - Duration::days(365), now, "MONTH"),
            ExtractionMode::TooltipHover,
        ),
    ]
}

/// Insights URL with the range as epoch-millisecond query params. The
/// label reconciler reads the `from` param back when it has to synthesize
/// day labels.
fn insights_url(window: &str, from: DateTime<Utc>, to: DateTime<Utc>, resolution: &str) -> String {
    format!(
        "{}/insights?timewindow={}&from={}&to={}&resolution={}",
        PROFILE.base_url,
        window,
        from.timestamp_millis(),
        to.timestamp_millis(),
        resolution
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_requests_cover_standard_windows() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let requests = default_requests(now);

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].timeframe, "streams7days");
        assert_eq!(requests[0].mode, ExtractionMode::ChartGeometry);
        assert!(requests[0].url.contains("timewindow=DAYS_7"));
        assert!(requests[0].url.contains("resolution=DAY"));
        assert_eq!(requests[1].timeframe, "streams30days");
        assert!(requests[1].url.contains("timewindow=DAYS_30"));
        assert_eq!(requests[2].timeframe, "tooltip12months");
        assert_eq!(requests[2].mode, ExtractionMode::TooltipHover);
        assert!(requests[2].url.contains("resolution=MONTH"));
    }

    #[test]
    fn test_insights_url_carries_epoch_millis_range() {
        let to = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        let from = to - Duration::days(7);
        let url = insights_url("DAYS_7", from, to, "DAY");

        assert!(url.starts_with("https://artists.soundcloud.com/insights?"));
        assert!(url.contains(&format!("from={}", from.timestamp_millis())));
        assert!(url.contains(&format!("to={}", to.timestamp_millis())));
    }
}
