//! Spotify for Artists profile
//!
//! The audience charts annotate every bar with an accessibility label that
//! already embeds the date and count, so no axis calibration is needed.
//! The public artist page additionally exposes a track catalog without a
//! session.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{CatalogSelectors, SiteProfile, SiteSelectors};
use crate::models::{ExtractionMode, ScrapeRequest};

pub const PROFILE: SiteProfile = SiteProfile {
    id: "spotify",
    base_url: "https://artists.spotify.com",
    login_url: "https://accounts.spotify.com/login",
    settle_secs: 10,
    tooltip_settle_ms: 1500,
    selectors: SiteSelectors {
        geometry: None,
        labeled_bars: Some("rect[aria-label]"),
        hero_total: Some("button[data-testid='hero-stats-button-streams'] p[data-encore-id='text']"),
        tooltip: None,
        catalog: Some(CatalogSelectors {
            // Build-hashed web player classes; these churn with releases.
            track_names: "div.standalone-ellipsis-one-line",
            play_counts: "div.htbmhRXsxePzCR3HsX0V",
            monthly_listeners: "span",
            popup_close: "button[data-testid='cookie-policy-accept'], button[aria-label='Close']",
            show_more: "div.encore-text-body-small-bold[data-encore-id='text']",
        }),
    },
};

/// The standard timeframe set, every window read from labeled bars and
/// anchored on yesterday (the dashboard lags by a day).
pub fn default_requests(artist_id: &str, now: DateTime<Utc>) -> Vec<ScrapeRequest> {
    let yesterday = (now - Duration::days(1)).date_naive();
    vec![
        ScrapeRequest::new(
            "streams7days",
            stats_url(artist_id, yesterday - Duration::days(6), yesterday),
            ExtractionMode::LabeledBars,
        ),
        ScrapeRequest::new(
            "streams28days",
            stats_url(artist_id, yesterday - Duration::days(27), yesterday),
            ExtractionMode::LabeledBars,
        ),
        ScrapeRequest::new(
            "streams12months",
            stats_url(artist_id, yesterday - Duration::days(364), yesterday),
            ExtractionMode::LabeledBars,
        ),
    ]
}

/// Public artist page for the catalog capability; readable without login.
pub fn catalog_url(artist_id: &str) -> String {
    format!("https://open.spotify.com/artist/{}", artist_id)
}

fn stats_url(artist_id: &str, from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "{}/c/artist/{}/audience/stats?fromDate={}&toDate={}&metric=streams&country=&comparisonId=",
        PROFILE.base_url,
        artist_id,
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_requests_anchor_on_yesterday() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let requests = default_requests("4abc", now);

        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.mode, ExtractionMode::LabeledBars);
            assert!(request.url.contains("toDate=2025-03-09"));
            assert!(request.url.contains("/artist/4abc/"));
        }
        assert!(requests[0].url.contains("fromDate=2025-03-03"));
        assert!(requests[1].url.contains("fromDate=2025-02-10"));
        assert_eq!(requests[2].timeframe, "streams12months");
    }

    #[test]
    fn test_stats_url_shape() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let url = stats_url("4abc", from, to);

        assert!(url.starts_with("https://artists.spotify.com/c/artist/4abc/audience/stats?"));
        assert!(url.contains("metric=streams"));
    }

    #[test]
    fn test_catalog_url_targets_public_page() {
        assert_eq!(catalog_url("4abc"), "https://open.spotify.com/artist/4abc");
    }
}
