//! Category label reconciliation
//!
//! Rendered category labels are trusted only when their count matches the
//! bar count exactly; any disagreement swaps the whole set for labels
//! synthesized from the request's time window, so a series is never built
//! on a partially drawn axis.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Render format for synthesized day labels, e.g. "Mar 04".
const LABEL_FORMAT: &str = "%b %d";

/// Read rendered category labels in document order. Scoping to the
/// category-axis group keeps value-axis ticks out of the label set.
pub fn read_labels(markup: &str, label_selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(label_selector) else {
        warn!("Bad label selector: {}", label_selector);
        return Vec::new();
    };
    let document = Html::parse_document(markup);
    document
        .select(&selector)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Trust the rendered labels only on exact count parity; otherwise
/// synthesize one label per bar from the request's time window.
pub fn reconcile(
    labels: Vec<String>,
    bar_count: usize,
    request_url: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    if labels.len() == bar_count {
        return labels;
    }
    warn!(
        "Label count {} does not match bar count {}, synthesizing day labels",
        labels.len(),
        bar_count
    );
    synthesize(bar_count, request_url, now)
}

/// One day label per bar, starting at the window start encoded in the
/// URL, or anchored so the last label lands on today.
fn synthesize(bar_count: usize, request_url: &str, now: DateTime<Utc>) -> Vec<String> {
    let start = window_start(request_url).unwrap_or_else(|| {
        let days_back = bar_count.saturating_sub(1) as i64;
        (now - Duration::days(days_back)).date_naive()
    });
    (0..bar_count)
        .map(|day| {
            (start + Duration::days(day as i64))
                .format(LABEL_FORMAT)
                .to_string()
        })
        .collect()
}

/// Window start from the `from` (or `fromDate`) query parameter.
fn window_start(request_url: &str) -> Option<NaiveDate> {
    let url = Url::parse(request_url).ok()?;
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == "from" || key == "fromDate")
        .map(|(_, value)| value.into_owned())?;
    let start = parse_window_origin(&raw)?;
    debug!("Window start {} taken from request URL", start);
    Some(start)
}

/// Epoch milliseconds or a plain `YYYY-MM-DD` date.
fn parse_window_origin(raw: &str) -> Option<NaiveDate> {
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(|start| start.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
