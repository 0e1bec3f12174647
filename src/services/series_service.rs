//! Series assembly
//!
//! The final stage: pair decoded bars with reconciled labels, scale
//! heights into counts and total them. The headline figure, when the site
//! exposes one, rides along untouched and is never used to correct the
//! series.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::models::{BarGeometry, Calibration, LabeledBar, SeriesResult};
use crate::utils::{parse_count, ScrapeError};

/// Scale each bar by the calibration factor and pair it with its label.
/// Bars and labels must already be reconciled to the same length;
/// anything else is a pipeline bug surfaced as an error.
pub fn assemble(
    timeframe: &str,
    bars: &[BarGeometry],
    labels: &[String],
    calibration: &Calibration,
    hero_total: Option<i64>,
    source: &str,
    captured_at: DateTime<Utc>,
) -> Result<SeriesResult, ScrapeError> {
    if bars.len() != labels.len() {
        return Err(ScrapeError::AssemblyIncomplete {
            bars: bars.len(),
            labels: labels.len(),
        });
    }

    let mut daily = IndexMap::with_capacity(bars.len());
    let mut total = 0i64;
    for (bar, label) in bars.iter().zip(labels) {
        let height = if bar.height < 0.0 {
            warn!(
                "Negative bar height {:.2} under '{}', clamping to zero",
                bar.height, label
            );
            0.0
        } else {
            bar.height
        };
        let value = (height * calibration.factor).round() as i64;
        total += value;
        daily.insert(label.clone(), value);
    }
    debug!(
        "Assembled {}: {} points, total {}",
        timeframe,
        daily.len(),
        total
    );

    Ok(SeriesResult {
        timeframe: timeframe.to_string(),
        timestamp: captured_at,
        total,
        hero_total,
        daily,
        source: source.to_string(),
    })
}

/// Assemble a series whose bars already carry their values.
pub fn assemble_labeled(
    timeframe: &str,
    bars: &[LabeledBar],
    hero_total: Option<i64>,
    source: &str,
    captured_at: DateTime<Utc>,
) -> SeriesResult {
    let mut daily = IndexMap::with_capacity(bars.len());
    let mut total = 0i64;
    for bar in bars {
        total += bar.value;
        daily.insert(bar.label.clone(), bar.value);
    }
    debug!(
        "Assembled {}: {} labeled points, total {}",
        timeframe,
        daily.len(),
        total
    );

    SeriesResult {
        timeframe: timeframe.to_string(),
        timestamp: captured_at,
        total,
        hero_total,
        daily,
        source: source.to_string(),
    }
}

/// Headline total above the chart, reported verbatim alongside the
/// series.
pub fn read_hero_total(markup: &str, hero_selector: &str) -> Option<i64> {
    let Ok(selector) = Selector::parse(hero_selector) else {
        warn!("Bad hero selector: {}", hero_selector);
        return None;
    };
    let document = Html::parse_document(markup);
    let element = document.select(&selector).next()?;
    let text: String = element.text().collect();
    let total = parse_count(&text);
    if total.is_none() {
        debug!("Hero element present but not numeric: '{}'", text.trim());
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::spotify;

    fn heights(values: &[f64]) -> Vec<BarGeometry> {
        values.iter().map(|&height| BarGeometry { height }).collect()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_assemble_scales_and_totals() {
        let calibration = Calibration {
            factor: 2.0,
            baseline: 250.0,
        };
        let result = assemble(
            "streams7days",
            &heights(&[100.0, 0.0, 3.4]),
            &labels(&["Mar 01", "Mar 02", "Mar 03"]),
            &calibration,
            None,
            "https://x.test",
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.total, 207);
        assert_eq!(result.daily["Mar 01"], 200);
        assert_eq!(result.daily["Mar 02"], 0);
        assert_eq!(result.daily["Mar 03"], 7);
        let keys: Vec<_> = result.daily.keys().cloned().collect();
        assert_eq!(keys, vec!["Mar 01", "Mar 02", "Mar 03"]);
    }

    #[test]
    fn test_negative_height_clamps_to_zero() {
        let result = assemble(
            "streams7days",
            &heights(&[-12.5, 10.0]),
            &labels(&["Mar 01", "Mar 02"]),
            &Calibration {
                factor: 1.0,
                baseline: 250.0,
            },
            None,
            "https://x.test",
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.daily["Mar 01"], 0);
        assert_eq!(result.total, 10);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let err = assemble(
            "streams7days",
            &heights(&[1.0, 2.0]),
            &labels(&["Mar 01"]),
            &Calibration::default(),
            None,
            "https://x.test",
            Utc::now(),
        )
        .unwrap_err();

        match err {
            ScrapeError::AssemblyIncomplete { bars, labels } => {
                assert_eq!(bars, 2);
                assert_eq!(labels, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_hero_total_rides_along_unreconciled() {
        let bars = vec![
            LabeledBar {
                label: "March 3, 2025".to_string(),
                value: 1234,
            },
            LabeledBar {
                label: "March 4, 2025".to_string(),
                value: 987,
            },
        ];
        let result = assemble_labeled(
            "streams7days",
            &bars,
            Some(9999),
            "https://x.test",
            Utc::now(),
        );

        // The summed series and the headline figure are reported
        // independently even when they disagree.
        assert_eq!(result.total, 2221);
        assert_eq!(result.hero_total, Some(9999));
    }

    #[test]
    fn test_read_hero_total() {
        let markup = r#"
            <button data-testid="hero-stats-button-streams">
              <p data-encore-id="text">12,345</p>
            </button>"#;
        let selector = spotify::PROFILE.selectors.hero_total.unwrap();
        assert_eq!(read_hero_total(markup, selector), Some(12_345));
    }

    #[test]
    fn test_missing_hero_is_none() {
        let selector = spotify::PROFILE.selectors.hero_total.unwrap();
        assert_eq!(read_hero_total("<div></div>", selector), None);
    }
}
