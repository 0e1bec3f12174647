//! Bar decoding
//!
//! Bars are positioned with CSS transforms; the offset against the
//! calibrated baseline is the bar's rendered height. A bar that cannot be
//! decoded keeps its slot with zero height so the series stays aligned
//! with its labels.

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::models::{BarGeometry, Calibration, LabeledBar};
use crate::utils::{parse_count, translate_y};

/// Decode bar heights in document order. The y offset is read from the
/// inline style first, then from the transform attribute.
pub fn decode_bars(markup: &str, bar_selector: &str, calibration: &Calibration) -> Vec<BarGeometry> {
    let Ok(selector) = Selector::parse(bar_selector) else {
        warn!("Bad bar selector: {}", bar_selector);
        return Vec::new();
    };
    let document = Html::parse_document(markup);
    let mut bars = Vec::new();
    for (index, node) in document.select(&selector).enumerate() {
        let offset = node
            .value()
            .attr("style")
            .and_then(translate_y)
            .or_else(|| node.value().attr("transform").and_then(translate_y));
        let height = match offset {
            Some(offset) => calibration.baseline - offset,
            None => {
                debug!(
                    "Bar {} has no decodable transform, keeping zero height",
                    index + 1
                );
                0.0
            }
        };
        bars.push(BarGeometry { height });
    }
    debug!("Decoded {} bars", bars.len());
    bars
}

/// Decode bars whose accessibility labels embed period and count.
/// Malformed labels are skipped entirely; the labeled path carries no
/// positional contract, so a rect that is chart furniture or has an
/// unreadable count simply contributes nothing.
pub fn decode_labeled_bars(markup: &str, bar_selector: &str) -> Vec<LabeledBar> {
    let Ok(selector) = Selector::parse(bar_selector) else {
        warn!("Bad labeled bar selector: {}", bar_selector);
        return Vec::new();
    };
    let document = Html::parse_document(markup);
    let mut bars = Vec::new();
    for node in document.select(&selector) {
        let Some(label) = node.value().attr("aria-label") else {
            continue;
        };
        match parse_bar_label(label) {
            Some(bar) => bars.push(bar),
            None => debug!("Skipping non-series rect: '{}'", label),
        }
    }
    debug!("Decoded {} labeled bars", bars.len());
    bars
}

/// Split "March 3, 2025, 1,234 Streams" into a period label and a count.
/// Labels that do not carry the shape, or whose count is unreadable,
/// yield None.
fn parse_bar_label(label: &str) -> Option<LabeledBar> {
    let stripped = label
        .strip_suffix(" Streams")
        .or_else(|| label.strip_suffix(" Stream"))?;
    let (period, count_text) = stripped.rsplit_once(", ")?;
    let value = parse_count(count_text)?;
    Some(LabeledBar {
        label: period.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{soundcloud, spotify};

    fn geometry_bar_selector() -> &'static str {
        soundcloud::PROFILE.selectors.geometry.unwrap().bars
    }

    fn labeled_bar_selector() -> &'static str {
        spotify::PROFILE.selectors.labeled_bars.unwrap()
    }

    const BAR_CHART: &str = r#"
        <svg>
          <g clip-path="url(#chart-clip)">
            <rect class="MuiBarElement-root" style="transform: translate3d(10px, 150px, 0px);"></rect>
            <rect class="MuiBarElement-root" style="transform: translate3d(30px, 250px, 0px);"></rect>
            <rect class="MuiBarElement-root" style="color: red;"></rect>
            <rect class="MuiBarElement-root" transform="translate(50, 200)"></rect>
          </g>
        </svg>"#;

    #[test]
    fn test_heights_against_baseline_in_document_order() {
        let calibration = Calibration {
            factor: 1.0,
            baseline: 250.0,
        };
        let bars = decode_bars(BAR_CHART, geometry_bar_selector(), &calibration);

        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[1].height, 0.0);
        // Unparseable style keeps the slot with zero height.
        assert_eq!(bars[2].height, 0.0);
        // Transform attribute is the fallback position source.
        assert_eq!(bars[3].height, 50.0);
    }

    #[test]
    fn test_height_is_baseline_minus_offset() {
        let chart = r#"<svg><g clip-path="url(#chart-clip)"><rect class="MuiBarElement-root"
            style="transform: translate3d(100.914286px, 166px, 0px);"></rect></g></svg>"#;
        let calibration = Calibration {
            factor: 1.0,
            baseline: 290.0,
        };
        let bars = decode_bars(chart, geometry_bar_selector(), &calibration);
        assert_eq!(bars, vec![BarGeometry { height: 124.0 }]);
    }

    #[test]
    fn test_rects_outside_clip_group_are_not_bars() {
        // The insights page draws several charts; only rects inside the
        // clipped drawing group belong to the series.
        let chart = r#"
            <svg>
              <g clip-path="url(#chart-clip)">
                <rect class="MuiBarElement-root" style="transform: translate3d(10px, 150px, 0px);"></rect>
                <rect class="MuiBarElement-root" style="transform: translate3d(30px, 200px, 0px);"></rect>
              </g>
              <rect class="MuiBarElement-root" style="transform: translate3d(50px, 100px, 0px);"></rect>
            </svg>"#;
        let calibration = Calibration {
            factor: 1.0,
            baseline: 250.0,
        };
        let bars = decode_bars(chart, geometry_bar_selector(), &calibration);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[1].height, 50.0);
    }

    #[test]
    fn test_no_bars_is_empty_not_error() {
        let bars = decode_bars("<svg></svg>", geometry_bar_selector(), &Calibration::default());
        assert!(bars.is_empty());
    }

    const LABELED_CHART: &str = r#"
        <svg>
          <rect aria-label="March 3, 2025, 1,234 Streams"></rect>
          <rect aria-label="March 4, 2025, 987 Streams"></rect>
          <rect aria-label="Interactive chart"></rect>
          <rect></rect>
          <rect aria-label="March 5, 2025, n/a Streams"></rect>
        </svg>"#;

    #[test]
    fn test_labeled_bars_parse_period_and_count() {
        let bars = decode_labeled_bars(LABELED_CHART, labeled_bar_selector());

        // The furniture rect and the unreadable-count label are dropped.
        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0],
            LabeledBar {
                label: "March 3, 2025".to_string(),
                value: 1234
            }
        );
        assert_eq!(
            bars[1],
            LabeledBar {
                label: "March 4, 2025".to_string(),
                value: 987
            }
        );
    }

    #[test]
    fn test_single_stream_label() {
        assert_eq!(
            parse_bar_label("March 6, 2025, 1 Stream"),
            Some(LabeledBar {
                label: "March 6, 2025".to_string(),
                value: 1
            })
        );
    }

    #[test]
    fn test_monthly_label_keeps_full_period() {
        assert_eq!(
            parse_bar_label("March 2025, 52,103 Streams"),
            Some(LabeledBar {
                label: "March 2025".to_string(),
                value: 52_103
            })
        );
    }
}
