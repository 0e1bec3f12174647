//! Live tooltip capture
//!
//! Some charts only reveal their values in a hover tooltip. This probe
//! moves the pointer onto every bar in document order and records what
//! the tooltip shows. A bar whose tooltip never materializes stays in the
//! result with empty fields so positions remain aligned with the chart.

use std::time::Duration;

use chrono::Utc;
use fantoccini::actions::{InputSource, MouseActions, PointerAction};
use fantoccini::elements::Element;
use fantoccini::{Client, Locator};
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::models::{TooltipCapture, TooltipResult};
use crate::sites::{SiteProfile, TooltipSelectors};
use crate::utils::ScrapeError;

/// Hover every bar and capture the tooltip contents, keyed "Bar_1",
/// "Bar_2", … in document order.
pub async fn probe_tooltips(
    client: &Client,
    profile: &SiteProfile,
    selectors: &TooltipSelectors,
    source: &str,
) -> Result<TooltipResult, ScrapeError> {
    let bars = client.find_all(Locator::Css(selectors.bars)).await?;
    info!("Hovering {} bars for tooltip capture", bars.len());

    let mut data = IndexMap::with_capacity(bars.len());
    for (index, bar) in bars.iter().enumerate() {
        let capture = match hover_and_read(client, profile, selectors, bar).await {
            Ok(capture) => capture,
            Err(e) => {
                warn!("Tooltip capture failed on bar {}: {}", index + 1, e);
                TooltipCapture {
                    plays: None,
                    month: None,
                }
            }
        };
        data.insert(format!("Bar_{}", index + 1), capture);
    }

    Ok(TooltipResult {
        data,
        source: source.to_string(),
        timestamp: Utc::now(),
    })
}

async fn hover_and_read(
    client: &Client,
    profile: &SiteProfile,
    selectors: &TooltipSelectors,
    bar: &Element,
) -> Result<TooltipCapture, ScrapeError> {
    let hover = MouseActions::new("mouse".to_string()).then(PointerAction::MoveToElement {
        element: bar.clone(),
        duration: Some(Duration::from_millis(200)),
        x: 0,
        y: 0,
    });
    client.perform_actions(hover).await?;
    tokio::time::sleep(Duration::from_millis(profile.tooltip_settle_ms)).await;

    Ok(TooltipCapture {
        plays: read_first_text(client, selectors.value).await,
        month: read_first_text(client, selectors.period).await,
    })
}

/// First matching element's trimmed text, or None when the element is
/// absent or empty.
async fn read_first_text(client: &Client, selector: &str) -> Option<String> {
    let element = client.find(Locator::Css(selector)).await.ok()?;
    let text = element.text().await.ok()?;
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
