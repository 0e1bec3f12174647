//! Public catalog extraction
//!
//! The public artist page needs no session: a headline listener count and
//! the popular-track list with play counts. Everything here is additive;
//! any failure collapses to an empty or partial catalog.

use std::time::Duration;

use chrono::Utc;
use fantoccini::{Client, Locator};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::models::{ArtistCatalog, TrackPlays};
use crate::services::page_service;
use crate::sites::{CatalogSelectors, SiteProfile};
use crate::utils::{parse_count, ScrapeError};

/// Load the public artist page and decode its catalog. Popups are
/// dismissed and the track list expanded first, each best-effort.
pub async fn load_catalog(
    client: &Client,
    profile: &SiteProfile,
    selectors: &CatalogSelectors,
    url: &str,
) -> Result<ArtistCatalog, ScrapeError> {
    page_service::navigate(client, url, profile.settle_secs).await?;
    dismiss_popups(client, selectors).await;
    expand_track_list(client, selectors).await;
    // Expanding can surface a fresh app popup.
    dismiss_popups(client, selectors).await;
    let markup = client.source().await?;
    Ok(decode_catalog(&markup, selectors, url))
}

async fn dismiss_popups(client: &Client, selectors: &CatalogSelectors) {
    let Ok(buttons) = client.find_all(Locator::Css(selectors.popup_close)).await else {
        return;
    };
    for button in buttons {
        if button.click().await.is_ok() {
            debug!("Dismissed a popup");
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

async fn expand_track_list(client: &Client, selectors: &CatalogSelectors) {
    match client.find(Locator::Css(selectors.show_more)).await {
        Ok(button) => {
            if button.click().await.is_ok() {
                debug!("Expanded the track list");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
        Err(_) => debug!("No track list expander present"),
    }
}

/// Decode the catalog out of captured markup.
pub fn decode_catalog(markup: &str, selectors: &CatalogSelectors, source: &str) -> ArtistCatalog {
    let document = Html::parse_document(markup);
    let monthly_listeners = monthly_listeners(&document, selectors);
    let tracks = tracks(&document, selectors);
    info!(
        "Catalog decoded: {} tracks, monthly listeners {:?}",
        tracks.len(),
        monthly_listeners
    );
    ArtistCatalog {
        monthly_listeners,
        tracks,
        source: source.to_string(),
        timestamp: Utc::now(),
    }
}

/// Headline listener count, found by scanning candidate elements for the
/// "monthly listener" phrase. A non-English page simply yields None.
fn monthly_listeners(document: &Html, selectors: &CatalogSelectors) -> Option<i64> {
    let Ok(selector) = Selector::parse(selectors.monthly_listeners) else {
        warn!("Bad monthly listeners selector: {}", selectors.monthly_listeners);
        return None;
    };
    for node in document.select(&selector) {
        let text: String = node.text().collect();
        if text.to_lowercase().contains("monthly listener") {
            return parse_count(&text);
        }
    }
    None
}

/// Pair track names with play counts positionally. When the two element
/// lists disagree in length the counts cannot be trusted to align, so the
/// names are kept without counts. An unparseable count inside an aligned
/// list keeps its slot as None.
fn tracks(document: &Html, selectors: &CatalogSelectors) -> Vec<TrackPlays> {
    let names = texts(document, selectors.track_names);
    let counts = match Selector::parse(selectors.play_counts) {
        Ok(selector) => document
            .select(&selector)
            .map(|node| parse_count(&node.text().collect::<String>()))
            .collect(),
        Err(_) => {
            warn!("Bad play count selector: {}", selectors.play_counts);
            Vec::new()
        }
    };

    if names.len() == counts.len() {
        names
            .into_iter()
            .zip(counts)
            .map(|(track_name, play_count)| TrackPlays {
                track_name,
                play_count,
            })
            .collect()
    } else {
        warn!(
            "{} track names vs {} play counts, keeping names without counts",
            names.len(),
            counts.len()
        );
        names
            .into_iter()
            .map(|track_name| TrackPlays {
                track_name,
                play_count: None,
            })
            .collect()
    }
}

fn texts(document: &Html, selector_str: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector_str) else {
        warn!("Bad selector: {}", selector_str);
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
