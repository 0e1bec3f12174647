//! Page loading and settle
//!
//! Loading a dashboard means navigation, a fixed render settle, then
//! scrolling until the document height stops changing. Charts below the
//! fold only mount on scroll, so the markup is read strictly after
//! convergence.

use std::time::Duration;

use fantoccini::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::utils::{wait_until_stable, ScrapeError, WaitOptions};

/// Navigate, settle, scroll to convergence and return the final markup.
pub async fn load_settled(
    client: &Client,
    url: &str,
    settle_secs: u64,
    scroll: &WaitOptions,
) -> Result<String, ScrapeError> {
    navigate(client, url, settle_secs).await?;
    scroll_to_bottom(client, scroll).await?;
    let markup = client.source().await?;
    debug!("Captured {} bytes of markup from {}", markup.len(), url);
    Ok(markup)
}

/// Navigate and settle without reading the document, for pages that are
/// interrogated live afterwards.
pub async fn navigate(client: &Client, url: &str, settle_secs: u64) -> Result<(), ScrapeError> {
    info!("Loading {}", url);
    client.goto(url).await.map_err(|e| ScrapeError::LoadTimeout {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    tokio::time::sleep(Duration::from_secs(settle_secs)).await;
    Ok(())
}

/// Scroll to the bottom until two consecutive passes observe the same
/// document height. A page still growing is a page still loading, and
/// reading it early would hand the decoders a half-drawn chart, so this
/// wait only ends on convergence.
async fn scroll_to_bottom(client: &Client, scroll: &WaitOptions) -> Result<(), ScrapeError> {
    let probe_client = client.clone();
    let height = wait_until_stable(scroll, move || {
        let client = probe_client.clone();
        async move {
            client
                .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
                .await?;
            document_height(&client).await
        }
    })
    .await?;
    debug!("Document height converged at {}", height);
    Ok(())
}

async fn document_height(client: &Client) -> Result<i64, ScrapeError> {
    let value: Value = client
        .execute("return document.body.scrollHeight;", vec![])
        .await?;
    Ok(value.as_i64().unwrap_or(0))
}
