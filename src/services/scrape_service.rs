//! Scrape orchestration
//!
//! One task per requested timeframe, each exclusively owning its own
//! session. Units never share browser state, a unit failure degrades that
//! timeframe to an empty outcome, and the merge happens after a join
//! barrier in request order.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::models::{
    ArtistCatalog, CombinedReport, ExtractionMode, ScrapeRequest, SeriesResult, TimeframeOutcome,
    TooltipResult,
};
use crate::services::session_service::{self, Session, SessionProvider};
use crate::services::{
    axis_service, bar_service, catalog_service, label_service, page_service, series_service,
    tooltip_service,
};
use crate::utils::{ScrapeError, WaitOptions};

/// Run every requested timeframe concurrently and merge the outcomes in
/// request order. This never fails as a whole: the worst case is a report
/// full of empty outcomes.
pub async fn run(provider: Arc<SessionProvider>, requests: Vec<ScrapeRequest>) -> CombinedReport {
    info!("Starting scrape run with {} timeframes", requests.len());

    let mut handles = Vec::with_capacity(requests.len());
    for request in requests {
        let provider = provider.clone();
        let key = (request.timeframe.clone(), request.mode, request.url.clone());
        handles.push((
            key,
            tokio::spawn(async move { run_unit(provider, request).await }),
        ));
    }

    let mut results = IndexMap::with_capacity(handles.len());
    for ((timeframe, mode, url), handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Unit task for {} aborted: {}", timeframe, e);
                empty_outcome(&timeframe, mode, &url)
            }
        };
        results.insert(timeframe, outcome);
    }

    CombinedReport {
        timestamp: Utc::now(),
        results,
    }
}

/// Fetch the public catalog with a dedicated anonymous session. Additive:
/// any failure collapses to None and never touches the main report.
pub async fn run_catalog(provider: &SessionProvider, url: &str) -> Option<ArtistCatalog> {
    let profile = *provider.profile();
    let selectors = profile.selectors.catalog?;

    let session = match provider.acquire_anonymous().await {
        Ok(session) => session,
        Err(e) => {
            warn!("Catalog session unavailable: {}", e);
            return None;
        }
    };
    let result = catalog_service::load_catalog(&session.client, &profile, &selectors, url).await;
    session_service::release(session).await;

    match result {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("Catalog extraction failed: {}", e);
            None
        }
    }
}

/// One unit: acquire a session, drive the pipeline, always release. Any
/// error degrades this timeframe alone to an empty outcome.
async fn run_unit(provider: Arc<SessionProvider>, request: ScrapeRequest) -> TimeframeOutcome {
    let scroll = provider.scroll_options();
    let outcome = async {
        let session = provider.acquire().await?;
        let outcome = drive_session(&session, &request, &scroll).await;
        session_service::release(session).await;
        outcome
    }
    .await;

    match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Timeframe {} degraded to empty: {}", request.timeframe, e);
            empty_outcome(&request.timeframe, request.mode, &request.url)
        }
    }
}

/// Sequential pipeline stages for one timeframe, dispatched on the
/// request's extraction mode.
async fn drive_session(
    session: &Session,
    request: &ScrapeRequest,
    scroll: &WaitOptions,
) -> Result<TimeframeOutcome, ScrapeError> {
    let profile = session.site;
    match request.mode {
        ExtractionMode::ChartGeometry => {
            let Some(geometry) = profile.selectors.geometry else {
                warn!("{} exposes no chart geometry, degrading {}", profile.id, request.timeframe);
                return Ok(empty_outcome(&request.timeframe, request.mode, &request.url));
            };
            let markup = page_service::load_settled(
                &session.client,
                &request.url,
                profile.settle_secs,
                scroll,
            )
            .await?;

            let calibration = axis_service::calibrate_chart(&markup, &geometry);
            let bars = bar_service::decode_bars(&markup, geometry.bars, &calibration);
            let labels = label_service::read_labels(&markup, geometry.category_tick_labels);
            let labels = label_service::reconcile(labels, bars.len(), &request.url, Utc::now());
            let hero = profile
                .selectors
                .hero_total
                .and_then(|selector| series_service::read_hero_total(&markup, selector));
            let series = series_service::assemble(
                &request.timeframe,
                &bars,
                &labels,
                &calibration,
                hero,
                &request.url,
                Utc::now(),
            )?;
            Ok(TimeframeOutcome::Series(series))
        }
        ExtractionMode::LabeledBars => {
            let Some(selector) = profile.selectors.labeled_bars else {
                warn!("{} exposes no labeled bars, degrading {}", profile.id, request.timeframe);
                return Ok(empty_outcome(&request.timeframe, request.mode, &request.url));
            };
            let markup = page_service::load_settled(
                &session.client,
                &request.url,
                profile.settle_secs,
                scroll,
            )
            .await?;

            let bars = bar_service::decode_labeled_bars(&markup, selector);
            let hero = profile
                .selectors
                .hero_total
                .and_then(|hero_selector| series_service::read_hero_total(&markup, hero_selector));
            let series = series_service::assemble_labeled(
                &request.timeframe,
                &bars,
                hero,
                &request.url,
                Utc::now(),
            );
            Ok(TimeframeOutcome::Series(series))
        }
        ExtractionMode::TooltipHover => {
            let Some(tooltip) = profile.selectors.tooltip else {
                warn!("{} exposes no tooltips, degrading {}", profile.id, request.timeframe);
                return Ok(empty_outcome(&request.timeframe, request.mode, &request.url));
            };
            page_service::navigate(&session.client, &request.url, profile.settle_secs).await?;
            let result =
                tooltip_service::probe_tooltips(&session.client, &profile, &tooltip, &request.url)
                    .await?;
            Ok(TimeframeOutcome::Tooltip(result))
        }
    }
}

/// The degraded shape for one timeframe: structurally valid, zero data.
fn empty_outcome(timeframe: &str, mode: ExtractionMode, url: &str) -> TimeframeOutcome {
    match mode {
        ExtractionMode::TooltipHover => {
            TimeframeOutcome::Tooltip(TooltipResult::empty(url, Utc::now()))
        }
        _ => TimeframeOutcome::Series(SeriesResult::empty(timeframe, url, Utc::now())),
    }
}
