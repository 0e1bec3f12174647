use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod services;
mod sites;
mod state;
mod utils;

use config::{ScrapeConfig, SiteKind};
use models::TimeframeOutcome;
use services::scrape_service;
use services::session_service::{LoginGate, SessionProvider};
use state::StateStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("streamgauge=debug".parse().unwrap())
            .add_directive("fantoccini=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("streamgauge v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match ScrapeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let now = Utc::now();
    let (profile, requests, catalog_url) = match config.site {
        SiteKind::Soundcloud => (
            sites::soundcloud::PROFILE,
            sites::soundcloud::default_requests(now),
            None,
        ),
        SiteKind::Spotify => {
            let Some(artist_id) = config.artist_id.clone() else {
                error!("STREAMGAUGE_ARTIST_ID is required for the spotify dashboard");
                std::process::exit(1);
            };
            (
                sites::spotify::PROFILE,
                sites::spotify::default_requests(&artist_id, now),
                Some(sites::spotify::catalog_url(&artist_id)),
            )
        }
    };
    info!("Scraping {} across {} timeframes", profile.id, requests.len());

    let store = StateStore::new(config.state_dir.clone(), config.state_key.clone());
    let output_path = config.output_path.clone();
    let provider = Arc::new(SessionProvider::new(
        config,
        store,
        LoginGate::prompt(),
        profile,
    ));

    let mut report = scrape_service::run(provider.clone(), requests).await;
    if let Some(url) = catalog_url {
        if let Some(catalog) = scrape_service::run_catalog(&provider, &url).await {
            report
                .results
                .insert("catalog".to_string(), TimeframeOutcome::Catalog(catalog));
        }
    }

    let rendered = match serde_json::to_string_pretty(&report) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Could not serialize the report: {}", e);
            std::process::exit(1);
        }
    };
    match output_path {
        Some(path) => match std::fs::write(&path, &rendered) {
            Ok(()) => info!("Report written to {}", path.display()),
            Err(e) => {
                error!("Could not write {}: {}", path.display(), e);
                println!("{}", rendered);
            }
        },
        None => println!("{}", rendered),
    }
}
