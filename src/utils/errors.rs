use thiserror::Error;

/// Failures that can end one scrape unit.
///
/// Only session and navigation problems are fatal to a unit; every
/// per-tick and per-bar condition is absorbed where it occurs with a safe
/// default (default factor, zero height, synthesized labels). The
/// orchestrator converts unit failures into empty timeframe entries, so
/// none of these ever reach the caller as a fault.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No transport endpoint became reachable within the bounded wait, or
    /// the WebDriver handshake failed.
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    /// Navigation to the target URL failed.
    #[error("page load failed for {url}: {reason}")]
    LoadTimeout { url: String, reason: String },

    /// Bar and label sequences disagreed at assembly. The reconciler
    /// guarantees matching lengths, so seeing this means a reconciliation
    /// bug, not bad input.
    #[error("assembly incomplete: {bars} bars vs {labels} labels")]
    AssemblyIncomplete { bars: usize, labels: usize },

    /// A WebDriver command failed mid-pipeline.
    #[error("webdriver command failed: {0}")]
    Driver(#[from] fantoccini::error::CmdError),
}
