//! Runtime configuration
//!
//! One value object, loaded from the environment in `main` and passed down
//! into the session provider and orchestrator. Nothing in the pipeline
//! reads the environment directly and there is no process-wide state.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::WaitOptions;

/// Which dashboard the run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Soundcloud,
    Spotify,
}

/// Injected configuration for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub site: SiteKind,
    /// Remote pre-provisioned WebDriver endpoint. None spawns a local
    /// driver process instead.
    pub webdriver_url: Option<String>,
    /// Driver binary for the local variant.
    pub driver_bin: String,
    /// Port the local driver listens on.
    pub driver_port: u16,
    pub headless: bool,
    /// Account/artist identifier substituted into dashboard URLs.
    pub artist_id: Option<String>,
    /// Directory holding persisted session-state blobs.
    pub state_dir: PathBuf,
    /// Hex key for the state blobs. Without it the store is inert.
    pub state_key: Option<String>,
    /// Endpoint readiness probing (bounded).
    pub probe: WaitOptions,
    /// Lazy-load convergence polling cadence. The convergence wait itself
    /// carries no deadline.
    pub scroll: WaitOptions,
    /// Where `main` writes the combined report; stdout when None.
    pub output_path: Option<PathBuf>,
}

impl ScrapeConfig {
    /// Build the configuration from the environment.
    pub fn from_env() -> Result<Self, String> {
        let site = parse_site(
            &std::env::var("STREAMGAUGE_SITE").unwrap_or_else(|_| "soundcloud".to_string()),
        )?;

        let driver_port = match std::env::var("STREAMGAUGE_DRIVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("STREAMGAUGE_DRIVER_PORT is not a port number: {}", raw))?,
            Err(_) => 9515,
        };

        let probe_timeout = secs_var("STREAMGAUGE_PROBE_TIMEOUT_SECS", 30)?;

        Ok(Self {
            site,
            webdriver_url: std::env::var("STREAMGAUGE_WEBDRIVER_URL").ok(),
            driver_bin: std::env::var("STREAMGAUGE_DRIVER_BIN")
                .unwrap_or_else(|_| "chromedriver".to_string()),
            driver_port,
            headless: parse_flag(
                &std::env::var("STREAMGAUGE_HEADLESS").unwrap_or_else(|_| "true".to_string()),
            ),
            artist_id: std::env::var("STREAMGAUGE_ARTIST_ID").ok(),
            state_dir: std::env::var("STREAMGAUGE_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".streamgauge")),
            state_key: std::env::var("STREAMGAUGE_STATE_KEY").ok(),
            probe: WaitOptions {
                timeout: Some(probe_timeout),
                interval: Duration::from_millis(500),
                backoff: 1.5,
                max_interval: Duration::from_secs(5),
            },
            scroll: WaitOptions {
                timeout: None,
                interval: Duration::from_secs(1),
                backoff: 1.0,
                max_interval: Duration::from_secs(1),
            },
            output_path: std::env::var("STREAMGAUGE_OUTPUT").map(PathBuf::from).ok(),
        })
    }
}

fn parse_site(raw: &str) -> Result<SiteKind, String> {
    match raw.to_lowercase().as_str() {
        "soundcloud" => Ok(SiteKind::Soundcloud),
        "spotify" => Ok(SiteKind::Spotify),
        other => Err(format!(
            "Unknown STREAMGAUGE_SITE: '{}'. Supported: soundcloud, spotify",
            other
        )),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn secs_var(name: &str, default: u64) -> Result<Duration, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| format!("{} is not a number of seconds: {}", name, raw)),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site() {
        assert_eq!(parse_site("soundcloud").unwrap(), SiteKind::Soundcloud);
        assert_eq!(parse_site("Spotify").unwrap(), SiteKind::Spotify);
        assert!(parse_site("mixcloud").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" YES "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
