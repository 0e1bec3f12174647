//! Browser session provisioning
//!
//! A session is an exclusively owned WebDriver connection with the target
//! site's cookies in place. Local mode spawns one driver process per
//! session on its own port; remote mode attaches to a pre-provisioned
//! endpoint. When no persisted state revives the session, the provider
//! parks the browser on the login page and waits for a human.

use std::process::Stdio;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use chrono::Utc;
use fantoccini::cookies::Cookie;
use fantoccini::{Client, ClientBuilder};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::sites::SiteProfile;
use crate::state::{CookieRecord, StateStore};
use crate::utils::{wait_until, ScrapeError, WaitOptions};

/// How login confirmation reaches the provider.
#[derive(Clone)]
pub enum LoginGate {
    /// Prompt on the terminal and wait for Enter. The lock serializes
    /// prompts when several units hit the login path at once.
    Prompt { lock: Arc<Mutex<()>> },
    /// Wait for an external signal, for embedding behind another frontend.
    Signal(Arc<Notify>),
}

impl LoginGate {
    pub fn prompt() -> Self {
        Self::Prompt {
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn signal(notify: Arc<Notify>) -> Self {
        Self::Signal(notify)
    }
}

/// An exclusively owned browser session. Local sessions also own their
/// driver process.
#[derive(Debug)]
pub struct Session {
    pub client: Client,
    pub site: SiteProfile,
    driver: Option<Child>,
}

/// Hands out ready-to-scrape sessions for one site.
pub struct SessionProvider {
    config: ScrapeConfig,
    store: StateStore,
    gate: LoginGate,
    site: SiteProfile,
    /// Local drivers get driver_port + offset so concurrent sessions
    /// never fight over a port.
    next_port_offset: AtomicU16,
}

impl SessionProvider {
    pub fn new(config: ScrapeConfig, store: StateStore, gate: LoginGate, site: SiteProfile) -> Self {
        Self {
            config,
            store,
            gate,
            site,
            next_port_offset: AtomicU16::new(0),
        }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.site
    }

    pub fn scroll_options(&self) -> WaitOptions {
        self.config.scroll.clone()
    }

    /// Provision a session with the site's cookies in place, walking the
    /// manual login path when no usable persisted state exists.
    pub async fn acquire(&self) -> Result<Session, ScrapeError> {
        let session = self.acquire_anonymous().await?;
        match self.prepare(&session).await {
            Ok(()) => Ok(session),
            Err(e) => {
                release(session).await;
                Err(e)
            }
        }
    }

    /// Provision a bare session without cookie or login handling, enough
    /// for public pages.
    pub async fn acquire_anonymous(&self) -> Result<Session, ScrapeError> {
        let (client, driver) = self.connect().await?;
        Ok(Session {
            client,
            site: self.site,
            driver,
        })
    }

    async fn prepare(&self, session: &Session) -> Result<(), ScrapeError> {
        if self.restore_cookies(session).await? {
            return Ok(());
        }
        self.login(session).await
    }

    async fn connect(&self) -> Result<(Client, Option<Child>), ScrapeError> {
        match &self.config.webdriver_url {
            Some(endpoint) => {
                let endpoint = endpoint.trim_end_matches('/').to_string();
                self.probe_endpoint(&endpoint).await?;
                let client = self.attach(&endpoint).await?;
                info!("Attached to remote WebDriver at {}", endpoint);
                Ok((client, None))
            }
            None => {
                let offset = self.next_port_offset.fetch_add(1, Ordering::Relaxed);
                let port = self.config.driver_port.checked_add(offset).ok_or_else(|| {
                    ScrapeError::SessionUnavailable(format!(
                        "No free driver port above {}",
                        self.config.driver_port
                    ))
                })?;
                let child = Command::new(&self.config.driver_bin)
                    .arg(format!("--port={}", port))
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .kill_on_drop(true)
                    .spawn()
                    .map_err(|e| {
                        ScrapeError::SessionUnavailable(format!(
                            "Could not start {}: {}",
                            self.config.driver_bin, e
                        ))
                    })?;
                let endpoint = format!("http://localhost:{}", port);
                self.probe_endpoint(&endpoint).await?;
                let client = self.attach(&endpoint).await?;
                info!("Started {} session on {}", self.config.driver_bin, endpoint);
                Ok((client, Some(child)))
            }
        }
    }

    /// Bounded readiness probe against the driver's /status endpoint.
    async fn probe_endpoint(&self, endpoint: &str) -> Result<(), ScrapeError> {
        let status_url = format!("{}/status", endpoint);
        let http = reqwest::Client::new();
        let probe_url = status_url.clone();
        let ready = wait_until(&self.config.probe, move || {
            let http = http.clone();
            let url = probe_url.clone();
            async move {
                match http.get(&url).send().await {
                    Ok(response) if response.status().is_success() => Some(()),
                    Ok(response) => {
                        debug!("Endpoint not ready yet: {}", response.status());
                        None
                    }
                    Err(_) => None,
                }
            }
        })
        .await;
        ready.ok_or_else(|| {
            ScrapeError::SessionUnavailable(format!("{} never reported ready", status_url))
        })
    }

    async fn attach(&self, endpoint: &str) -> Result<Client, ScrapeError> {
        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(endpoint)
            .await
            .map_err(|e| ScrapeError::SessionUnavailable(format!("WebDriver handshake failed: {}", e)))
    }

    fn capabilities(&self) -> serde_json::map::Map<String, serde_json::Value> {
        let mut args = vec![
            "--window-size=1440,1000".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        let mut capabilities = serde_json::map::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!({ "args": args }),
        );
        capabilities
    }

    /// Apply persisted cookies, returning whether any took hold. Cookies
    /// can only be set against a loaded origin, so this first navigates
    /// to the site's base URL.
    async fn restore_cookies(&self, session: &Session) -> Result<bool, ScrapeError> {
        let Some(records) = self.store.load(self.site.id) else {
            return Ok(false);
        };
        if records.is_empty() {
            return Ok(false);
        }
        session.client.goto(self.site.base_url).await?;

        let now_unix = Utc::now().timestamp();
        let mut applied = 0usize;
        for record in &records {
            if is_expired(record, now_unix) {
                debug!("Skipping expired cookie {}", record.name);
                continue;
            }
            let mut cookie = Cookie::new(record.name.clone(), record.value.clone());
            if let Some(domain) = &record.domain {
                cookie.set_domain(domain.clone());
            }
            if let Some(path) = &record.path {
                cookie.set_path(path.clone());
            }
            cookie.set_secure(record.secure);
            match session.client.add_cookie(cookie).await {
                Ok(()) => applied += 1,
                Err(e) => debug!("Cookie {} rejected: {}", record.name, e),
            }
        }
        info!(
            "Restored {}/{} persisted cookies for {}",
            applied,
            records.len(),
            self.site.id
        );
        Ok(applied > 0)
    }

    /// Park the browser on the login page, wait for confirmation, then
    /// capture and persist the fresh cookies.
    async fn login(&self, session: &Session) -> Result<(), ScrapeError> {
        match &self.gate {
            LoginGate::Prompt { lock } => {
                let _guard = lock.lock().await;
                // Another unit may have finished logging in while this
                // one waited its turn at the prompt.
                if self.restore_cookies(session).await? {
                    return Ok(());
                }
                session.client.goto(self.site.login_url).await?;
                if !prompt_for_enter(self.site.id).await {
                    return Err(ScrapeError::SessionUnavailable(format!(
                        "{} login not confirmed: stdin closed before Enter",
                        self.site.id
                    )));
                }
            }
            LoginGate::Signal(notify) => {
                session.client.goto(self.site.login_url).await?;
                notify.notified().await;
            }
        }

        let cookies = capture_cookies(&session.client).await?;
        if cookies.is_empty() {
            warn!("No cookies captured after {} login", self.site.id);
        } else {
            self.store.save(self.site.id, &cookies);
        }
        Ok(())
    }
}

/// Close a session, absorbing teardown noise. The driver process, when
/// owned, is killed explicitly rather than left to linger.
pub async fn release(session: Session) {
    let Session {
        client,
        site,
        driver,
    } = session;
    if let Err(e) = client.close().await {
        debug!("Closing {} session reported: {}", site.id, e);
    }
    if let Some(mut child) = driver {
        if let Err(e) = child.kill().await {
            debug!("Driver for {} was already gone: {}", site.id, e);
        }
    }
}

async fn capture_cookies(client: &Client) -> Result<Vec<CookieRecord>, ScrapeError> {
    let cookies = client.get_all_cookies().await?;
    Ok(cookies
        .iter()
        .map(|cookie| CookieRecord {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure().unwrap_or(false),
            expiry_unix: cookie.expires_datetime().map(|t| t.unix_timestamp()),
        })
        .collect())
}

fn is_expired(record: &CookieRecord, now_unix: i64) -> bool {
    matches!(record.expiry_unix, Some(expiry) if expiry <= now_unix)
}

/// Wait for the operator to press Enter. Returns false when stdin
/// produced no confirmation, so a closed stdin cannot wave an
/// unauthenticated session through.
async fn prompt_for_enter(site_id: &str) -> bool {
    info!(
        "Log in to {} in the opened browser window, then press Enter here",
        site_id
    );
    let confirmed = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        confirmation_received(std::io::stdin().read_line(&mut line))
    })
    .await;
    confirmed.unwrap_or(false)
}

/// Only an actual line counts; EOF reads zero bytes and reports Ok.
fn confirmation_received(read: std::io::Result<usize>) -> bool {
    matches!(read, Ok(n) if n > 0)
}
