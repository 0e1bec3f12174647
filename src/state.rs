//! Persisted session state
//!
//! Cookie snapshots per site id, serialized with serde_json and encrypted
//! at rest so a copied state directory does not hand out live sessions.
//! Every read failure collapses to None and the provider walks the manual
//! login path instead.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::encryption::{decrypt_state, encrypt_state};

/// One captured cookie, reduced to the fields needed to revive a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    /// Expiry as unix seconds. Kept for inspection only; restored cookies
    /// go in as session cookies.
    pub expiry_unix: Option<i64>,
}

/// Encrypted cookie store under a configured directory. Without a key the
/// store is inert: loads yield None and saves are skipped.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    key_hex: Option<String>,
}

impl StateStore {
    pub fn new(dir: PathBuf, key_hex: Option<String>) -> Self {
        Self { dir, key_hex }
    }

    /// Load the cookie snapshot for a site. Missing file, wrong key,
    /// tampered blob and stale schema all yield None, logged at most as a
    /// warning, so the caller falls back to a fresh login.
    pub fn load(&self, site_id: &str) -> Option<Vec<CookieRecord>> {
        let key = self.key_hex.as_deref()?;
        let path = self.blob_path(site_id);
        let blob = match fs::read_to_string(&path) {
            Ok(blob) => blob,
            Err(_) => {
                debug!("No session state at {}", path.display());
                return None;
            }
        };
        let plain = match decrypt_state(blob.trim(), key) {
            Ok(plain) => plain,
            Err(e) => {
                warn!("Could not open session state for {}: {}", site_id, e);
                return None;
            }
        };
        match serde_json::from_str::<Vec<CookieRecord>>(&plain) {
            Ok(cookies) => {
                debug!("Restored {} persisted cookies for {}", cookies.len(), site_id);
                Some(cookies)
            }
            Err(e) => {
                warn!("Session state for {} is unreadable: {}", site_id, e);
                None
            }
        }
    }

    /// Persist a cookie snapshot, best-effort. On any failure the run
    /// continues and the next run logs in manually again.
    pub fn save(&self, site_id: &str, cookies: &[CookieRecord]) {
        let Some(key) = self.key_hex.as_deref() else {
            warn!("No state key configured, not persisting session for {}", site_id);
            return;
        };
        let plain = match serde_json::to_string(cookies) {
            Ok(plain) => plain,
            Err(e) => {
                warn!("Could not serialize session state for {}: {}", site_id, e);
                return;
            }
        };
        let blob = match encrypt_state(&plain, key) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Could not seal session state for {}: {}", site_id, e);
                return;
            }
        };
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("Could not create state dir {}: {}", self.dir.display(), e);
            return;
        }
        let path = self.blob_path(site_id);
        match fs::write(&path, blob) {
            Ok(()) => debug!("Persisted {} cookies to {}", cookies.len(), path.display()),
            Err(e) => warn!("Could not write session state to {}: {}", path.display(), e),
        }
    }

    fn blob_path(&self, site_id: &str) -> PathBuf {
        self.dir.join(format!("{}.state", site_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn sample_cookies() -> Vec<CookieRecord> {
        vec![CookieRecord {
            name: "sid".to_string(),
            value: "abc123".to_string(),
            domain: Some(".example.com".to_string()),
            path: Some("/".to_string()),
            secure: true,
            expiry_unix: Some(1_900_000_000),
        }]
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf(), Some(KEY.to_string()));

        store.save("soundcloud", &sample_cookies());
        let loaded = store.load("soundcloud").unwrap();

        assert_eq!(loaded, sample_cookies());
    }

    #[test]
    fn test_load_missing_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf(), Some(KEY.to_string()));

        assert!(store.load("spotify").is_none());
    }

    #[test]
    fn test_keyless_store_is_inert() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf(), None);

        store.save("soundcloud", &sample_cookies());
        assert!(store.load("soundcloud").is_none());
        assert!(!dir.path().join("soundcloud.state").exists());
    }

    #[test]
    fn test_wrong_key_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf(), Some(KEY.to_string()));
        store.save("soundcloud", &sample_cookies());

        let other_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let reopened = StateStore::new(dir.path().to_path_buf(), Some(other_key.to_string()));
        assert!(reopened.load("soundcloud").is_none());
    }

    #[test]
    fn test_garbage_blob_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("soundcloud.state"), "not base64 at all").unwrap();

        let store = StateStore::new(dir.path().to_path_buf(), Some(KEY.to_string()));
        assert!(store.load("soundcloud").is_none());
    }
}
