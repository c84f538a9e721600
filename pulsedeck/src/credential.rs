//! Session credential: one token persisted under a fixed key in session.json.
//!
//! Read by every request, written only by login/logout and by the client when
//! the backend answers 401.

use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::profiles::config_dir;

pub const STORAGE_KEY: &str = "letto_auth_token";

pub fn session_path() -> PathBuf {
    config_dir().join("session.json")
}

#[derive(Clone, Debug)]
pub struct CredentialStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    path: Option<PathBuf>,
    token: Option<String>,
}

impl CredentialStore {
    /// Load from `path`; a missing or malformed file means "logged out".
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = read_token(&path);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                path: Some(path),
                token,
            })),
        }
    }

    /// Store that never touches disk.
    pub fn in_memory(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { path: None, token })),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn is_present(&self) -> bool {
        self.lock().token.is_some()
    }

    pub fn store(&self, token: &str) -> std::io::Result<()> {
        let mut inner = self.lock();
        inner.token = Some(token.to_string());
        match inner.path.as_deref() {
            Some(p) => write_token(p, Some(token)),
            None => Ok(()),
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.token = None;
        if let Some(p) = inner.path.as_deref() {
            if let Err(e) = write_token(p, None) {
                tracing::warn!(error = %e, "failed to clear stored credential");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn read_token(path: &Path) -> Option<String> {
    let s = fs::read_to_string(path).ok()?;
    let map: Map<String, Value> = serde_json::from_str(&s).ok()?;
    map.get(STORAGE_KEY)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn write_token(path: &Path, token: Option<&str>) -> std::io::Result<()> {
    // keep whatever else lives in the file
    let mut map: Map<String, Value> = fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();
    match token {
        Some(t) => {
            map.insert(STORAGE_KEY.into(), Value::String(t.into()));
        }
        None => {
            map.remove(STORAGE_KEY);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(&map)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_survives_reload_and_clear_removes() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("session.json");
        let store = CredentialStore::load(&path);
        assert!(!store.is_present());
        store.store("123456").unwrap();

        let reloaded = CredentialStore::load(&path);
        assert_eq!(reloaded.get().as_deref(), Some("123456"));

        reloaded.clear();
        assert!(CredentialStore::load(&path).get().is_none());
    }

    #[test]
    fn clones_share_state() {
        let a = CredentialStore::in_memory(Some("k".into()));
        let b = a.clone();
        b.clear();
        assert!(a.get().is_none());
    }
}
