//! Directory-backed key/value persistence, the localStorage analog.
//!
//! Each key maps to one JSON file. Reads that fail or hold corrupt JSON
//! yield `None`; write failures are logged and swallowed — persistence is a
//! side effect of a store mutation, never an error path.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize local store value");
                return;
            }
        };
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(key, error = %e, "Failed to create local store directory");
            return;
        }
        if let Err(e) = fs::write(self.path(key), json) {
            warn!(key, error = %e, "Failed to write local store value");
        }
    }

    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
