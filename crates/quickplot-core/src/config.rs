// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for plot defaults.

use crate::defaults::PlotDefaults;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

/// Key under which plot defaults are stored.
pub const DEFAULTS_KEY: &str = "defaults";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// Source of defaults applied to every new plot.
pub trait DefaultsPort {
    /// Defaults to seed a plot with; never fails, falls back to built-ins.
    fn load_defaults(&self) -> PlotDefaults;
}

impl<S: ConfigStore> DefaultsPort for ConfigService<S> {
    fn load_defaults(&self) -> PlotDefaults {
        match self.load::<PlotDefaults>(DEFAULTS_KEY) {
            Ok(Some(defaults)) => defaults.sanitized(),
            Ok(None) => PlotDefaults::default(),
            Err(err) => {
                warn!(%err, "plot defaults unreadable; using built-ins");
                PlotDefaults::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.blobs
                .borrow()
                .get(key)
                .cloned()
                .ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.into(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn missing_defaults_fall_back_to_builtins() {
        let svc = ConfigService::new(MemStore::default());
        assert_eq!(svc.load_defaults(), PlotDefaults::default());
    }

    #[test]
    fn saved_defaults_round_trip() {
        let svc = ConfigService::new(MemStore::default());
        let mut d = PlotDefaults::default();
        d.framerate = 120.0;
        d.connected = true;
        svc.save(DEFAULTS_KEY, &d).unwrap();
        assert_eq!(svc.load_defaults(), d);
    }

    #[test]
    fn garbage_blob_falls_back_to_builtins() {
        let store = MemStore::default();
        store.save_raw(DEFAULTS_KEY, b"{not json").unwrap();
        let svc = ConfigService::new(store);
        assert!(svc.load::<PlotDefaults>(DEFAULTS_KEY).is_err());
        assert_eq!(svc.load_defaults(), PlotDefaults::default());
    }

    #[test]
    fn empty_blob_reads_as_missing() {
        let store = MemStore::default();
        store.save_raw(DEFAULTS_KEY, b"").unwrap();
        let svc = ConfigService::new(store);
        assert!(svc.load::<PlotDefaults>(DEFAULTS_KEY).unwrap().is_none());
    }
}
