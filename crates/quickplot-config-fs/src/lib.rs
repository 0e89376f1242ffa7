// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for quickplot (uses the platform config dir).
//!
//! Each key is one JSON file: plot defaults live in `defaults.json` under
//! e.g. `~/.config/quickplot`.

use directories::ProjectDirs;
use quickplot_core::config::{ConfigError, ConfigService, ConfigStore, DefaultsPort};
use quickplot_core::PlotDefaults;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store configs as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store rooted at the user config directory (e.g. `~/.config/quickplot`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "quickplot")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Store rooted at an explicit directory (created if missing).
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "config loaded");
                Ok(bytes)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

/// Defaults from the user config directory, or built-ins if the directory
/// cannot be resolved or the file is missing or broken.
pub fn user_defaults() -> PlotDefaults {
    match FsConfigStore::new() {
        Ok(store) => ConfigService::new(store).load_defaults(),
        Err(err) => {
            warn!(%err, "config directory unavailable; using built-in plot defaults");
            PlotDefaults::default()
        }
    }
}
