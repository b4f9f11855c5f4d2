//! Shared configuration storage.
//!
//! The config is loaded once at startup; readers get cheap clones.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// Thread-safe config container with interior mutability.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and path.
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Load the config at `path` and wrap it.
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let config = Config::load_from(&path)?;
        Ok(Self::new(config, path))
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    /// Apply an in-memory override (e.g. from CLI flags).
    pub fn update(&self, f: impl FnOnce(&mut Config)) {
        f(&mut self.inner.write());
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
