//! Persistence of the transit API key.
//!
//! The key lives in its own file (`credentials.toml`) next to the config,
//! under a single fixed key, so the config file can be shared without it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Failed to read credential file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credential file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write credential file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode credentials: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, rename = "tfl_app_key")]
    app_key: Option<String>,
}

/// File-backed store for the single API credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store placed next to the config file in `config_dir`.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join("credentials.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credential. A missing file or key yields an empty value.
    pub fn load(&self) -> Result<SecureString, CredentialStoreError> {
        if !self.path.exists() {
            return Ok(SecureString::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| CredentialStoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: CredentialFile =
            toml::from_str(&content).map_err(|source| CredentialStoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(SecureString::new(file.app_key.unwrap_or_default()))
    }

    /// Persist `credential`, creating the parent directory if needed.
    pub fn save(&self, credential: &SecureString) -> Result<(), CredentialStoreError> {
        let file = CredentialFile {
            app_key: Some(credential.expose().trim().to_string()),
        };
        let content = toml::to_string(&file)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CredentialStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| CredentialStoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), "Saved API credential");
        Ok(())
    }
}
