//! Configuration loading and persistence.
//!
//! Holds the values the enrollment flow needs at build/config time: where
//! the device registry lives, which VAPID public key to subscribe with, and
//! where the worker script is served. File and environment loading is only
//! available with the `native` feature; the browser binding fills the struct
//! directly.

use serde::{Deserialize, Serialize};

use crate::codec::{KeyCodecError, ServerKey};
use crate::constants;

#[cfg(feature = "native")]
use anyhow::{Context, Result};
#[cfg(all(feature = "native", unix))]
use std::os::unix::fs::PermissionsExt;
#[cfg(feature = "native")]
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Configuration for push enrollment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// API root of the device registry (without trailing `/user/add`).
    pub api_root: String,
    /// VAPID public key, base64url.
    pub vapid_public_key: String,
    /// Path of the background worker script.
    #[serde(default = "default_worker_script")]
    pub worker_script: String,
}

fn default_worker_script() -> String {
    constants::WORKER_SCRIPT_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: constants::DEFAULT_API_ROOT.to_string(),
            vapid_public_key: constants::DEFAULT_VAPID_PUBLIC_KEY.to_string(),
            worker_script: default_worker_script(),
        }
    }
}

impl Config {
    /// Decoded and validated VAPID public key.
    pub fn server_key(&self) -> Result<ServerKey, KeyCodecError> {
        ServerKey::from_base64url(&self.vapid_public_key)
    }
}

#[cfg(feature = "native")]
impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// `PORTAL_PUSH_CONFIG_DIR` overrides the platform config dir.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(dir) = std::env::var("PORTAL_PUSH_CONFIG_DIR") {
            PathBuf::from(dir)
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("portal-push")
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Path of the config file inside [`Config::config_dir`].
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// A missing or unreadable file falls back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable config {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a specific file, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_root) = std::env::var("PORTAL_PUSH_API_ROOT") {
            self.api_root = api_root;
        }

        if let Ok(key) = std::env::var("PORTAL_PUSH_VAPID_PUBLIC_KEY") {
            self.vapid_public_key = key;
        }

        if let Ok(script) = std::env::var("PORTAL_PUSH_WORKER_SCRIPT") {
            self.worker_script = script;
        }
    }

    /// Persists the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        // Owner read/write only
        #[cfg(unix)]
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }
}
