//! Runtime configuration.
//!
//! [`AdminConfig`] collects everything the client and the local store need
//! from the environment: the API base URL override, the storage directory of
//! the fallback store and its artificial latency.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_DATA_DIR, ENV_API_BASE_URL, ENV_DATA_DIR, ENV_LATENCY_MS,
    latency,
};
use crate::error::{AdminError, Result};

/// Settings shared by the CLI, the gateway and the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Base URL of the admin REST service.
    pub api_base_url: String,
    /// Directory holding the file-backed local collections.
    pub data_dir: PathBuf,
    /// Artificial latencies of the local store.
    pub latency: StoreLatency,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            latency: StoreLatency::default(),
        }
    }
}

impl AdminConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults. An empty `MF_ADMIN_API_BASE_URL`
    /// counts as unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_owned();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup(ENV_LATENCY_MS) {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                AdminError::InvalidArgument(format!("{ENV_LATENCY_MS} must be an integer, got {ms:?}"))
            })?;
            config.latency = StoreLatency::scaled(ms)?;
        }

        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the storage directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Override the store latency.
    pub fn with_latency(mut self, latency: StoreLatency) -> Self {
        self.latency = latency;
        self
    }
}

/// Delays the local store sleeps for to imitate a remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLatency {
    pub list: Duration,
    pub create: Duration,
    pub clear: Duration,
}

impl Default for StoreLatency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(latency::LIST_MS),
            create: Duration::from_millis(latency::CREATE_MS),
            clear: Duration::from_millis(latency::CLEAR_MS),
        }
    }
}

impl StoreLatency {
    /// No artificial delay at all.
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            create: Duration::ZERO,
            clear: Duration::ZERO,
        }
    }

    /// Keep the default proportions with `list_ms` as the list latency.
    pub fn scaled(list_ms: u64) -> Result<Self> {
        let scale = |ms: u64| {
            ms.checked_mul(list_ms)
                .map(|scaled| Duration::from_millis(scaled / latency::LIST_MS))
                .ok_or_else(|| {
                    AdminError::InvalidArgument(format!("latency of {list_ms} ms is too large"))
                })
        };
        Ok(Self {
            list: Duration::from_millis(list_ms),
            create: scale(latency::CREATE_MS)?,
            clear: scale(latency::CLEAR_MS)?,
        })
    }
}
