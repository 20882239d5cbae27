//! Application state shared across tasks.
//!
//! The engine is a plain single-owner struct; every task reaches it through
//! `AppState::monitor`, so ingest, ticks and configuration commands are
//! serialized. Hold the lock only for the engine call, never across an
//! `.await` on the emitter queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use envmon_core::Monitor;

use crate::config::{Config, ConfigError};

/// Shared application state.
pub struct AppState {
    /// The engine (wrapped in Mutex for serialized access).
    pub monitor: Mutex<Monitor>,
    /// Configuration as loaded, updated when changes are persisted.
    pub config: RwLock<Config>,
    /// Where accepted configuration changes are written, if anywhere.
    persist_path: Option<PathBuf>,
}

impl AppState {
    /// Create new application state.
    pub fn new(monitor: Monitor, config: Config, persist_path: Option<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            monitor: Mutex::new(monitor),
            config: RwLock::new(config),
            persist_path,
        })
    }

    /// Path configuration changes are written to.
    pub fn persist_path(&self) -> Option<&Path> {
        self.persist_path.as_deref()
    }

    /// Fold the monitor's runtime settings into the stored configuration
    /// and write it out when persistence is enabled.
    ///
    /// Returns whether the file was written.
    pub async fn persist(&self) -> Result<bool, ConfigError> {
        let snapshot = {
            let monitor = self.monitor.lock().await;
            let mut config = self.config.write().await;
            config.apply_monitor(&monitor);
            config.clone()
        };

        let Some(path) = &self.persist_path else {
            return Ok(false);
        };
        snapshot.save(path)?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(true)
    }
}
