//! Application state for the plant doctor server
//!
//! Everything here is read-only after startup. Scan results are returned to
//! the caller and never stored.

use std::sync::Arc;
use std::time::Instant;

use plant_core::AppConfig;
use plant_diagnosis::Scanner;

/// Shared application state
pub struct AppState {
    /// Effective configuration
    pub config: AppConfig,
    /// Screen + diagnoser pipeline
    pub scanner: Scanner,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, scanner: Scanner) -> Self {
        Self {
            config,
            scanner,
            started_at: Instant::now(),
        }
    }

    /// Builds the default pipeline from the configuration
    pub fn from_config(config: AppConfig) -> plant_core::Result<Self> {
        let scanner = Scanner::from_config(&config)?;
        Ok(Self::new(config, scanner))
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
