//! Configuration structures for the plant doctor workspace.
//!
//! Every section has defaults, so an empty TOML file (or none at all) gives
//! the stock behaviour.

use crate::error::{Error, Result};
use crate::types::HsvBand;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Plant-likeness screen thresholds
    pub screen: ScreenConfig,
    /// Diagnoser parameters
    pub diagnosis: DiagnosisConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

impl AppConfig {
    /// Validates every section
    pub fn validate(&self) -> Result<()> {
        self.screen.validate()?;
        self.diagnosis.validate()?;
        self.server.validate()?;
        Ok(())
    }
}

/// Colour bands and thresholds for the plant-likeness screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    /// Green fraction that must be exceeded
    pub green_threshold: f64,
    /// Brown fraction that must be exceeded
    pub brown_threshold: f64,
    /// Band counted as leaf green
    pub green: HsvBand,
    /// Band counted as brown/yellow tissue
    pub brown: HsvBand,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            green_threshold: 0.15,
            brown_threshold: 0.20,
            green: HsvBand::green(),
            brown: HsvBand::brown(),
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<()> {
        self.green
            .validate()
            .map_err(|e| Error::Config(format!("screen.green: {e}")))?;
        self.brown
            .validate()
            .map_err(|e| Error::Config(format!("screen.brown: {e}")))?;

        for (name, value) in [
            ("green_threshold", self.green_threshold),
            ("brown_threshold", self.brown_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "screen.{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Parameters of the placeholder diagnoser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Symmetric Dirichlet concentration per label
    pub concentration: f64,
    /// Number of ranked labels to report
    pub top_k: usize,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            concentration: 0.3,
            top_k: 3,
            seed: None,
        }
    }
}

impl DiagnosisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.concentration.is_finite() && self.concentration > 0.0) {
            return Err(Error::Config(format!(
                "diagnosis.concentration must be positive, got {}",
                self.concentration
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Config("diagnosis.top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Largest accepted width or height of a decoded image
    pub max_image_side: u32,
    /// Largest allocation the decoder may make for one image
    pub max_decode_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 10 * 1024 * 1024,
            max_image_side: 8192,
            max_decode_bytes: 128 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(Error::Config(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_image_side == 0 || self.max_decode_bytes == 0 {
            return Err(Error::Config(
                "server.max_image_side and server.max_decode_bytes must be greater than zero"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
