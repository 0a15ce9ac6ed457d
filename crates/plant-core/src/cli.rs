//! Shared CLI helpers for workspace binaries.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::{Error, Result};

pub fn setup_cli_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}

pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
}

/// Loads and validates the application config, falling back to defaults
/// when no path is given.
pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_toml_config::<AppConfig>(path)?,
        None => AppConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_app_config_defaults_without_path() {
        let config = load_app_config(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_app_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[diagnosis]\nseed = 7\ntop_k = 2").unwrap();

        let config = load_app_config(Some(file.path())).unwrap();
        assert_eq!(config.diagnosis.seed, Some(7));
        assert_eq!(config.diagnosis.top_k, 2);
    }

    #[test]
    fn test_load_app_config_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[screen]\nbrown_threshold = -0.1").unwrap();

        let err = load_app_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_toml_config::<AppConfig>(Path::new("/nonexistent/plant.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
