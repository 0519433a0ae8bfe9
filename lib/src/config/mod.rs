// lib/src/config/mod.rs

//! Configuration is compiled-in defaults overlaid by an optional
//! `worklist.toml`. There is no environment source.

pub mod config_defaults;
pub mod config_structs;

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, info};

pub use config_defaults::DEFAULT_CONFIG_FILE;
pub use config_structs::{BoardConfig, LoggingConfig, ServiceConfig, WorklistConfig};

/// Loads configuration from `path`, or from `worklist.toml` in the working
/// directory when `path` is `None`. A missing file yields the defaults; a
/// file that exists but does not parse is an error.
pub fn load_worklist_config(path: Option<&Path>) -> Result<WorklistConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(WorklistConfig::default());
    }

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .build()
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: WorklistConfig = settings
        .try_deserialize()
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::OrderingMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_worklist_config(Some(Path::new("/definitely/not/here.toml"))).unwrap();
        assert_eq!(config, WorklistConfig::default());
        assert_eq!(config.service.base_url, "http://localhost:5001/api");
        assert_eq!(config.board.initial_mode, OrderingMode::Automatic);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let file = write_config(
            "[board]\ninitial_mode = \"manual\"\n\n[service]\nbase_url = \"http://triage:8000\"\n",
        );
        let config = load_worklist_config(Some(file.path())).unwrap();
        assert_eq!(config.board.initial_mode, OrderingMode::Manual);
        assert_eq!(config.board.drag_cancel_timeout_ms, 1500);
        assert_eq!(config.service.base_url, "http://triage:8000");
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("[board]\ninitial_mode = \"sideways\"\n");
        assert!(load_worklist_config(Some(file.path())).is_err());
    }
}
