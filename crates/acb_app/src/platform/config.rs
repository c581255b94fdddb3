use std::fs;
use std::path::Path;

use acb_core::DisplayMode;
use acb_engine::SourceSettings;
use acb_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "acb.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub initial_mode: DisplayMode,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub max_file_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_mode: DisplayMode::Table,
            log_destination: LogDestination::File,
            log_level: LevelFilter::Info,
            max_file_bytes: SourceSettings::default().max_bytes,
        }
    }
}

impl AppConfig {
    pub(crate) fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            max_bytes: self.max_file_bytes,
            ..SourceSettings::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Loads the config file; a missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
