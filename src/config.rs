//! Dashboard Configuration
//! Optional JSON settings file plus a command-line override for the data path.

use crate::charts::ChartKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "sanci_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Source CSV, loaded once per session.
    pub data_path: PathBuf,
    pub title: String,
    pub default_chart: ChartKind,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sanci_health_data.csv"),
            title: "SANC-I: National Health Data Dashboard".to_string(),
            default_chart: ChartKind::Line,
            window_size: [1400.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First positional argument overrides the data path.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        if let Some(path) = args.into_iter().next() {
            self.data_path = PathBuf::from(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let config = DashboardConfig::load(Path::new("/nonexistent/sanci_dashboard.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data_path, PathBuf::from("sanci_health_data.csv"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "data/health.csv", "default_chart": "Bar"}}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/health.csv"));
        assert_eq!(config.default_chart, ChartKind::Bar);
        assert_eq!(config.window_size, DashboardConfig::default().window_size);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn positional_argument_overrides_data_path() {
        let config = DashboardConfig::default().with_args(vec!["other.csv".to_string()]);
        assert_eq!(config.data_path, PathBuf::from("other.csv"));

        let config = DashboardConfig::default().with_args(Vec::new());
        assert_eq!(config.data_path, PathBuf::from("sanci_health_data.csv"));
    }
}
