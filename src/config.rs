//! Dashboard configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags are applied on top by the binary.

use crate::dashboard::ColorTheme;
use crate::data::{DataSource, LoadOptions, DEFAULT_SKIP_ROWS, DEFAULT_VALUE_COL};
use crate::stats::DEFAULT_CHANGE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// World Bank export for Uganda used when no source is given.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/AwanyDenis/Uganda-WB-Indicator/main/data/API_UGA_DS2_en_csv_v2_93736.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Local path or http(s) URL of the wide indicator CSV.
    pub source: String,
    /// Preamble lines before the header row.
    pub skip_rows: usize,
    /// Name of the measured column ("Amount", "Percentage", ...).
    pub value_column: String,
    /// Absolute delta that counts as growth/decline.
    pub change_threshold: f64,
    pub color_theme: ColorTheme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            skip_rows: DEFAULT_SKIP_ROWS,
            value_column: DEFAULT_VALUE_COL.to_string(),
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            color_theme: ColorTheme::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip_rows: self.skip_rows,
            value_column: self.value_column.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"source": "data/API_UGA.csv", "color_theme": "viridis"}}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source, "data/API_UGA.csv");
        assert_eq!(config.color_theme, ColorTheme::Viridis);
        assert_eq!(config.skip_rows, DEFAULT_SKIP_ROWS);
        assert_eq!(config.value_column, "Amount");
        assert_eq!(config.change_threshold, 50_000.0);
        assert_eq!(
            config.data_source(),
            DataSource::Path(PathBuf::from("data/API_UGA.csv"))
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"sourse": "typo.csv"}}"#).unwrap();

        let result = DashboardConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = DashboardConfig::load(Some(Path::new("/no/such/config.json")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_default_source_is_remote() {
        let config = DashboardConfig::load(None).unwrap();
        assert!(matches!(config.data_source(), DataSource::Url(_)));
        assert_eq!(config.load_options(), LoadOptions::default());
    }
}
