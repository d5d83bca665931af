//! Data Source Module
//! Reads the raw indicator CSV from a local file or an HTTP(S) URL.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where the wide indicator table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Classify a location string. Anything with an http(s) scheme is a URL.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Fetch the whole resource as text. Blocking, no retries.
    pub fn fetch(&self) -> Result<String, SourceError> {
        match self {
            DataSource::Path(path) => {
                tracing::debug!(path = %path.display(), "reading indicator CSV");
                std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })
            }
            DataSource::Url(url) => {
                tracing::info!(%url, "downloading indicator CSV");
                let http_err = |source| SourceError::Http {
                    url: url.clone(),
                    source,
                };
                reqwest::blocking::get(url.as_str())
                    .and_then(|resp| resp.error_for_status())
                    .and_then(|resp| resp.text())
                    .map_err(http_err)
            }
        }
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("https://example.org/API_UGA_DS2.csv"),
            DataSource::Url("https://example.org/API_UGA_DS2.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/API_UGA_DS2.csv"),
            DataSource::Path(PathBuf::from("data/API_UGA_DS2.csv"))
        );
    }

    #[test]
    fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        assert_eq!(source.fetch().unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_fetch_missing_file_is_io_error() {
        let source = DataSource::parse("/definitely/not/here.csv");
        assert!(matches!(source.fetch(), Err(SourceError::Io { .. })));
    }
}
