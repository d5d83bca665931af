//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Library code only emits events; the binary calls [`init_logging`] once.
//! Logs go to stderr so table output on stdout stays clean.
//!
//! - `warn`: default, problems only
//! - `info`: source fetch and load counts
//! - `debug`: melt and delta details

use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    pub format: LogFormat,
    pub with_ansi: bool,
    /// Let `RUST_LOG` override `level_filter`.
    pub use_env_filter: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            format: LogFormat::default(),
            with_ansi: true,
            use_env_filter: true,
        }
    }
}

impl LogConfig {
    /// `-q` → error, none → warn, `-v` → info, `-vv` → debug, `-vvv` → trace.
    #[must_use]
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level_filter = if quiet {
            LevelFilter::ERROR
        } else {
            match verbose {
                0 => LevelFilter::WARN,
                1 => LevelFilter::INFO,
                2 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        };
        Self {
            level_filter,
            use_env_filter: verbose == 0 && !quiet,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    let filter = build_env_filter(config);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .without_time()
                        .with_ansi(config.with_ansi)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .without_time()
                        .with_target(false)
                        .with_ansi(config.with_ansi)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || {
        // Dependencies stay at warn
        EnvFilter::new(format!(
            "warn,wbdash={}",
            config.level_filter.to_string().to_lowercase()
        ))
    };
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
