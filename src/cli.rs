//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use wbdash::dashboard::ColorTheme;

#[derive(Parser)]
#[command(
    name = "wbdash",
    version,
    about = "World Bank indicator dashboard",
    long_about = "Load a World Bank wide-format indicator CSV, reshape it to long format\n\
                  and show year-over-year growth/decline for a selected year."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// CSV path or http(s) URL (overrides the config file).
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub source: Option<String>,

    /// JSON config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preamble lines before the CSV header.
    #[arg(long = "skip-rows", global = true)]
    pub skip_rows: Option<usize>,

    /// Name of the measured column (e.g. Amount, Percentage).
    #[arg(long = "value-column", global = true)]
    pub value_column: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Growth/decline cards, change shares and top metrics for a year.
    Summary(SummaryArgs),

    /// Ranked year-over-year deltas for a year.
    Deltas(DeltasArgs),

    /// List the years in the data, latest first.
    Years,

    /// List the indicators in the data.
    Indicators,

    /// Values of one indicator over all years.
    Series(SeriesArgs),

    /// Write the tidy table to a file.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Year to show (default: the earliest year).
    #[arg(long)]
    pub year: Option<i32>,

    /// Indicator code or name to select.
    #[arg(long)]
    pub indicator: Option<String>,

    /// Color theme (overrides the config file).
    #[arg(long, value_enum)]
    pub theme: Option<ColorTheme>,

    /// Rows shown in the top-metrics table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DeltasArgs {
    #[arg(long)]
    pub year: i32,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct SeriesArgs {
    /// Indicator code or name.
    #[arg(long)]
    pub indicator: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
