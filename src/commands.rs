use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use wbdash::config::DashboardConfig;
use wbdash::dashboard::{render, DashboardSession};
use wbdash::data::{IndicatorLoader, IndicatorTable};
use wbdash::stats::DeltaCalculator;

use crate::cli::{Cli, DeltasArgs, ExportArgs, ExportFormatArg, SeriesArgs, SummaryArgs};

/// Resolve the config file and apply command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref()).context("load config")?;
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(skip_rows) = cli.skip_rows {
        config.skip_rows = skip_rows;
    }
    if let Some(value_column) = &cli.value_column {
        config.value_column = value_column.clone();
    }
    Ok(config)
}

/// Load the table once for this session. Any schema problem aborts.
pub fn load_table(config: &DashboardConfig) -> Result<IndicatorTable> {
    let source = config.data_source();
    IndicatorLoader::new(config.load_options())
        .load(&source)
        .with_context(|| format!("load indicator table from {source}"))
}

fn start_session(config: &DashboardConfig) -> Result<DashboardSession> {
    let table = load_table(config)?;
    let session = DashboardSession::new(table, config.color_theme)
        .context("start dashboard session")?
        .with_change_threshold(config.change_threshold);
    Ok(session)
}

pub fn run_summary(config: &DashboardConfig, args: &SummaryArgs) -> Result<()> {
    let mut session = start_session(config)?;
    if let Some(year) = args.year {
        session.select_year(year)?;
    }
    if let Some(indicator) = &args.indicator {
        session.select_indicator(indicator)?;
    }
    if let Some(theme) = args.theme {
        session.select_theme(theme);
    }

    let summary = session.summary()?;
    let top = session.top_metrics()?;
    info!(
        year = summary.year,
        indicators = summary.deltas.len(),
        bootstrap = session.is_bootstrap_year(),
        "dashboard summary ready"
    );

    if args.json {
        let value = serde_json::json!({
            "summary": summary,
            "indicator": session.selection().indicator,
            "top_metrics": top,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    render::print_summary(&summary);
    println!();
    println!("Indicator: {}", session.selection().indicator.name);
    println!();
    render::print_top_metrics(&top, args.top);
    Ok(())
}

pub fn run_deltas(config: &DashboardConfig, args: &DeltasArgs) -> Result<()> {
    let table = load_table(config)?;
    let deltas = DeltaCalculator::compute_deltas(&table, args.year)
        .with_context(|| format!("compute deltas for {}", args.year))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deltas)?);
    } else {
        println!("{}", render::deltas_table(&deltas));
    }
    Ok(())
}

pub fn run_years(config: &DashboardConfig) -> Result<()> {
    let session = start_session(config)?;
    for year in session.year_options()? {
        println!("{year}");
    }
    Ok(())
}

pub fn run_indicators(config: &DashboardConfig) -> Result<()> {
    let session = start_session(config)?;
    println!("{}", render::indicators_table(&session.indicator_options()?));
    Ok(())
}

pub fn run_series(config: &DashboardConfig, args: &SeriesArgs) -> Result<()> {
    let mut session = start_session(config)?;
    session.select_indicator(&args.indicator)?;
    let series = session.indicator_series()?;
    println!("{}", session.selection().indicator.name);
    println!("{}", render::series_table(&series));
    Ok(())
}

pub fn run_export(config: &DashboardConfig, args: &ExportArgs) -> Result<()> {
    let table = load_table(config)?;
    let file = File::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    match args.format {
        ExportFormatArg::Csv => table.write_csv(&mut writer)?,
        ExportFormatArg::Json => table.write_json(&mut writer)?,
    }
    writer.flush()?;

    info!(
        path = %args.output.display(),
        rows = table.height(),
        "exported tidy table"
    );
    Ok(())
}
