//! Terminal rendering of dashboard views.

use crate::dashboard::format::format_number;
use crate::dashboard::summary::{DashboardSummary, MetricCard, TopMetrics};
use crate::data::{IndicatorRef, TidyObservation};
use crate::stats::YearlyDelta;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Width of the text bar drawn in the top-metrics table.
const BAR_WIDTH: usize = 20;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn align_right(table: &mut Table, index: usize) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

fn delta_cell(delta: f64) -> Cell {
    let cell = Cell::new(format_number(delta));
    if delta > 0.0 {
        cell.fg(Color::Green)
    } else if delta < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn metric_row(kind: &str, card: &MetricCard) -> Vec<Cell> {
    vec![
        Cell::new(kind).add_attribute(Attribute::Bold),
        Cell::new(&card.label),
        Cell::new(&card.value),
        Cell::new(&card.delta),
    ]
}

/// Text bar scaled against `max`; empty for non-positive values.
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max).min(1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

pub fn summary_table(summary: &DashboardSummary) -> Table {
    let mut table = new_table(&["", "Indicator", "Value", "Delta"]);
    table.add_row(metric_row("Growth", &summary.top_gainer));
    table.add_row(metric_row("Decline", &summary.top_decliner));
    align_right(&mut table, 2);
    align_right(&mut table, 3);
    table
}

pub fn print_summary(summary: &DashboardSummary) {
    println!("Year: {}    Theme: {}", summary.year, summary.theme);
    println!();
    println!("Growth/Decline");
    println!("{}", summary_table(summary));
    println!();
    println!("Changes in Indicators");
    println!("  Growth:  {} %", summary.change_share.growth_pct);
    println!("  Decline: {} %", summary.change_share.decline_pct);
}

pub fn deltas_table(deltas: &[YearlyDelta]) -> Table {
    let mut table = new_table(&["Indicator", "Code", "Value", "Delta"]);
    for d in deltas {
        table.add_row(vec![
            Cell::new(&d.indicator_name),
            Cell::new(&d.indicator_code),
            Cell::new(format_number(d.amount)),
            delta_cell(d.delta),
        ]);
    }
    align_right(&mut table, 2);
    align_right(&mut table, 3);
    table
}

pub fn top_metrics_table(top: &TopMetrics, limit: usize) -> Table {
    let max = top.max_amount.unwrap_or(0.0);
    let mut table = new_table(&["Year", "Indicator", "Value", ""]);
    for row in top.rows.iter().take(limit) {
        table.add_row(vec![
            Cell::new(row.year),
            Cell::new(&row.indicator_name),
            Cell::new(format_number(row.amount)),
            Cell::new(progress_bar(row.amount, max)).fg(Color::Cyan),
        ]);
    }
    align_right(&mut table, 2);
    table
}

pub fn print_top_metrics(top: &TopMetrics, limit: usize) {
    println!("Top metrics");
    println!("{}", top_metrics_table(top, limit));
}

pub fn series_table(series: &[TidyObservation]) -> Table {
    let mut table = new_table(&["Year", "Value"]);
    for obs in series {
        table.add_row(vec![Cell::new(obs.year), Cell::new(format_number(obs.amount))]);
    }
    align_right(&mut table, 1);
    table
}

pub fn indicators_table(indicators: &[IndicatorRef]) -> Table {
    let mut table = new_table(&["Code", "Indicator"]);
    for indicator in indicators {
        table.add_row(vec![Cell::new(&indicator.code), Cell::new(&indicator.name)]);
    }
    table
}
