//! Derived values handed to the presentation layer for one year selection.

use crate::dashboard::format::format_number;
use crate::dashboard::theme::ColorTheme;
use crate::data::TidyObservation;
use crate::stats::{ChangeShare, DeltaCalculator, YearlyDelta};
use serde::Serialize;

/// A metric card: label, formatted value and formatted delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: String,
}

impl MetricCard {
    /// Shown when the selected year has no prior year.
    pub fn placeholder() -> Self {
        Self {
            label: "-".to_string(),
            value: "-".to_string(),
            delta: String::new(),
        }
    }

    pub fn from_delta(delta: &YearlyDelta) -> Self {
        Self {
            label: delta.indicator_name.clone(),
            value: format_number(delta.amount),
            delta: format_number(delta.delta),
        }
    }
}

/// Growth/decline column of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub year: i32,
    pub theme: ColorTheme,
    pub top_gainer: MetricCard,
    pub top_decliner: MetricCard,
    pub change_share: ChangeShare,
    /// Ranked deltas; empty for the bootstrap year.
    pub deltas: Vec<YearlyDelta>,
}

impl DashboardSummary {
    /// Summary built from ranked deltas.
    pub fn from_deltas(
        year: i32,
        theme: ColorTheme,
        deltas: Vec<YearlyDelta>,
        threshold: f64,
    ) -> Self {
        let top_gainer = DeltaCalculator::top_gainer(&deltas)
            .map(MetricCard::from_delta)
            .unwrap_or_else(MetricCard::placeholder);
        let top_decliner = DeltaCalculator::top_decliner(&deltas)
            .map(MetricCard::from_delta)
            .unwrap_or_else(MetricCard::placeholder);
        let change_share = DeltaCalculator::change_share(&deltas, threshold);

        Self {
            year,
            theme,
            top_gainer,
            top_decliner,
            change_share,
            deltas,
        }
    }

    /// Placeholder summary for the bootstrap year.
    pub fn bootstrap(year: i32, theme: ColorTheme) -> Self {
        Self {
            year,
            theme,
            top_gainer: MetricCard::placeholder(),
            top_decliner: MetricCard::placeholder(),
            change_share: ChangeShare::default(),
            deltas: Vec::new(),
        }
    }
}

/// Rows of the selected year ranked by value, with the bar scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMetrics {
    pub year: i32,
    pub rows: Vec<TidyObservation>,
    pub max_amount: Option<f64>,
}

impl TopMetrics {
    pub fn new(year: i32, mut rows: Vec<TidyObservation>) -> Self {
        rows.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let max_amount = rows.first().map(|r| r.amount);
        Self {
            year,
            rows,
            max_amount,
        }
    }
}
