//! Delta Calculator Module
//! Year-over-year change per indicator, ranked, plus the share of indicators
//! that moved by more than a fixed threshold.

use crate::data::{IndicatorTable, INDICATOR_CODE_COL, INDICATOR_NAME_COL, YEAR_COL};
use polars::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Absolute change above which an indicator counts as growth/decline.
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 50_000.0;

#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("{year} has no prior year (first year in data is {first_year})")]
    NoPriorYear { year: i32, first_year: i32 },
}

/// Change of one indicator between the selected year and the year before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyDelta {
    pub indicator_name: String,
    pub indicator_code: String,
    pub amount: f64,
    pub delta: f64,
}

/// Rounded percentages of indicators past the change threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeShare {
    pub growth_pct: u32,
    pub decline_pct: u32,
}

/// Computes yearly differences over a tidy indicator table.
pub struct DeltaCalculator;

impl DeltaCalculator {
    /// Deltas for `year` on the table's own value column.
    pub fn compute_deltas(
        table: &IndicatorTable,
        year: i32,
    ) -> Result<Vec<YearlyDelta>, DeltaError> {
        Self::compute_deltas_for(table.dataframe(), year, table.value_column())
    }

    /// Deltas for `year` measured on `value_col`.
    ///
    /// Every indicator present in `year` gets one row; a missing prior-year
    /// value counts as 0. Sorted by delta descending, ties in table order.
    pub fn compute_deltas_for(
        df: &DataFrame,
        year: i32,
        value_col: &str,
    ) -> Result<Vec<YearlyDelta>, DeltaError> {
        let first_year = df
            .column(YEAR_COL)?
            .i32()?
            .min()
            .ok_or(DeltaError::NoData)?;
        if year <= first_year {
            return Err(DeltaError::NoPriorYear { year, first_year });
        }

        let selected = Self::values_for_year(df, year, value_col)?;
        let prior: HashMap<String, f64> = Self::values_for_year(df, year - 1, value_col)?
            .into_iter()
            .map(|(_, code, value)| (code, value))
            .collect();

        let mut deltas: Vec<YearlyDelta> = selected
            .into_iter()
            .map(|(name, code, amount)| {
                let previous = prior.get(&code).copied().unwrap_or(0.0);
                YearlyDelta {
                    indicator_name: name,
                    indicator_code: code,
                    amount,
                    delta: amount - previous,
                }
            })
            .collect();

        deltas.sort_by(|a, b| {
            b.delta
                .partial_cmp(&a.delta)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(
            year,
            value_col,
            indicators = deltas.len(),
            matched_prior = prior.len(),
            "computed yearly differences"
        );
        Ok(deltas)
    }

    /// (name, code, value) for every row observed in `year`.
    fn values_for_year(
        df: &DataFrame,
        year: i32,
        value_col: &str,
    ) -> PolarsResult<Vec<(String, String, f64)>> {
        let year_df = df
            .clone()
            .lazy()
            .filter(col(YEAR_COL).eq(lit(year)))
            .select([col(INDICATOR_NAME_COL), col(INDICATOR_CODE_COL), col(value_col)])
            .collect()?;

        let names = year_df.column(INDICATOR_NAME_COL)?.str()?;
        let codes = year_df.column(INDICATOR_CODE_COL)?.str()?;
        let values = year_df.column(value_col)?.f64()?;

        Ok(names
            .into_iter()
            .zip(codes)
            .zip(values)
            .filter_map(|((name, code), value)| {
                Some((name?.to_string(), code?.to_string(), value?))
            })
            .collect())
    }

    /// Share of distinct indicators whose delta is above `threshold` (growth)
    /// or below `-threshold` (decline), as rounded whole percentages.
    pub fn change_share(deltas: &[YearlyDelta], threshold: f64) -> ChangeShare {
        let distinct: HashSet<&str> = deltas.iter().map(|d| d.indicator_code.as_str()).collect();
        if distinct.is_empty() {
            return ChangeShare::default();
        }

        let growth = deltas.iter().filter(|d| d.delta > threshold).count();
        let decline = deltas.iter().filter(|d| d.delta < -threshold).count();

        ChangeShare {
            growth_pct: Self::percentage(growth, distinct.len()),
            decline_pct: Self::percentage(decline, distinct.len()),
        }
    }

    fn percentage(count: usize, total: usize) -> u32 {
        (count as f64 / total as f64 * 100.0).round_ties_even() as u32
    }

    /// Indicator with the largest gain (first of the ranked deltas).
    pub fn top_gainer(deltas: &[YearlyDelta]) -> Option<&YearlyDelta> {
        deltas.first()
    }

    /// Indicator with the largest decline (last of the ranked deltas).
    pub fn top_decliner(deltas: &[YearlyDelta]) -> Option<&YearlyDelta> {
        deltas.last()
    }
}
