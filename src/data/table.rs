//! Indicator Table Module
//! The tidy (long-format) relation produced by the loader.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::io::Write;
use thiserror::Error;

/// Column names of the tidy relation.
pub const INDICATOR_NAME_COL: &str = "IndicatorName";
pub const INDICATOR_CODE_COL: &str = "IndicatorCode";
pub const YEAR_COL: &str = "Year";
pub const DEFAULT_VALUE_COL: &str = "Amount";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to write JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One (indicator, year) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyObservation {
    pub indicator_name: String,
    pub indicator_code: String,
    pub year: i32,
    pub amount: f64,
}

impl TidyObservation {
    pub fn new(name: &str, code: &str, year: i32, amount: f64) -> Self {
        Self {
            indicator_name: name.to_string(),
            indicator_code: code.to_string(),
            year,
            amount,
        }
    }
}

/// An indicator as offered in the selection list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IndicatorRef {
    pub name: String,
    pub code: String,
}

/// Immutable long-format indicator table.
///
/// Columns: [IndicatorName, IndicatorCode, Year, <value column>]. Every row
/// carries a value and `(IndicatorCode, Year)` is unique.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    df: DataFrame,
    value_column: String,
}

impl IndicatorTable {
    /// Wrap an already-tidy DataFrame. The caller guarantees the column layout.
    pub(crate) fn from_dataframe(df: DataFrame, value_column: &str) -> Self {
        Self {
            df,
            value_column: value_column.to_string(),
        }
    }

    /// Build a table from observations, storing amounts under `value_column`.
    pub fn from_observations(
        observations: &[TidyObservation],
        value_column: &str,
    ) -> PolarsResult<Self> {
        let names: Vec<&str> = observations
            .iter()
            .map(|o| o.indicator_name.as_str())
            .collect();
        let codes: Vec<&str> = observations
            .iter()
            .map(|o| o.indicator_code.as_str())
            .collect();
        let years: Vec<i32> = observations.iter().map(|o| o.year).collect();
        let amounts: Vec<f64> = observations.iter().map(|o| o.amount).collect();

        let df = DataFrame::new(vec![
            Column::new(INDICATOR_NAME_COL.into(), names),
            Column::new(INDICATOR_CODE_COL.into(), codes),
            Column::new(YEAR_COL.into(), years),
            Column::new(value_column.into(), amounts),
        ])?;

        Ok(Self::from_dataframe(df, value_column))
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Name of the measured column ("Amount", "Percentage", ...).
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// All observations in table order.
    pub fn observations(&self) -> PolarsResult<Vec<TidyObservation>> {
        extract_observations(&self.df, &self.value_column)
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> PolarsResult<Vec<i32>> {
        let years = self.df.column(YEAR_COL)?.i32()?;
        let distinct: BTreeSet<i32> = years.into_iter().flatten().collect();
        Ok(distinct.into_iter().collect())
    }

    /// The bootstrap year: earliest year present, if any.
    pub fn first_year(&self) -> PolarsResult<Option<i32>> {
        Ok(self.df.column(YEAR_COL)?.i32()?.min())
    }

    /// Distinct indicators in order of first appearance.
    pub fn indicators(&self) -> PolarsResult<Vec<IndicatorRef>> {
        let names = self.df.column(INDICATOR_NAME_COL)?.str()?;
        let codes = self.df.column(INDICATOR_CODE_COL)?.str()?;

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (name, code) in names.into_iter().zip(codes) {
            if let (Some(name), Some(code)) = (name, code) {
                if seen.insert(code) {
                    out.push(IndicatorRef {
                        name: name.to_string(),
                        code: code.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Find an indicator by code, falling back to an exact name match.
    pub fn find_indicator(&self, key: &str) -> PolarsResult<Option<IndicatorRef>> {
        let indicators = self.indicators()?;
        let by_code = indicators.iter().find(|i| i.code == key);
        Ok(by_code
            .or_else(|| indicators.iter().find(|i| i.name == key))
            .cloned())
    }

    /// Rows observed in `year`, in table order.
    pub fn rows_for_year(&self, year: i32) -> PolarsResult<Vec<TidyObservation>> {
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(YEAR_COL).eq(lit(year)))
            .collect()?;
        extract_observations(&filtered, &self.value_column)
    }

    /// All observations of one indicator (by code), ordered by year.
    pub fn indicator_series(&self, code: &str) -> PolarsResult<Vec<TidyObservation>> {
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(INDICATOR_CODE_COL).eq(lit(code)))
            .collect()?;
        let mut series = extract_observations(&filtered, &self.value_column)?;
        series.sort_by_key(|o| o.year);
        Ok(series)
    }

    /// Write the tidy relation as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut df = self.df.clone();
        CsvWriter::new(writer)
            .include_header(true)
            .finish(&mut df)?;
        Ok(())
    }

    /// Write the observations as a pretty-printed JSON array.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, &self.observations()?)?;
        Ok(())
    }
}

/// Read tidy rows back out of a DataFrame. Rows with a null in any column are skipped.
pub(crate) fn extract_observations(
    df: &DataFrame,
    value_column: &str,
) -> PolarsResult<Vec<TidyObservation>> {
    let names = df.column(INDICATOR_NAME_COL)?.str()?;
    let codes = df.column(INDICATOR_CODE_COL)?.str()?;
    let years = df.column(YEAR_COL)?.i32()?;
    let values = df.column(value_column)?.f64()?;

    let rows = names
        .into_iter()
        .zip(codes)
        .zip(years)
        .zip(values)
        .filter_map(|(((name, code), year), value)| {
            Some(TidyObservation::new(name?, code?, year?, value?))
        })
        .collect();
    Ok(rows)
}
