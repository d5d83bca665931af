//! Dashboard session: owns the loaded table and the current selections.
//!
//! Each selection change is applied through the session and every derived
//! view is recomputed from the immutable table on request.

use crate::dashboard::summary::{DashboardSummary, TopMetrics};
use crate::dashboard::theme::ColorTheme;
use crate::data::{IndicatorRef, IndicatorTable, TidyObservation};
use crate::stats::{DeltaCalculator, DeltaError, DEFAULT_CHANGE_THRESHOLD};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Delta(#[from] DeltaError),
    #[error("No data loaded")]
    NoData,
    #[error("Year {0} is not in the data")]
    UnknownYear(i32),
    #[error("Indicator '{0}' is not in the data")]
    UnknownIndicator(String),
}

/// Current sidebar selections.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub year: i32,
    pub indicator: IndicatorRef,
    pub theme: ColorTheme,
}

pub struct DashboardSession {
    table: IndicatorTable,
    selection: Selection,
    first_year: i32,
    change_threshold: f64,
}

impl DashboardSession {
    /// Start a session on `table`, selecting the earliest year and the first indicator.
    pub fn new(table: IndicatorTable, theme: ColorTheme) -> Result<Self, SessionError> {
        let first_year = table.first_year()?.ok_or(SessionError::NoData)?;
        let indicator = table
            .indicators()?
            .into_iter()
            .next()
            .ok_or(SessionError::NoData)?;

        tracing::debug!(
            first_year,
            indicator = %indicator.code,
            %theme,
            "dashboard session started"
        );

        Ok(Self {
            table,
            selection: Selection {
                year: first_year,
                indicator,
                theme,
            },
            first_year,
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
        })
    }

    #[must_use]
    pub fn with_change_threshold(mut self, threshold: f64) -> Self {
        self.change_threshold = threshold;
        self
    }

    pub fn table(&self) -> &IndicatorTable {
        &self.table
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Years offered for selection, latest first.
    pub fn year_options(&self) -> Result<Vec<i32>, SessionError> {
        let mut years = self.table.years()?;
        years.reverse();
        Ok(years)
    }

    pub fn indicator_options(&self) -> Result<Vec<IndicatorRef>, SessionError> {
        Ok(self.table.indicators()?)
    }

    pub fn select_year(&mut self, year: i32) -> Result<(), SessionError> {
        if !self.table.years()?.contains(&year) {
            return Err(SessionError::UnknownYear(year));
        }
        self.selection.year = year;
        Ok(())
    }

    /// Select by indicator code or exact name.
    pub fn select_indicator(&mut self, key: &str) -> Result<(), SessionError> {
        let indicator = self
            .table
            .find_indicator(key)?
            .ok_or_else(|| SessionError::UnknownIndicator(key.to_string()))?;
        self.selection.indicator = indicator;
        Ok(())
    }

    pub fn select_theme(&mut self, theme: ColorTheme) {
        self.selection.theme = theme;
    }

    /// True when the selected year has no prior year to compare against.
    pub fn is_bootstrap_year(&self) -> bool {
        self.selection.year <= self.first_year
    }

    /// Growth/decline summary for the selected year.
    pub fn summary(&self) -> Result<DashboardSummary, SessionError> {
        let Selection { year, theme, .. } = self.selection;
        if self.is_bootstrap_year() {
            return Ok(DashboardSummary::bootstrap(year, theme));
        }
        let deltas = DeltaCalculator::compute_deltas(&self.table, year)?;
        Ok(DashboardSummary::from_deltas(
            year,
            theme,
            deltas,
            self.change_threshold,
        ))
    }

    /// Rows of the selected year ranked by value.
    pub fn top_metrics(&self) -> Result<TopMetrics, SessionError> {
        let year = self.selection.year;
        Ok(TopMetrics::new(year, self.table.rows_for_year(year)?))
    }

    /// Every observation of the selected indicator, by year.
    pub fn indicator_series(&self) -> Result<Vec<TidyObservation>, SessionError> {
        Ok(self.table.indicator_series(&self.selection.indicator.code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_VALUE_COL;

    fn session() -> DashboardSession {
        let obs = vec![
            TidyObservation::new("Population, total", "SP.POP.TOTL", 2018, 41_515_395.0),
            TidyObservation::new("Population, total", "SP.POP.TOTL", 2019, 42_949_080.0),
            TidyObservation::new("Population, total", "SP.POP.TOTL", 2020, 44_404_611.0),
            TidyObservation::new("GDP growth (annual %)", "NY.GDP.MKTP.KD.ZG", 2019, 6.4),
            TidyObservation::new("GDP growth (annual %)", "NY.GDP.MKTP.KD.ZG", 2020, 2.9),
        ];
        let table = IndicatorTable::from_observations(&obs, DEFAULT_VALUE_COL).unwrap();
        DashboardSession::new(table, ColorTheme::default()).unwrap()
    }

    #[test]
    fn test_defaults_to_earliest_year_and_first_indicator() {
        let s = session();
        assert_eq!(s.selection().year, 2018);
        assert_eq!(s.selection().indicator.code, "SP.POP.TOTL");
        assert_eq!(s.selection().theme, ColorTheme::Blues);
        assert!(s.is_bootstrap_year());
    }

    #[test]
    fn test_year_options_latest_first() {
        assert_eq!(session().year_options().unwrap(), vec![2020, 2019, 2018]);
    }

    #[test]
    fn test_bootstrap_year_summary_is_placeholder() {
        let summary = session().summary().unwrap();
        assert_eq!(summary.top_gainer.label, "-");
        assert_eq!(summary.change_share.growth_pct, 0);
    }

    #[test]
    fn test_summary_after_selecting_year() {
        let mut s = session();
        s.select_year(2020).unwrap();
        let summary = s.summary().unwrap();

        assert_eq!(summary.top_gainer.label, "Population, total");
        assert_eq!(summary.top_gainer.value, "44.4 M");
        assert_eq!(summary.top_decliner.label, "GDP growth (annual %)");
        assert_eq!(summary.change_share.growth_pct, 50);
        assert_eq!(summary.change_share.decline_pct, 0);
    }

    #[test]
    fn test_change_threshold_is_configurable() {
        let mut s = session().with_change_threshold(2_000_000.0);
        s.select_year(2020).unwrap();
        assert_eq!(s.summary().unwrap().change_share.growth_pct, 0);
    }

    #[test]
    fn test_unknown_selections_are_rejected() {
        let mut s = session();
        assert!(matches!(s.select_year(1999), Err(SessionError::UnknownYear(1999))));
        assert!(matches!(
            s.select_indicator("XX.NOPE"),
            Err(SessionError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn test_indicator_series_follows_selection() {
        let mut s = session();
        s.select_indicator("GDP growth (annual %)").unwrap();
        let years: Vec<i32> = s.indicator_series().unwrap().iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2019, 2020]);
    }

    #[test]
    fn test_top_metrics_for_selected_year() {
        let mut s = session();
        s.select_year(2019).unwrap();
        let top = s.top_metrics().unwrap();
        assert_eq!(top.rows.len(), 2);
        assert_eq!(top.max_amount, Some(42_949_080.0));
    }

    #[test]
    fn test_empty_table_cannot_start_session() {
        let table = IndicatorTable::from_observations(&[], DEFAULT_VALUE_COL).unwrap();
        assert!(matches!(
            DashboardSession::new(table, ColorTheme::Blues),
            Err(SessionError::NoData)
        ));
    }
}
