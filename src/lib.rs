//! World Bank Indicator Dashboard
//!
//! Loads a World Bank "API_<country>_DS2" wide-format CSV (indicators as rows,
//! years as columns), reshapes it into a tidy table with Polars and derives
//! the year-over-year views a dashboard shows for a selected year.
//!
//! ```ignore
//! use wbdash::dashboard::{ColorTheme, DashboardSession};
//! use wbdash::data::{DataSource, IndicatorLoader};
//!
//! let table = IndicatorLoader::default().load(&DataSource::parse("API_UGA_DS2.csv"))?;
//! let mut session = DashboardSession::new(table, ColorTheme::Blues)?;
//! session.select_year(2020)?;
//! let summary = session.summary()?;
//! ```

pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod stats;
