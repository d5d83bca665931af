//! Indicator Loader Module
//! Reads a World Bank wide-format CSV with Polars and melts it into the tidy
//! [`IndicatorTable`].

use crate::data::source::{DataSource, SourceError};
use crate::data::table::{
    IndicatorTable, DEFAULT_VALUE_COL, INDICATOR_CODE_COL, INDICATOR_NAME_COL, YEAR_COL,
};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use thiserror::Error;

/// Header names in the World Bank "API_<country>_DS2" export.
pub const SRC_COUNTRY_NAME: &str = "Country Name";
pub const SRC_COUNTRY_CODE: &str = "Country Code";
pub const SRC_INDICATOR_NAME: &str = "Indicator Name";
pub const SRC_INDICATOR_CODE: &str = "Indicator Code";

/// The 1960 column is always present and always dropped.
pub const VOID_YEAR_COLUMN: &str = "1960";

/// Lines of metadata ("Data Source", "Last Updated Date", ...) before the header.
pub const DEFAULT_SKIP_ROWS: usize = 3;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("No data loaded")]
    NoData,
}

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Preamble lines skipped before the header (blank lines after them are skipped too).
    pub skip_rows: usize,
    /// Name given to the melted value column.
    pub value_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            value_column: DEFAULT_VALUE_COL.to_string(),
        }
    }
}

/// Loads World Bank indicator exports into tidy form.
#[derive(Debug, Clone, Default)]
pub struct IndicatorLoader {
    options: LoadOptions,
}

impl IndicatorLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Fetch `source` and normalize it.
    pub fn load(&self, source: &DataSource) -> Result<IndicatorTable, LoaderError> {
        let text = source.fetch()?;
        let table = self.load_str(&text)?;
        tracing::info!(
            %source,
            rows = table.height(),
            "loaded indicator table"
        );
        Ok(table)
    }

    /// Normalize CSV text that still carries its preamble.
    pub fn load_str(&self, text: &str) -> Result<IndicatorTable, LoaderError> {
        let (header, body) =
            strip_preamble(text, self.options.skip_rows).ok_or(LoaderError::NoData)?;

        let wide = Self::read_wide(&body)?;
        let wide = Self::drop_void_columns(wide, &header)?;
        Self::melt(&wide, &self.options.value_column)
    }

    fn read_wide(body: &str) -> Result<DataFrame, LoaderError> {
        let cursor = Cursor::new(body.as_bytes().to_vec());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(cursor)
            .finish()?;
        Ok(df)
    }

    /// Drop country columns, the 1960 column and the trailing unlabeled column.
    /// Any of them missing means the export is not the format we know.
    fn drop_void_columns(df: DataFrame, header: &str) -> Result<DataFrame, LoaderError> {
        if !header.trim_end().ends_with(',') {
            return Err(LoaderError::SchemaMismatch(
                "trailing unlabeled column not found".to_string(),
            ));
        }
        let trailing = df
            .get_column_names()
            .last()
            .map(|name| name.to_string())
            .ok_or_else(|| LoaderError::SchemaMismatch("no columns".to_string()))?;

        let mut df = df.drop(&trailing)?;
        for name in [SRC_COUNTRY_NAME, SRC_COUNTRY_CODE, VOID_YEAR_COLUMN] {
            if df.column(name).is_err() {
                return Err(LoaderError::SchemaMismatch(format!(
                    "expected column '{name}' not found"
                )));
            }
            df = df.drop(name)?;
        }
        Ok(df)
    }

    /// Un-pivot every year column into (year, value) rows.
    ///
    /// Output columns: [IndicatorName, IndicatorCode, Year, <value_column>]
    fn melt(df: &DataFrame, value_column: &str) -> Result<IndicatorTable, LoaderError> {
        let name_series = Self::id_column(df, SRC_INDICATOR_NAME)?;
        let name_ca = name_series.str()?;
        let code_series = Self::id_column(df, SRC_INDICATOR_CODE)?;
        let code_ca = code_series.str()?;

        let mut seen = HashSet::new();
        for code in code_ca.into_iter().flatten() {
            if !seen.insert(code) {
                return Err(LoaderError::SchemaMismatch(format!(
                    "indicator code '{code}' appears more than once"
                )));
            }
        }

        let mut names: Vec<String> = Vec::new();
        let mut codes: Vec<String> = Vec::new();
        let mut years: Vec<i32> = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        let mut year_columns = 0usize;
        let mut dropped = 0usize;

        for column in df.get_columns() {
            let header = column.name().as_str();
            if header == SRC_INDICATOR_NAME || header == SRC_INDICATOR_CODE {
                continue;
            }
            let year: i32 = header.trim().parse().map_err(|_| {
                LoaderError::SchemaMismatch(format!("column '{header}' is not a year"))
            })?;
            year_columns += 1;

            let value_f64 = column.cast(&DataType::Float64)?;
            let value_ca = value_f64.f64()?;

            for i in 0..df.height() {
                match (name_ca.get(i), code_ca.get(i), value_ca.get(i)) {
                    (Some(name), Some(code), Some(v)) if !v.is_nan() => {
                        names.push(name.to_string());
                        codes.push(code.to_string());
                        years.push(year);
                        values.push(v);
                    }
                    _ => dropped += 1,
                }
            }
        }

        tracing::debug!(
            indicators = seen.len(),
            year_columns,
            kept = values.len(),
            dropped,
            "melted wide indicator table"
        );

        let tidy = DataFrame::new(vec![
            Column::new(INDICATOR_NAME_COL.into(), names),
            Column::new(INDICATOR_CODE_COL.into(), codes),
            Column::new(YEAR_COL.into(), years),
            Column::new(value_column.into(), values),
        ])?;

        Ok(IndicatorTable::from_dataframe(tidy, value_column))
    }

    fn id_column(df: &DataFrame, name: &str) -> Result<Column, LoaderError> {
        let column = df.column(name).map_err(|_| {
            LoaderError::SchemaMismatch(format!("expected column '{name}' not found"))
        })?;
        Ok(column.cast(&DataType::String)?)
    }
}

/// Skip `skip_rows` preamble lines, any blank lines after them and a UTF-8 BOM.
///
/// Returns the header line and the CSV body starting at that header, or `None`
/// if nothing is left.
pub fn strip_preamble(text: &str, skip_rows: usize) -> Option<(String, String)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .skip(skip_rows)
        .skip_while(|line| line.trim().is_empty());

    let header = lines.next()?.to_string();
    let mut body = String::with_capacity(text.len());
    body.push_str(&header);
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    Some((header, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::TidyObservation;

    const PREAMBLE: &str = "\"Data Source\",\"World Development Indicators\",\n\n\"Last Updated Date\",\"2024-06-28\",\n\n";

    fn wb_csv(rows: &[&str]) -> String {
        let mut text = PREAMBLE.to_string();
        text.push_str("\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"2018\",\"2019\",\"2020\",\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn sample_csv() -> String {
        wb_csv(&[
            "\"Uganda\",\"UGA\",\"Population, total\",\"SP.POP.TOTL\",\"6788211\",\"41515395\",\"42949080\",\"44404611\",",
            "\"Uganda\",\"UGA\",\"Net migration\",\"SM.POP.NETM\",\"\",\"\",\"-174598\",\"\",",
            "\"Uganda\",\"UGA\",\"GDP growth (annual %)\",\"NY.GDP.MKTP.KD.ZG\",\"\",\"6.3\",\"6.4\",\"2.9\",",
        ])
    }

    #[test]
    fn test_strip_preamble_skips_metadata_and_blank_lines() {
        let (header, body) = strip_preamble(&sample_csv(), DEFAULT_SKIP_ROWS).unwrap();
        assert!(header.starts_with("\"Country Name\""));
        assert!(body.starts_with("\"Country Name\""));
        assert_eq!(body.lines().count(), 4);
    }

    #[test]
    fn test_strip_preamble_with_bom() {
        let text = format!("\u{feff}{}", sample_csv());
        let (header, _) = strip_preamble(&text, DEFAULT_SKIP_ROWS).unwrap();
        assert!(header.starts_with("\"Country Name\""));
    }

    #[test]
    fn test_strip_preamble_empty() {
        assert!(strip_preamble(PREAMBLE, DEFAULT_SKIP_ROWS).is_none());
    }

    #[test]
    fn test_load_melts_and_drops_missing() {
        let table = IndicatorLoader::default().load_str(&sample_csv()).unwrap();

        // 3 population + 1 migration + 3 growth; 1960 never survives
        assert_eq!(table.height(), 7);
        let obs = table.observations().unwrap();
        assert!(obs.iter().all(|o| o.year != 1960));
        assert!(obs.iter().all(|o| !o.amount.is_nan()));
        assert!(obs.contains(&TidyObservation::new(
            "Net migration",
            "SM.POP.NETM",
            2019,
            -174598.0
        )));
        assert_eq!(table.years().unwrap(), vec![2018, 2019, 2020]);
    }

    #[test]
    fn test_load_output_is_in_melt_order() {
        let table = IndicatorLoader::default().load_str(&sample_csv()).unwrap();
        let years: Vec<i32> = table
            .observations()
            .unwrap()
            .iter()
            .map(|o| o.year)
            .collect();
        assert_eq!(years, vec![2018, 2018, 2019, 2019, 2019, 2020, 2020]);
    }

    #[test]
    fn test_load_with_custom_value_column() {
        let loader = IndicatorLoader::new(LoadOptions {
            value_column: "Percentage".to_string(),
            ..LoadOptions::default()
        });
        let table = loader.load_str(&sample_csv()).unwrap();
        assert_eq!(table.value_column(), "Percentage");
        assert!(table.dataframe().column("Percentage").is_ok());
    }

    #[test]
    fn test_missing_1960_column_is_schema_mismatch() {
        let text = format!(
            "{PREAMBLE}\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"2019\",\"2020\",\n\
             \"Uganda\",\"UGA\",\"Population, total\",\"SP.POP.TOTL\",\"42949080\",\"44404611\",\n"
        );
        let result = IndicatorLoader::default().load_str(&text);
        assert!(matches!(result, Err(LoaderError::SchemaMismatch(_))));
    }

    #[test]
    fn test_missing_trailing_column_is_schema_mismatch() {
        let text = format!(
            "{PREAMBLE}\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"2020\"\n\
             \"Uganda\",\"UGA\",\"Population, total\",\"SP.POP.TOTL\",\"6788211\",\"44404611\"\n"
        );
        let result = IndicatorLoader::default().load_str(&text);
        assert!(matches!(result, Err(LoaderError::SchemaMismatch(_))));
    }

    #[test]
    fn test_duplicate_indicator_code_is_schema_mismatch() {
        let text = wb_csv(&[
            "\"Uganda\",\"UGA\",\"Population, total\",\"SP.POP.TOTL\",\"1\",\"2\",\"3\",\"4\",",
            "\"Uganda\",\"UGA\",\"Population again\",\"SP.POP.TOTL\",\"1\",\"2\",\"3\",\"4\",",
        ]);
        let result = IndicatorLoader::default().load_str(&text);
        assert!(matches!(result, Err(LoaderError::SchemaMismatch(_))));
    }

    #[test]
    fn test_unparseable_amounts_are_dropped() {
        let text = format!(
            "{PREAMBLE}\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"2019\",\"2020\",\n\
             \"Uganda\",\"UGA\",\"Exports\",\"X.1\",\"1\",\"..\",\"5\",\n\
             \"Uganda\",\"UGA\",\"Imports\",\"Y.1\",\"1\",\"3\",\"n/a\",\n"
        );
        let table = IndicatorLoader::default().load_str(&text).unwrap();
        let mut kept: Vec<(String, i32, f64)> = table
            .observations()
            .unwrap()
            .into_iter()
            .map(|o| (o.indicator_code, o.year, o.amount))
            .collect();
        kept.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            kept,
            vec![
                ("X.1".to_string(), 2020, 5.0),
                ("Y.1".to_string(), 2019, 3.0),
            ]
        );
    }

    #[test]
    fn test_non_year_header_is_schema_mismatch() {
        let text = format!(
            "{PREAMBLE}\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1960\",\"FY2020\",\n\
             \"Uganda\",\"UGA\",\"Population, total\",\"SP.POP.TOTL\",\"1\",\"44404611\",\n"
        );
        let result = IndicatorLoader::default().load_str(&text);
        assert!(matches!(result, Err(LoaderError::SchemaMismatch(_))));
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let result = IndicatorLoader::default().load_str("");
        assert!(matches!(result, Err(LoaderError::NoData)));
    }
}
