//! Data module - CSV acquisition and reshaping

mod loader;
mod source;
mod table;

pub use loader::{strip_preamble, IndicatorLoader, LoadOptions, LoaderError, DEFAULT_SKIP_ROWS};
pub use source::{DataSource, SourceError};
pub use table::{
    ExportError, IndicatorRef, IndicatorTable, TidyObservation, DEFAULT_VALUE_COL,
    INDICATOR_CODE_COL, INDICATOR_NAME_COL, YEAR_COL,
};
