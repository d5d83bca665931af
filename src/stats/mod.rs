//! Stats module - year-over-year deltas

mod calculator;

pub use calculator::{
    ChangeShare, DeltaCalculator, DeltaError, YearlyDelta, DEFAULT_CHANGE_THRESHOLD,
};
