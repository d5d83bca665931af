//! Dashboard module - session state, derived views and terminal output

mod format;
pub mod render;
mod session;
mod summary;
mod theme;

pub use format::format_number;
pub use session::{DashboardSession, Selection, SessionError};
pub use summary::{DashboardSummary, MetricCard, TopMetrics};
pub use theme::ColorTheme;
