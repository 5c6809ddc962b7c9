//! Presentation shell for the cuaca dashboard
//!
//! Framework-free view state and view models: the dashboard state machine,
//! the fetch session, and the projections the chart, stat cards, and table
//! consume.

pub mod format;
pub mod session;
pub mod state;
pub mod widgets;

pub use session::DashboardSession;
pub use state::{DashboardState, Phase};
pub use widgets::{chart_series, stat_cards, table_rows, ChartPoint, StatCard, TableRow};
