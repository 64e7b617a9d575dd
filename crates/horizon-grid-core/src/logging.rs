//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Sort and pagination handlers report missing tables, row groups and
//! columns at `debug` level on the [`targets::SORT`] and
//! [`targets::PAGINATION`] targets, so enabling
//! `RUST_LOG=horizon_grid::sort=debug` shows why a click had no effect.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Data provider target.
    pub const PROVIDER: &str = "horizon_grid::provider";
    /// Row cursor data model target.
    pub const DATA_MODEL: &str = "horizon_grid::data_model";
    /// Sort/filter criteria evaluation target.
    pub const CRITERIA: &str = "horizon_grid::criteria";
    /// Row group sorting, filtering and paging target.
    pub const ROW_GROUP: &str = "horizon_grid::row_group";
    /// Sort action handling target.
    pub const SORT: &str = "horizon_grid::sort";
    /// Pagination action handling target.
    pub const PAGINATION: &str = "horizon_grid::pagination";
    /// Performance spans target.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A span guard for performance tracing.
///
/// Creates a `tracing` span that is entered on creation and exited on drop.
///
/// # Example
///
/// ```
/// use horizon_grid_core::logging::PerfSpan;
///
/// fn sort_rows() {
///     let _span = PerfSpan::new("sort_rows");
///     // ... sorting ...
/// } // Span ends here
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Logs a recoverable condition at `debug` level.
///
/// `step` names the handling step that hit the condition, mirroring how the
/// sort and pagination handlers report a skipped action.
#[macro_export]
macro_rules! grid_debug {
    (target: $target:expr, step: $step:expr, $($arg:tt)*) => {
        tracing::debug!(target: $target, step = $step, $($arg)*)
    };
}
