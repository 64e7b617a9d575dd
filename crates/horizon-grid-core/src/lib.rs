//! Core systems for Horizon Grid.
//!
//! This crate provides the cross-cutting pieces the table engine is built on:
//!
//! - **Errors**: [`GridError`] and the crate-wide [`Result`] alias
//! - **Signal/Slot System**: synchronous, ordered change notification
//! - **Logging**: `tracing` targets and span helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let row_selected = Signal::<i64>::new();
//!
//! let conn_id = row_selected.connect(|index| {
//!     println!("Cursor moved to row {}", index);
//! });
//!
//! row_selected.emit(3);
//! row_selected.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{GridError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
