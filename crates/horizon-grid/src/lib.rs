//! Horizon Grid - table data binding, column indexing and sort/pagination
//! control.
//!
//! This is the main crate; it re-exports the core crate's errors, signals
//! and logging helpers alongside the table engine.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::prelude::*;
//!
//! let mut table = Table::new(TableConfig::default()).with_row_group(
//!     RowGroup::new("rows").with_provider(Arc::new(MemoryDataProvider::default_table())),
//! );
//! TableController::new().handle_action(Some(&mut table), &ActionEvent::table("toggle-paginated"));
//! assert!(table.first_row_group().unwrap().is_paginated());
//! ```

pub use horizon_grid_core::*;

pub mod config;
pub mod model;
pub mod prelude;
