//! Table engine for Horizon Grid.
//!
//! This module binds an abstract tabular data source to tables made of
//! independently sorted and paginated row groups:
//!
//! - Reading rows through a single movable cursor
//! - Sorting and filtering rows with expression-bound criteria
//! - Correlating column clicks across row groups by column position
//! - Driving sort and page changes from discrete UI actions
//!
//! # Core Types
//!
//! - `TableDataProvider`: The trait data sources implement
//! - `CellValue`: Type-erased container for a single cell
//! - `SortCriterion` / `FilterCriterion`: Per-row sort and match rules
//! - `EvaluationContext`: Publishes the current row while a criterion runs
//! - `ColumnNode`: A (possibly nested) column header definition
//! - `RowGroup` / `Table`: Sortable, pageable slices of a provider
//! - `TableController`: The entry point for UI actions
//! - `RowCursorModel`: A single-cursor view of a provider
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::config::TableConfig;
//! use horizon_grid::model::*;
//!
//! let provider = Arc::new(MemoryDataProvider::new(vec![
//!     FieldKey::new("name"),
//!     FieldKey::new("age"),
//! ]));
//! provider.push_row(vec!["Carol".into(), 41i64.into()]);
//! provider.push_row(vec!["Alice".into(), 29i64.into()]);
//!
//! let age = ColumnNode::new("Age").with_sort(SortCriterion::by_expression("#{currentRow.age}"));
//! let age_id = age.id();
//! let mut table = Table::new(TableConfig::default()).with_row_group(
//!     RowGroup::new("people")
//!         .with_provider(provider)
//!         .with_column(ColumnNode::new("Name"))
//!         .with_column(age),
//! );
//!
//! TableController::new().handle_action(
//!     Some(&mut table),
//!     &ActionEvent::column("select-sort", "people", age_id),
//! );
//!
//! let scope = RequestScope::new();
//! let evaluator = RowExpressionEvaluator::new();
//! let ctx = EvaluationContext::new(&scope, &evaluator);
//! let rows = table.first_row_group().unwrap().sorted_row_keys(&ctx).unwrap();
//! assert_eq!(rows[0].id(), "1");
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐   actions   ┌─────────────────┐
//! │ UI gestures  │────────────>│ TableController │
//! └──────────────┘             └─────────────────┘
//!                                       │
//!                                       v
//! ┌──────────────┐            ┌──────────────────┐
//! │ ColumnNode   │<───────────│ Table / RowGroup │
//! │ trees        │  by index  │ sorts, filters,  │
//! └──────────────┘            │ page             │
//!                             └──────────────────┘
//!                                       │ EvaluationContext
//!                                       v
//! ┌────────────────┐          ┌───────────────────┐
//! │ RowCursorModel │─────────>│ TableDataProvider │
//! └────────────────┘          └───────────────────┘
//! ```

mod action;
mod column;
mod controller;
mod criteria;
mod data_model;
mod expression;
mod provider;
mod row_group;
mod scope;
mod table;
mod value;

pub use action::{ActionEvent, ActionKind, ActionSource, SortPanel, SortPanelLevel};
pub use column::{
    column_by_index, find_column, index_by_key, index_of, indexed_columns, ColumnId, ColumnNode,
};
pub use controller::{ActionOutcome, TableController};
pub use criteria::{FilterCriterion, SortCriterion, SortSource, DEFAULT_REQUEST_KEY};
pub use data_model::{RowCursorModel, RowSelected, RowView};
pub use expression::{BoundExpression, ExpressionEvaluator, RowExpressionEvaluator};
pub use provider::{FieldKey, MemoryDataProvider, ProviderSignals, RowKey, TableDataProvider};
pub use row_group::{RowGroup, DEFAULT_ROWS_PER_PAGE};
pub use scope::{EvaluationContext, RequestScope, RowBinding, RowScopeGuard, ScopeValue};
pub use table::Table;
pub use value::{compare_values, CellValue, Locale};
