//! Prelude module for Horizon Grid.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_grid::prelude::*;
//! ```

// ============================================================================
// Errors and Signals
// ============================================================================

pub use crate::{GridError, Result, Signal};

// ============================================================================
// Configuration
// ============================================================================

pub use crate::config::TableConfig;

// ============================================================================
// Table Engine
// ============================================================================

pub use crate::model::{
    ActionEvent, ActionKind, ActionOutcome, CellValue, ColumnNode, EvaluationContext, FieldKey,
    FilterCriterion, MemoryDataProvider, RequestScope, RowCursorModel, RowExpressionEvaluator,
    RowGroup, RowKey, SortCriterion, SortPanel, SortPanelLevel, Table, TableController,
    TableDataProvider,
};
