//! Error types for Horizon Grid.

use thiserror::Error;

/// The main error type for Horizon Grid operations.
///
/// Only conditions a caller must react to are represented here. Missing
/// tables, row groups or columns and malformed user input are logged and
/// recovered where they occur, so they never show up as a `GridError`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A cursor position below `-1` was requested.
    #[error("Invalid row index: {0}")]
    InvalidRowIndex(i64),

    /// The cursor does not point at an available row.
    #[error("Row index not available: {0}")]
    RowNotAvailable(i64),

    /// A structural edit (insert/remove/clear) was attempted on a row view.
    #[error("Unsupported row view mutation: {0}")]
    UnsupportedMutation(&'static str),

    /// The expression evaluator failed while producing a value.
    #[error("Failed to evaluate `{expression}`: {message}")]
    Evaluation {
        /// The expression that was being evaluated.
        expression: String,
        /// Evaluator-provided description of the failure.
        message: String,
    },

    /// The provider has no field with this id.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The provider has no row with this id.
    #[error("Unknown row: {0}")]
    UnknownRow(String),

    /// The field cannot be written.
    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),

    /// A setter received a value outside its domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GridError {
    /// Creates an evaluation error for the given expression.
    pub fn evaluation(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error came from the expression evaluator.
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Self::Evaluation { .. })
    }
}

/// A specialized Result type for Horizon Grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
