//! The expression evaluator seam.
//!
//! Criteria never interpret their expression text themselves. They ask an
//! [`ExpressionEvaluator`] to bind it once, then ask the bound expression for
//! a value against the current [`RequestScope`].
//!
//! [`RowExpressionEvaluator`] is the built-in evaluator. It understands the
//! handful of forms that reach into the published current row:
//!
//! | Expression                      | Resolves to                          |
//! |---------------------------------|--------------------------------------|
//! | `#{var}`                        | the plain value stored under `var`   |
//! | `#{var.field}`                  | field `field` of the row under `var` |
//! | `#{var.value.field}`            | same as above                        |
//! | `#{var.value['field']}`         | same as above, any field id          |

use std::fmt;
use std::sync::{Arc, LazyLock};

use horizon_grid_core::{GridError, Result};
use regex::Regex;

use super::scope::{RequestScope, ScopeValue};
use super::value::CellValue;

/// An expression that has been bound and can be evaluated repeatedly.
pub trait BoundExpression: Send + Sync {
    /// Returns the expression text this was bound from.
    fn expression(&self) -> &str;

    /// Evaluates the expression against `scope`.
    ///
    /// A variable that is not in scope evaluates to `CellValue::None`.
    fn value(&self, scope: &RequestScope) -> Result<CellValue>;
}

/// Binds expression text into [`BoundExpression`]s.
pub trait ExpressionEvaluator: Send + Sync {
    /// Binds `expression`, or returns `None` if it cannot be resolved.
    fn create(&self, expression: &str) -> Option<Arc<dyn BoundExpression>>;
}

static ROW_EXPRESSION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^#\{\s*([A-Za-z_][A-Za-z0-9_]*)(?:\.value\[\s*'([^']*)'\s*\]|\.value\.([A-Za-z_][A-Za-z0-9_]*)|\.([A-Za-z_][A-Za-z0-9_]*))?\s*\}$",
    )
    .ok()
});

/// The built-in evaluator for row expressions.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{CellValue, ExpressionEvaluator, RequestScope, RowExpressionEvaluator};
///
/// let evaluator = RowExpressionEvaluator::new();
/// let scope = RequestScope::new();
/// scope.put("limit", CellValue::from(10i64));
///
/// let bound = evaluator.create("#{limit}").unwrap();
/// assert_eq!(bound.value(&scope).unwrap(), CellValue::Int(10));
/// assert!(evaluator.create("limit").is_none());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RowExpressionEvaluator;

impl RowExpressionEvaluator {
    /// Creates the evaluator.
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for RowExpressionEvaluator {
    fn create(&self, expression: &str) -> Option<Arc<dyn BoundExpression>> {
        let captures = ROW_EXPRESSION.as_ref()?.captures(expression.trim())?;
        let variable = captures.get(1)?.as_str().to_string();
        let field = captures
            .get(2)
            .or_else(|| captures.get(3))
            .or_else(|| captures.get(4))
            .map(|m| m.as_str().to_string());
        Some(Arc::new(RowExpression {
            text: expression.to_string(),
            variable,
            field,
        }))
    }
}

struct RowExpression {
    text: String,
    variable: String,
    field: Option<String>,
}

impl fmt::Debug for RowExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RowExpression").field(&self.text).finish()
    }
}

impl BoundExpression for RowExpression {
    fn expression(&self) -> &str {
        &self.text
    }

    fn value(&self, scope: &RequestScope) -> Result<CellValue> {
        let Some(bound) = scope.get(&self.variable) else {
            return Ok(CellValue::None);
        };
        match (bound, self.field.as_deref()) {
            (ScopeValue::Value(value), None) => Ok(value),
            (ScopeValue::Value(_), Some(field)) => Err(GridError::evaluation(
                &self.text,
                format!("`{}` is not a row, it has no field `{field}`", self.variable),
            )),
            (ScopeValue::Row(_), None) => Err(GridError::evaluation(
                &self.text,
                format!("`{}` is a row, name one of its fields", self.variable),
            )),
            (ScopeValue::Row(row), Some(field)) => row
                .value(field)
                .map_err(|err| GridError::evaluation(&self.text, err.to_string())),
        }
    }
}
