//! Request scope and the criteria evaluation context.
//!
//! Bound expressions see "the current row" as a named variable in a
//! [`RequestScope`]. [`EvaluationContext::with_row`] publishes that variable
//! for exactly one evaluation and puts back whatever was there before, even
//! when the evaluation fails or panics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::Result;
use parking_lot::{ReentrantMutex, RwLock};

use super::expression::ExpressionEvaluator;
use super::provider::{RowKey, TableDataProvider};
use super::value::CellValue;

/// The row published under a request key while a criterion is evaluated.
#[derive(Clone)]
pub struct RowBinding {
    provider: Arc<dyn TableDataProvider>,
    row: RowKey,
}

impl RowBinding {
    /// Binds a provider row.
    pub fn new(provider: Arc<dyn TableDataProvider>, row: RowKey) -> Self {
        Self { provider, row }
    }

    /// Returns the bound provider.
    pub fn provider(&self) -> &Arc<dyn TableDataProvider> {
        &self.provider
    }

    /// Returns the bound row key.
    pub fn row_key(&self) -> &RowKey {
        &self.row
    }

    /// Reads the bound row's value for `field_id`.
    pub fn value(&self, field_id: &str) -> Result<CellValue> {
        let field = self
            .provider
            .field_key(field_id)
            .ok_or_else(|| horizon_grid_core::GridError::UnknownField(field_id.to_string()))?;
        self.provider.value(&field, &self.row)
    }
}

impl fmt::Debug for RowBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowBinding").field("row", &self.row).finish_non_exhaustive()
    }
}

impl PartialEq for RowBinding {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.provider, &other.provider) && self.row == other.row
    }
}

/// A value stored in the request scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeValue {
    /// A plain value.
    Value(CellValue),
    /// A provider row.
    Row(RowBinding),
}

impl From<CellValue> for ScopeValue {
    fn from(value: CellValue) -> Self {
        ScopeValue::Value(value)
    }
}

/// A request-lifetime key/value store that expressions resolve variables in.
///
/// One scope belongs to one logical request. Criteria only ever write their
/// own request key, and always restore it.
#[derive(Debug, Default)]
pub struct RequestScope {
    values: RwLock<HashMap<String, ScopeValue>>,
}

impl RequestScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ScopeValue> {
        self.values.read().get(key).cloned()
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn put(&self, key: impl Into<String>, value: impl Into<ScopeValue>) -> Option<ScopeValue> {
        self.values.write().insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<ScopeValue> {
        self.values.write().remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// Publishes `binding` under `key` until the returned guard is dropped.
    pub fn publish_row(&self, key: &str, binding: RowBinding) -> RowScopeGuard<'_> {
        let previous = self.put(key, ScopeValue::Row(binding));
        RowScopeGuard {
            scope: self,
            key: key.to_string(),
            previous,
        }
    }
}

/// Restores the previous value of a request key on drop.
#[must_use = "the row is unpublished as soon as the guard is dropped"]
pub struct RowScopeGuard<'a> {
    scope: &'a RequestScope,
    key: String,
    previous: Option<ScopeValue>,
}

impl Drop for RowScopeGuard<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                self.scope.put(std::mem::take(&mut self.key), previous);
            }
            None => {
                self.scope.remove(&self.key);
            }
        }
    }
}

/// Everything a criterion needs to evaluate its bound expression.
///
/// Passed explicitly into every `sort_value`/`matches` call.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    scope: &'a RequestScope,
    evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a context over a request scope and an evaluator.
    pub fn new(scope: &'a RequestScope, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        Self { scope, evaluator }
    }

    /// Returns the request scope.
    pub fn scope(&self) -> &'a RequestScope {
        self.scope
    }

    /// Returns the expression evaluator.
    pub fn evaluator(&self) -> &'a dyn ExpressionEvaluator {
        self.evaluator
    }

    /// Runs `thunk` with `(provider, row)` published under `request_key`.
    ///
    /// `lock` belongs to the calling criterion and is held from publishing to
    /// restoring. An empty `request_key` runs `thunk` against the scope as it
    /// is. Errors (and panics) from `thunk` reach the caller only after the
    /// previous value of `request_key` is back in place.
    pub fn with_row<F, R>(
        &self,
        lock: &ReentrantMutex<()>,
        request_key: &str,
        provider: &Arc<dyn TableDataProvider>,
        row: &RowKey,
        thunk: F,
    ) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        let _lock = lock.lock();
        if request_key.is_empty() {
            return thunk(self);
        }
        tracing::trace!(target: targets::CRITERIA, request_key, row = row.id(), "publishing row");
        let _guard = self
            .scope
            .publish_row(request_key, RowBinding::new(provider.clone(), row.clone()));
        thunk(self)
    }
}

static_assertions::assert_impl_all!(RequestScope: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::expression::RowExpressionEvaluator;
    use crate::model::provider::{FieldKey, MemoryDataProvider};
    use horizon_grid_core::GridError;

    fn provider() -> Arc<dyn TableDataProvider> {
        Arc::new(MemoryDataProvider::with_rows(
            vec![FieldKey::new("name")],
            vec![vec![CellValue::from("Alice")], vec![CellValue::from("Bob")]],
        ))
    }

    #[test]
    fn test_with_row_publishes_and_restores() {
        let scope = RequestScope::new();
        let evaluator = RowExpressionEvaluator::new();
        let ctx = EvaluationContext::new(&scope, &evaluator);
        let lock = ReentrantMutex::new(());
        let provider = provider();

        scope.put("currentRow", CellValue::from("outer"));
        let seen = ctx.with_row(&lock, "currentRow", &provider, &RowKey::new("1"), |ctx| {
            match ctx.scope().get("currentRow") {
                Some(ScopeValue::Row(binding)) => binding.value("name").unwrap(),
                _ => CellValue::None,
            }
        });

        assert_eq!(seen.as_str(), Some("Bob"));
        assert_eq!(scope.get("currentRow"), Some(ScopeValue::Value(CellValue::from("outer"))));
    }

    #[test]
    fn test_with_row_removes_key_that_was_absent() {
        let scope = RequestScope::new();
        let evaluator = RowExpressionEvaluator::new();
        let ctx = EvaluationContext::new(&scope, &evaluator);
        let lock = ReentrantMutex::new(());

        let result: Result<()> = ctx.with_row(&lock, "row", &provider(), &RowKey::new("0"), |_| {
            Err(GridError::evaluation("#{row.x}", "boom"))
        });

        assert!(result.is_err());
        assert!(!scope.contains("row"));
    }

    #[test]
    fn test_empty_request_key_leaves_scope_untouched() {
        let scope = RequestScope::new();
        let evaluator = RowExpressionEvaluator::new();
        let ctx = EvaluationContext::new(&scope, &evaluator);
        let lock = ReentrantMutex::new(());

        let published = ctx.with_row(&lock, "", &provider(), &RowKey::new("0"), |ctx| {
            ctx.scope().contains("")
        });
        assert!(!published);
    }

    #[test]
    fn test_nested_with_row_on_same_lock() {
        let scope = RequestScope::new();
        let evaluator = RowExpressionEvaluator::new();
        let ctx = EvaluationContext::new(&scope, &evaluator);
        let lock = ReentrantMutex::new(());
        let provider = provider();

        ctx.with_row(&lock, "currentRow", &provider, &RowKey::new("0"), |ctx| {
            ctx.with_row(&lock, "currentRow", &provider, &RowKey::new("1"), |ctx| {
                let Some(ScopeValue::Row(binding)) = ctx.scope().get("currentRow") else {
                    panic!("inner row not published");
                };
                assert_eq!(binding.row_key().id(), "1");
            });
            let Some(ScopeValue::Row(binding)) = ctx.scope().get("currentRow") else {
                panic!("outer row not restored");
            };
            assert_eq!(binding.row_key().id(), "0");
        });

        assert!(!scope.contains("currentRow"));
    }

    #[test]
    fn test_restores_after_panic() {
        let scope = RequestScope::new();
        let evaluator = RowExpressionEvaluator::new();
        let lock = ReentrantMutex::new(());
        let provider = provider();
        scope.put("currentRow", CellValue::Int(7));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let ctx = EvaluationContext::new(&scope, &evaluator);
            ctx.with_row(&lock, "currentRow", &provider, &RowKey::new("0"), |_| {
                panic!("evaluator blew up");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(scope.get("currentRow"), Some(ScopeValue::Value(CellValue::Int(7))));
    }
}
