//! A single-cursor row model over a provider.
//!
//! [`RowCursorModel`] walks a provider one row at a time. The row under the
//! cursor is exposed as a [`RowView`], a fixed-shape map from field id to
//! value that reads and writes straight through to the provider.

use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Result, Signal};

use super::provider::{FieldKey, RowKey, TableDataProvider};
use super::value::CellValue;

/// The row under the cursor, as a map from field id to value.
///
/// The set of keys is fixed when the view is created: values can be
/// replaced but keys cannot be added or removed. A view describes the row
/// the cursor was on when it was created; take a new one after moving the
/// cursor.
#[derive(Clone)]
pub struct RowView {
    provider: Arc<dyn TableDataProvider>,
    fields: Arc<[FieldKey]>,
    row_index: i64,
    row_key: RowKey,
}

impl RowView {
    /// Returns the cursor position this view was taken at.
    pub fn row_index(&self) -> i64 {
        self.row_index
    }

    /// Returns the provider row this view reads.
    pub fn row_key(&self) -> &RowKey {
        &self.row_key
    }

    fn field(&self, field_id: &str) -> Option<&FieldKey> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    /// Returns the value of `field_id`, or `None` if the row has no such field.
    pub fn get(&self, field_id: &str) -> Result<Option<CellValue>> {
        match self.field(field_id) {
            Some(field) => self.provider.value(field, &self.row_key).map(Some),
            None => Ok(None),
        }
    }

    /// Replaces the value of `field_id`, returning the previous value.
    ///
    /// Fails with [`GridError::UnsupportedMutation`] if `field_id` is not one
    /// of the row's fields.
    pub fn put(&self, field_id: &str, value: impl Into<CellValue>) -> Result<CellValue> {
        let field = self
            .field(field_id)
            .ok_or(GridError::UnsupportedMutation("insert"))?;
        let previous = self.provider.value(field, &self.row_key)?;
        self.provider.set_value(field, &self.row_key, value.into())?;
        Ok(previous)
    }

    /// Always fails: rows have a fixed set of fields.
    pub fn remove(&self, _field_id: &str) -> Result<CellValue> {
        Err(GridError::UnsupportedMutation("remove"))
    }

    /// Always fails: rows have a fixed set of fields.
    pub fn clear(&self) -> Result<()> {
        Err(GridError::UnsupportedMutation("clear"))
    }

    /// Returns the field ids in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(FieldKey::id)
    }

    /// Returns every value in column order.
    pub fn values(&self) -> Result<Vec<CellValue>> {
        self.fields
            .iter()
            .map(|field| self.provider.value(field, &self.row_key))
            .collect()
    }

    /// Iterates `(field id, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<CellValue>)> + '_ {
        self.fields
            .iter()
            .map(|field| (field.id(), self.provider.value(field, &self.row_key)))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if `field_id` is one of the row's fields.
    pub fn contains_key(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }

    /// Returns `true` if any field currently holds `value`.
    pub fn contains_value(&self, value: &CellValue) -> Result<bool> {
        Ok(self.values()?.iter().any(|candidate| candidate == value))
    }
}

impl std::fmt::Debug for RowView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowView")
            .field("row_index", &self.row_index)
            .field("row_key", &self.row_key)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Emitted when the cursor moves.
#[derive(Debug, Clone)]
pub struct RowSelected {
    /// The new cursor position.
    pub index: i64,
    /// The row at the new position, if one is available.
    pub row: Option<RowView>,
}

/// Adapts a provider to a single movable cursor.
///
/// The cursor starts before the first row, at `-1`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_grid::model::{MemoryDataProvider, RowCursorModel};
///
/// let mut model = RowCursorModel::new(Some(Arc::new(MemoryDataProvider::default_table())));
/// model.row_selected().connect(|event| {
///     println!("moved to {}", event.index);
/// });
///
/// model.set_row_index(2).unwrap();
/// let row = model.row_view().unwrap();
/// assert_eq!(row.get("column1").unwrap().unwrap().as_str(), Some("Row 3 Column 1"));
/// ```
pub struct RowCursorModel {
    provider: Option<Arc<dyn TableDataProvider>>,
    fields: Arc<[FieldKey]>,
    row_index: i64,
    row_selected: Signal<RowSelected>,
}

impl Default for RowCursorModel {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RowCursorModel {
    /// Creates a model over `provider`.
    pub fn new(provider: Option<Arc<dyn TableDataProvider>>) -> Self {
        let mut model = Self {
            provider: None,
            fields: Arc::from(Vec::new()),
            row_index: -1,
            row_selected: Signal::new(),
        };
        model.set_provider(provider);
        model
    }

    /// Returns the provider.
    pub fn provider(&self) -> Option<&Arc<dyn TableDataProvider>> {
        self.provider.as_ref()
    }

    /// Replaces the provider and re-reads its field keys.
    ///
    /// Detaching the provider moves the cursor back to `-1`.
    pub fn set_provider(&mut self, provider: Option<Arc<dyn TableDataProvider>>) {
        match &provider {
            Some(provider) => self.fields = Arc::from(provider.field_keys()),
            None => {
                self.fields = Arc::from(Vec::new());
                self.row_index = -1;
            }
        }
        self.provider = provider;
    }

    /// Returns the signal emitted when the cursor moves.
    pub fn row_selected(&self) -> &Signal<RowSelected> {
        &self.row_selected
    }

    /// Returns the cursor position.
    pub fn row_index(&self) -> i64 {
        self.row_index
    }

    /// Moves the cursor.
    ///
    /// Listeners are told synchronously, in the order they connected, when
    /// the position actually changes and a provider is attached.
    pub fn set_row_index(&mut self, row_index: i64) -> Result<()> {
        if row_index < -1 {
            return Err(GridError::InvalidRowIndex(row_index));
        }
        let previous = std::mem::replace(&mut self.row_index, row_index);
        if self.provider.is_none() || previous == row_index {
            return Ok(());
        }
        tracing::trace!(target: targets::DATA_MODEL, previous, row_index, "cursor moved");
        let row = if self.is_row_available() {
            Some(self.row_view()?)
        } else {
            None
        };
        self.row_selected.emit(RowSelected {
            index: row_index,
            row,
        });
        Ok(())
    }

    /// Returns the number of provider rows, or `-1` without a provider.
    pub fn row_count(&self) -> i64 {
        self.provider
            .as_ref()
            .map_or(-1, |provider| provider.row_count() as i64)
    }

    /// Returns the provider row under the cursor.
    ///
    /// `None` if the cursor is before the first row, or if the provider has
    /// fewer rows than the cursor position (the row went away).
    pub fn row_key(&self) -> Option<RowKey> {
        let provider = self.provider.as_ref()?;
        let index = usize::try_from(self.row_index).ok()?;
        provider.row_keys(index + 1, None).into_iter().nth(index)
    }

    /// Returns `true` if the cursor is on an available row.
    pub fn is_row_available(&self) -> bool {
        match (&self.provider, self.row_key()) {
            (Some(provider), Some(row)) => provider.is_row_available(&row),
            _ => false,
        }
    }

    /// Returns a view of the row under the cursor.
    pub fn row_view(&self) -> Result<RowView> {
        let (Some(provider), Some(row_key)) = (&self.provider, self.row_key()) else {
            return Err(GridError::RowNotAvailable(self.row_index));
        };
        if !provider.is_row_available(&row_key) {
            return Err(GridError::RowNotAvailable(self.row_index));
        }
        Ok(RowView {
            provider: provider.clone(),
            fields: self.fields.clone(),
            row_index: self.row_index,
            row_key,
        })
    }
}

static_assertions::assert_impl_all!(RowCursorModel: Send, Sync);
