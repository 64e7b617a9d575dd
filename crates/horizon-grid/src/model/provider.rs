//! The provider contract: an abstract tabular data source.
//!
//! A provider knows nothing about how a table is displayed. It exposes its
//! columns as [`FieldKey`]s, its rows as [`RowKey`]s, and lets callers read
//! and write single cells by `(field key, row key)`.

use std::fmt;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Result, Signal};
use parking_lot::RwLock;

use super::value::CellValue;

/// Identifies a logical column in a provider.
///
/// Field keys are issued by the provider; equality is by id.
#[derive(Debug, Clone)]
pub struct FieldKey {
    id: String,
    display_name: String,
}

impl FieldKey {
    /// Creates a field key whose display name equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
        }
    }

    /// Creates a field key with a separate display name.
    pub fn with_display_name(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Returns the field id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl PartialEq for FieldKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FieldKey {}

impl std::hash::Hash for FieldKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Identifies a logical row in a provider.
///
/// Row keys are only stable within a single traversal; re-derive them after
/// the provider changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    id: String,
}

impl RowKey {
    /// Creates a row key from its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Returns the row id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Signals emitted by providers.
pub struct ProviderSignals {
    /// Emitted after a cell value is written.
    /// Args: (field key, row key, new value)
    pub value_changed: Signal<(FieldKey, RowKey, CellValue)>,
    /// Emitted after rows are added or removed.
    pub rows_changed: Signal<()>,
}

impl Default for ProviderSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderSignals {
    /// Creates a new set of provider signals.
    pub fn new() -> Self {
        Self {
            value_changed: Signal::new(),
            rows_changed: Signal::new(),
        }
    }
}

/// The core trait for tabular data sources.
///
/// # Implementation Requirements
///
/// At minimum, you must implement:
/// - [`field_keys`](TableDataProvider::field_keys) - All columns, in order
/// - [`row_count`](TableDataProvider::row_count) - Number of rows
/// - [`row_keys`](TableDataProvider::row_keys) - Up to `count` row keys
/// - [`value`](TableDataProvider::value) - Read a cell
/// - [`signals`](TableDataProvider::signals) - Change notifications
///
/// Writable providers also implement [`set_value`](TableDataProvider::set_value).
pub trait TableDataProvider: Send + Sync {
    /// Returns every field key, in column order.
    fn field_keys(&self) -> Vec<FieldKey>;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns up to `count` row keys, starting after `after` (or from the
    /// first row when `after` is `None`).
    ///
    /// Fewer keys than requested means the provider ran out of rows.
    fn row_keys(&self, count: usize, after: Option<&RowKey>) -> Vec<RowKey>;

    /// Reads the value at `(field, row)`.
    fn value(&self, field: &FieldKey, row: &RowKey) -> Result<CellValue>;

    /// Returns the signals for this provider.
    fn signals(&self) -> &ProviderSignals;

    // -------------------------------------------------------------------------
    // Optional methods with default implementations
    // -------------------------------------------------------------------------

    /// Looks up a field key by id.
    fn field_key(&self, id: &str) -> Option<FieldKey> {
        self.field_keys().into_iter().find(|key| key.id() == id)
    }

    /// Returns `true` if the row exists.
    ///
    /// The default scans every row key.
    fn is_row_available(&self, row: &RowKey) -> bool {
        self.row_keys(self.row_count(), None).contains(row)
    }

    /// Writes the value at `(field, row)`.
    ///
    /// The default rejects every write.
    fn set_value(&self, field: &FieldKey, _row: &RowKey, _value: CellValue) -> Result<()> {
        Err(GridError::ReadOnlyField(field.id().to_string()))
    }

    /// Returns `true` if the field cannot be written.
    fn is_read_only(&self, _field: &FieldKey) -> bool {
        true
    }
}

/// An in-memory provider over a fixed column list and rows of values.
///
/// Row keys are the row positions (`"0"`, `"1"`, ...), so keys shift when a
/// row is removed.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{CellValue, FieldKey, MemoryDataProvider, TableDataProvider};
///
/// let provider = MemoryDataProvider::new(vec![FieldKey::new("name"), FieldKey::new("age")]);
/// provider.push_row(vec![CellValue::from("Alice"), CellValue::from(30i64)]);
///
/// let rows = provider.row_keys(1, None);
/// let age = provider.value(&FieldKey::new("age"), &rows[0]).unwrap();
/// assert_eq!(age.as_int(), Some(30));
/// ```
pub struct MemoryDataProvider {
    fields: Vec<FieldKey>,
    read_only: RwLock<Vec<bool>>,
    rows: RwLock<Vec<Vec<CellValue>>>,
    signals: ProviderSignals,
}

impl MemoryDataProvider {
    /// Creates an empty provider with the given columns.
    pub fn new(fields: Vec<FieldKey>) -> Self {
        let read_only = vec![false; fields.len()];
        Self {
            fields,
            read_only: RwLock::new(read_only),
            rows: RwLock::new(Vec::new()),
            signals: ProviderSignals::new(),
        }
    }

    /// Creates a provider with the given columns and rows.
    ///
    /// Short rows are padded with `CellValue::None`; long rows are truncated.
    pub fn with_rows(fields: Vec<FieldKey>, rows: Vec<Vec<CellValue>>) -> Self {
        let provider = Self::new(fields);
        for row in rows {
            provider.push_row(row);
        }
        provider
    }

    /// Creates the placeholder 5x3 table shown when no data is bound.
    pub fn default_table() -> Self {
        let fields = (1..=3)
            .map(|col| FieldKey::with_display_name(format!("column{col}"), format!("Column {col}")))
            .collect();
        let rows = (1..=5)
            .map(|row| {
                (1..=3)
                    .map(|col| CellValue::from(format!("Row {row} Column {col}")))
                    .collect()
            })
            .collect();
        Self::with_rows(fields, rows)
    }

    /// Marks a column read-only (or writable again).
    pub fn set_read_only(&self, field: &FieldKey, read_only: bool) -> Result<()> {
        let column = self.column_of(field)?;
        self.read_only.write()[column] = read_only;
        Ok(())
    }

    /// Appends a row and returns its key.
    pub fn push_row(&self, mut values: Vec<CellValue>) -> RowKey {
        values.resize(self.fields.len(), CellValue::None);
        let key = {
            let mut rows = self.rows.write();
            rows.push(values);
            RowKey::new((rows.len() - 1).to_string())
        };
        self.signals.rows_changed.emit(());
        key
    }

    /// Removes the row with the given key, returning its values.
    pub fn remove_row(&self, row: &RowKey) -> Result<Vec<CellValue>> {
        let position = self.position_of(row)?;
        let removed = self.rows.write().remove(position);
        self.signals.rows_changed.emit(());
        Ok(removed)
    }

    fn column_of(&self, field: &FieldKey) -> Result<usize> {
        self.fields
            .iter()
            .position(|key| key == field)
            .ok_or_else(|| GridError::UnknownField(field.id().to_string()))
    }

    fn position_of(&self, row: &RowKey) -> Result<usize> {
        row.id()
            .parse::<usize>()
            .ok()
            .filter(|&position| position < self.rows.read().len())
            .ok_or_else(|| GridError::UnknownRow(row.id().to_string()))
    }
}

impl TableDataProvider for MemoryDataProvider {
    fn field_keys(&self) -> Vec<FieldKey> {
        self.fields.clone()
    }

    fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    fn row_keys(&self, count: usize, after: Option<&RowKey>) -> Vec<RowKey> {
        let start = match after {
            Some(row) => match self.position_of(row) {
                Ok(position) => position + 1,
                Err(_) => return Vec::new(),
            },
            None => 0,
        };
        let end = self.row_count().min(start.saturating_add(count));
        (start..end).map(|position| RowKey::new(position.to_string())).collect()
    }

    fn is_row_available(&self, row: &RowKey) -> bool {
        self.position_of(row).is_ok()
    }

    fn value(&self, field: &FieldKey, row: &RowKey) -> Result<CellValue> {
        let column = self.column_of(field)?;
        let position = self.position_of(row)?;
        Ok(self.rows.read()[position][column].clone())
    }

    fn set_value(&self, field: &FieldKey, row: &RowKey, value: CellValue) -> Result<()> {
        let column = self.column_of(field)?;
        if self.read_only.read()[column] {
            return Err(GridError::ReadOnlyField(field.id().to_string()));
        }
        let position = self.position_of(row)?;
        self.rows.write()[position][column] = value.clone();
        tracing::trace!(target: targets::PROVIDER, field = field.id(), row = row.id(), "value written");
        self.signals
            .value_changed
            .emit((field.clone(), row.clone(), value));
        Ok(())
    }

    fn is_read_only(&self, field: &FieldKey) -> bool {
        self.column_of(field)
            .map(|column| self.read_only.read()[column])
            .unwrap_or(true)
    }

    fn signals(&self) -> &ProviderSignals {
        &self.signals
    }
}

static_assertions::assert_impl_all!(MemoryDataProvider: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn people() -> MemoryDataProvider {
        MemoryDataProvider::with_rows(
            vec![FieldKey::new("name"), FieldKey::new("age")],
            vec![
                vec![CellValue::from("Charlie"), CellValue::from(35i64)],
                vec![CellValue::from("Alice"), CellValue::from(30i64)],
                vec![CellValue::from("Bob")],
            ],
        )
    }

    #[test]
    fn test_row_keys_paging() {
        let provider = people();
        assert_eq!(provider.row_count(), 3);

        let first_two = provider.row_keys(2, None);
        assert_eq!(first_two, vec![RowKey::new("0"), RowKey::new("1")]);

        let rest = provider.row_keys(10, Some(&first_two[1]));
        assert_eq!(rest, vec![RowKey::new("2")]);

        assert!(provider.row_keys(1, Some(&RowKey::new("9"))).is_empty());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let provider = people();
        let age = provider.value(&FieldKey::new("age"), &RowKey::new("2")).unwrap();
        assert!(age.is_none());
    }

    #[test]
    fn test_set_value_emits_signal() {
        let provider = people();
        let received = Arc::new(Mutex::new(Vec::new()));
        let r = received.clone();
        provider.signals().value_changed.connect(move |(field, row, value)| {
            r.lock().push((field.id().to_string(), row.id().to_string(), value.clone()));
        });

        provider
            .set_value(&FieldKey::new("age"), &RowKey::new("1"), CellValue::from(31i64))
            .unwrap();

        assert_eq!(
            *received.lock(),
            vec![("age".to_string(), "1".to_string(), CellValue::Int(31))]
        );
    }

    #[test]
    fn test_read_only_column() {
        let provider = people();
        let name = FieldKey::new("name");
        provider.set_read_only(&name, true).unwrap();

        assert!(provider.is_read_only(&name));
        let err = provider
            .set_value(&name, &RowKey::new("0"), CellValue::from("Dan"))
            .unwrap_err();
        assert_eq!(err, GridError::ReadOnlyField("name".into()));
    }

    #[test]
    fn test_unknown_field_and_row() {
        let provider = people();
        assert_eq!(
            provider.value(&FieldKey::new("email"), &RowKey::new("0")),
            Err(GridError::UnknownField("email".into()))
        );
        assert_eq!(
            provider.value(&FieldKey::new("name"), &RowKey::new("7")),
            Err(GridError::UnknownRow("7".into()))
        );
    }

    #[test]
    fn test_remove_row_shifts_keys() {
        let provider = people();
        provider.remove_row(&RowKey::new("0")).unwrap();
        assert_eq!(provider.row_count(), 2);
        let name = provider.value(&FieldKey::new("name"), &RowKey::new("0")).unwrap();
        assert_eq!(name.as_str(), Some("Alice"));
    }

    #[test]
    fn test_default_table() {
        let provider = MemoryDataProvider::default_table();
        assert_eq!(provider.row_count(), 5);
        assert_eq!(provider.field_keys().len(), 3);
        let cell = provider.value(&FieldKey::new("column3"), &RowKey::new("4")).unwrap();
        assert_eq!(cell.as_str(), Some("Row 5 Column 3"));
        assert_eq!(provider.field_key("column1").unwrap().display_name(), "Column 1");
    }
}
