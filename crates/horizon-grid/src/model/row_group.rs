//! Row groups: independently sorted, filtered and paged slices of a table.
//!
//! Row groups own their own page arithmetic. Controllers only ever ask for
//! "page 1", "page + 1" or "the last page"; [`RowGroup::set_page`] clamps
//! whatever it is given into range.

use std::cmp::Ordering;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{grid_debug, GridError, PerfSpan, Result};
use parking_lot::RwLock;

use super::column::ColumnNode;
use super::criteria::{FilterCriterion, SortCriterion};
use super::provider::{RowKey, TableDataProvider};
use super::scope::EvaluationContext;
use super::value::{compare_values, CellValue};

/// Rows per page when neither the row group nor its table says otherwise.
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

/// Settings a row group takes from its table unless it sets its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupDefaults {
    pub(crate) rows_per_page: usize,
    pub(crate) paginated: bool,
}

impl Default for GroupDefaults {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            paginated: false,
        }
    }
}

/// Row keys from one filter or sort pass, with the provider row count they
/// were computed against.
struct CachedRows {
    source_rows: usize,
    keys: Vec<RowKey>,
}

/// A named slice of a table with its own sort, filter and page.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_grid::model::{MemoryDataProvider, RowGroup};
///
/// let mut group = RowGroup::new("people");
/// group.set_provider(Some(Arc::new(MemoryDataProvider::default_table())));
/// group.set_paginated(true);
/// group.set_rows(2).unwrap();
///
/// assert_eq!(group.pages(), 3);
/// group.set_page(3);
/// assert_eq!(group.first(), 4);
/// ```
pub struct RowGroup {
    id: String,
    columns: Vec<ColumnNode>,
    sorts: Vec<SortCriterion>,
    filters: Vec<FilterCriterion>,
    provider: Option<Arc<dyn TableDataProvider>>,
    rows: Option<usize>,
    first: usize,
    paginated: Option<bool>,
    own_column_header: bool,
    defaults: GroupDefaults,
    filtered: RwLock<Option<CachedRows>>,
    sorted: RwLock<Option<CachedRows>>,
}

impl RowGroup {
    /// Creates an empty row group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: Vec::new(),
            sorts: Vec::new(),
            filters: Vec::new(),
            provider: None,
            rows: None,
            first: 0,
            paginated: None,
            own_column_header: false,
            defaults: GroupDefaults::default(),
            filtered: RwLock::new(None),
            sorted: RwLock::new(None),
        }
    }

    /// Sets the provider (builder pattern).
    pub fn with_provider(mut self, provider: Arc<dyn TableDataProvider>) -> Self {
        self.set_provider(Some(provider));
        self
    }

    /// Appends a top-level column (builder pattern).
    pub fn with_column(mut self, column: ColumnNode) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets whether this group renders its own column headers (builder pattern).
    pub fn with_own_column_header(mut self, own: bool) -> Self {
        self.own_column_header = own;
        self
    }

    /// Returns the group id.
    pub fn id(&self) -> &str {
        &self.id
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Returns the top-level columns.
    pub fn columns(&self) -> &[ColumnNode] {
        &self.columns
    }

    /// Replaces the columns.
    pub fn set_columns(&mut self, columns: Vec<ColumnNode>) {
        self.columns = columns;
    }

    /// Appends a top-level column.
    pub fn push_column(&mut self, column: ColumnNode) {
        self.columns.push(column);
    }

    /// Returns `true` if this group renders its own column headers.
    pub fn has_own_column_header(&self) -> bool {
        self.own_column_header
    }

    /// Sets whether this group renders its own column headers.
    pub fn set_own_column_header(&mut self, own: bool) {
        self.own_column_header = own;
    }

    // -------------------------------------------------------------------------
    // Provider
    // -------------------------------------------------------------------------

    /// Returns the provider, if one is attached.
    pub fn provider(&self) -> Option<&Arc<dyn TableDataProvider>> {
        self.provider.as_ref()
    }

    /// Attaches (or detaches) a provider and drops cached row keys.
    pub fn set_provider(&mut self, provider: Option<Arc<dyn TableDataProvider>>) {
        self.provider = provider;
        self.invalidate();
    }

    /// Drops the cached filtered and sorted row keys.
    ///
    /// Caches are also dropped on their own when the provider's row count
    /// changes. Call this after values are edited in place.
    pub fn invalidate(&self) {
        *self.filtered.write() = None;
        *self.sorted.write() = None;
    }

    /// Returns every row key of the provider, in provider order.
    pub fn row_keys(&self) -> Vec<RowKey> {
        match &self.provider {
            Some(provider) => provider.row_keys(provider.row_count(), None),
            None => {
                grid_debug!(target: targets::ROW_GROUP, step: "row_keys", group = %self.id, "no provider attached");
                Vec::new()
            }
        }
    }

    /// Returns the number of rows: the filtered count once filtering has
    /// run against the provider's current rows, otherwise the provider's
    /// count.
    pub fn row_count(&self) -> usize {
        let source_rows = self.source_row_count();
        if self.filters.is_empty() {
            return source_rows;
        }
        match self.filtered.read().as_ref() {
            Some(cached) if cached.source_rows == source_rows => cached.keys.len(),
            _ => source_rows,
        }
    }

    fn source_row_count(&self) -> usize {
        self.provider.as_ref().map_or(0, |provider| provider.row_count())
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Returns the filter criteria.
    pub fn filters(&self) -> &[FilterCriterion] {
        &self.filters
    }

    /// Replaces the filter criteria.
    pub fn set_filters(&mut self, filters: Vec<FilterCriterion>) {
        self.filters = filters;
        self.invalidate();
    }

    /// Appends a filter criterion.
    pub fn add_filter(&mut self, filter: FilterCriterion) {
        self.filters.push(filter);
        self.invalidate();
    }

    /// Removes every filter and returns to page 1.
    pub fn clear_filter(&mut self) {
        self.filters.clear();
        self.invalidate();
        self.set_page(1);
    }

    /// Returns the row keys that pass every filter.
    ///
    /// A row is kept when each criterion's match result equals its `include`
    /// flag. The result is cached until the filters or the provider change.
    pub fn filtered_row_keys(&self, ctx: &EvaluationContext<'_>) -> Result<Vec<RowKey>> {
        let source_rows = self.source_row_count();
        if let Some(cached) = self.filtered.read().as_ref().filter(|c| c.source_rows == source_rows) {
            return Ok(cached.keys.clone());
        }
        let keys = self.row_keys();
        let keys = match &self.provider {
            Some(provider) if !self.filters.is_empty() => {
                let _span = PerfSpan::new("row_group_filter");
                let mut kept = Vec::with_capacity(keys.len());
                for row in keys {
                    if self.passes_filters(ctx, provider, &row)? {
                        kept.push(row);
                    }
                }
                kept
            }
            _ => keys,
        };
        *self.filtered.write() = Some(CachedRows {
            source_rows,
            keys: keys.clone(),
        });
        Ok(keys)
    }

    fn passes_filters(
        &self,
        ctx: &EvaluationContext<'_>,
        provider: &Arc<dyn TableDataProvider>,
        row: &RowKey,
    ) -> Result<bool> {
        for filter in &self.filters {
            if filter.matches(ctx, provider, row)? != filter.is_include() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Returns the sort criteria, primary first.
    pub fn sorts(&self) -> &[SortCriterion] {
        &self.sorts
    }

    /// Replaces the sort criteria.
    pub fn set_sorts(&mut self, sorts: Vec<SortCriterion>) {
        self.sorts = sorts;
        *self.sorted.write() = None;
    }

    /// Adds a sort level and returns to page 1.
    ///
    /// A criterion with the same key as an existing level replaces it in
    /// place; otherwise it becomes the lowest-priority level.
    pub fn add_sort(&mut self, criterion: SortCriterion) {
        match self
            .sorts
            .iter_mut()
            .find(|existing| existing.criteria_key() == criterion.criteria_key())
        {
            Some(existing) => *existing = criterion,
            None => self.sorts.push(criterion),
        }
        *self.sorted.write() = None;
        self.set_page(1);
    }

    /// Removes every sort level and returns to page 1.
    pub fn clear_sort(&mut self) {
        self.sorts.clear();
        *self.sorted.write() = None;
        self.set_page(1);
    }

    /// Returns the number of sort levels.
    pub fn sort_count(&self) -> usize {
        self.sorts.len()
    }

    /// Returns the 1-based level of the sort with `criterion`'s key.
    pub fn sort_level(&self, criterion: &SortCriterion) -> Option<usize> {
        self.sorts
            .iter()
            .position(|existing| existing.criteria_key() == criterion.criteria_key())
            .map(|index| index + 1)
    }

    /// Returns `true` if the sort with `criterion`'s key is descending.
    ///
    /// A criterion that is not sorted on is not descending.
    pub fn is_descending_sort(&self, criterion: &SortCriterion) -> bool {
        self.sorts
            .iter()
            .find(|existing| existing.criteria_key() == criterion.criteria_key())
            .is_some_and(|existing| !existing.is_ascending())
    }

    /// Returns the filtered row keys in sort order.
    ///
    /// Levels are applied primary first; rows equal on every level keep
    /// their provider order. Cached until the sort, filters or provider
    /// change.
    pub fn sorted_row_keys(&self, ctx: &EvaluationContext<'_>) -> Result<Vec<RowKey>> {
        let source_rows = self.source_row_count();
        if let Some(cached) = self.sorted.read().as_ref().filter(|c| c.source_rows == source_rows) {
            return Ok(cached.keys.clone());
        }
        let keys = self.filtered_row_keys(ctx)?;
        let keys = match &self.provider {
            Some(provider) if !self.sorts.is_empty() => {
                let _span = PerfSpan::new("row_group_sort");
                let mut decorated = Vec::with_capacity(keys.len());
                for row in keys {
                    let values = self
                        .sorts
                        .iter()
                        .map(|sort| sort.sort_value(ctx, provider, &row))
                        .collect::<Result<Vec<_>>>()?;
                    decorated.push((values, row));
                }
                decorated.sort_by(|(a, _), (b, _)| self.compare_levels(a, b));
                decorated.into_iter().map(|(_, row)| row).collect()
            }
            _ => keys,
        };
        *self.sorted.write() = Some(CachedRows {
            source_rows,
            keys: keys.clone(),
        });
        Ok(keys)
    }

    fn compare_levels(&self, a: &[CellValue], b: &[CellValue]) -> Ordering {
        for ((sort, a), b) in self.sorts.iter().zip(a).zip(b) {
            let ordering = compare_values(a, b, None);
            let ordering = if sort.is_ascending() { ordering } else { ordering.reverse() };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Returns the sorted row keys on the current page.
    ///
    /// Without pagination every sorted row is returned.
    pub fn rendered_row_keys(&self, ctx: &EvaluationContext<'_>) -> Result<Vec<RowKey>> {
        let keys = self.sorted_row_keys(ctx)?;
        if !self.is_paginated() {
            return Ok(keys);
        }
        Ok(keys.into_iter().skip(self.first()).take(self.rows()).collect())
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub(crate) fn apply_defaults(&mut self, defaults: GroupDefaults) {
        self.defaults = defaults;
    }

    /// Returns `true` if rows are shown a page at a time.
    ///
    /// Unless set explicitly, this follows the table's pagination controls
    /// setting.
    pub fn is_paginated(&self) -> bool {
        self.paginated.unwrap_or(self.defaults.paginated)
    }

    /// Shows rows a page at a time, or all at once.
    pub fn set_paginated(&mut self, paginated: bool) {
        self.paginated = Some(paginated);
    }

    /// Returns rows per page: at least 1 when paginated, 0 otherwise.
    pub fn rows(&self) -> usize {
        if !self.is_paginated() {
            return 0;
        }
        self.rows.unwrap_or(self.defaults.rows_per_page).max(1)
    }

    /// Sets rows per page.
    pub fn set_rows(&mut self, rows: i64) -> Result<()> {
        let rows = usize::try_from(rows).map_err(|_| {
            grid_debug!(target: targets::ROW_GROUP, step: "set_rows", group = %self.id, rows, "rows per page cannot be < 0");
            GridError::InvalidArgument(format!("rows per page cannot be negative: {rows}"))
        })?;
        self.rows = Some(rows);
        Ok(())
    }

    /// Returns the index of the first row on the current page, never past
    /// the start of the last page. Always 0 when not paginated.
    pub fn first(&self) -> usize {
        if !self.is_paginated() {
            return 0;
        }
        self.first.min(self.last())
    }

    /// Sets the index of the first row shown.
    pub fn set_first(&mut self, first: i64) -> Result<()> {
        let first = usize::try_from(first).map_err(|_| {
            grid_debug!(target: targets::ROW_GROUP, step: "set_first", group = %self.id, first, "first row cannot be < 0");
            GridError::InvalidArgument(format!("first row cannot be negative: {first}"))
        })?;
        self.first = first;
        Ok(())
    }

    /// Returns the index of the first row on the last page.
    pub fn last(&self) -> usize {
        (self.pages().max(1) as usize - 1) * self.rows()
    }

    /// Returns the current 1-based page.
    pub fn page(&self) -> i64 {
        if !self.is_paginated() {
            return 1;
        }
        (self.first() / self.rows()) as i64 + 1
    }

    /// Returns the number of pages: 1 when not paginated, 0 for an empty
    /// paginated group.
    pub fn pages(&self) -> i64 {
        if !self.is_paginated() {
            return 1;
        }
        self.row_count().div_ceil(self.rows()) as i64
    }

    /// Moves to `page`, clamped to the first and last pages.
    pub fn set_page(&mut self, page: i64) {
        let row = page.saturating_sub(1).saturating_mul(self.rows() as i64);
        let row = row.min(self.last() as i64).max(0) as usize;
        self.first = row.min(self.row_count());
    }
}

impl std::fmt::Debug for RowGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowGroup")
            .field("id", &self.id)
            .field("sorts", &self.sorts)
            .field("filters", &self.filters)
            .field("paginated", &self.is_paginated())
            .field("first", &self.first)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(RowGroup: Send, Sync);
