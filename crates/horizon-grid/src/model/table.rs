//! Tables: an ordered set of row groups sharing one configuration.

use crate::config::TableConfig;

use super::column::{find_column, ColumnId, ColumnNode};
use super::criteria::{FilterCriterion, SortCriterion};
use super::row_group::{GroupDefaults, RowGroup};
use super::value::CellValue;

/// A table made of one or more row groups.
///
/// Row groups added to a table take its rows-per-page and pagination
/// defaults unless they set their own.
#[derive(Debug, Default)]
pub struct Table {
    config: TableConfig,
    groups: Vec<RowGroup>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
        }
    }

    /// Appends a row group (builder pattern).
    pub fn with_row_group(mut self, group: RowGroup) -> Self {
        self.push_row_group(group);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Replaces the configuration and re-applies its defaults to every group.
    pub fn set_config(&mut self, config: TableConfig) {
        self.config = config;
        let defaults = self.defaults();
        for group in &mut self.groups {
            group.apply_defaults(defaults);
        }
    }

    fn defaults(&self) -> GroupDefaults {
        GroupDefaults {
            rows_per_page: self.config.rows_per_page,
            paginated: self.config.pagination_controls,
        }
    }

    /// Appends a row group.
    pub fn push_row_group(&mut self, mut group: RowGroup) {
        group.apply_defaults(self.defaults());
        self.groups.push(group);
    }

    /// Returns the row groups in order.
    pub fn row_groups(&self) -> &[RowGroup] {
        &self.groups
    }

    /// Returns the row groups in order, mutably.
    pub fn row_groups_mut(&mut self) -> &mut [RowGroup] {
        &mut self.groups
    }

    /// Returns the first row group.
    pub fn first_row_group(&self) -> Option<&RowGroup> {
        self.groups.first()
    }

    /// Looks up a row group by id.
    pub fn row_group(&self, id: &str) -> Option<&RowGroup> {
        self.groups.iter().find(|group| group.id() == id)
    }

    /// Looks up a row group by id, mutably.
    pub fn row_group_mut(&mut self, id: &str) -> Option<&mut RowGroup> {
        self.groups.iter_mut().find(|group| group.id() == id)
    }

    /// Finds a column by id in any row group.
    pub fn column(&self, id: ColumnId) -> Option<&ColumnNode> {
        self.groups
            .iter()
            .find_map(|group| find_column(group.columns(), id))
    }

    /// Creates an ascending sort over `expression`, publishing rows under the
    /// configured request key.
    pub fn sort_by(&self, expression: impl Into<String>) -> SortCriterion {
        SortCriterion::by_expression(expression).with_request_key(self.config.request_map_key.clone())
    }

    /// Creates an "is equal to" filter over `expression`, publishing rows
    /// under the configured request key.
    pub fn filter_by(
        &self,
        expression: impl Into<String>,
        compare_value: impl Into<CellValue>,
    ) -> FilterCriterion {
        FilterCriterion::new(expression, compare_value).with_request_key(self.config.request_map_key.clone())
    }

    /// Returns the number of column header rows rendered: one per row group
    /// with its own headers, and at least one.
    pub fn column_headers_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|group| group.has_own_column_header())
            .count()
            .max(1)
    }
}
