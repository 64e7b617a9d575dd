//! Column trees and the column-index resolver.
//!
//! A row group declares its columns as a forest of [`ColumnNode`]s; grouped
//! headers are nodes with children. Row groups never share nodes, so a sort
//! clicked in one group is carried to another by *position*: the clicked
//! column's index is computed in one tree and resolved back to a node in the
//! other.
//!
//! Every node gets an index in the same depth-first walk, children before
//! their parent:
//!
//! ```text
//! Name        (0)
//! Address     (3)
//! ├── Street  (1)
//! └── City    (2)
//! Age         (4)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use super::criteria::SortCriterion;

/// Identifies a column node. Unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u64);

static COLUMN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_column_id() -> ColumnId {
    ColumnId(COLUMN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// One displayable column, possibly grouping child columns.
///
/// Cloning a node copies its header, sort and children but issues fresh ids,
/// so a cloned tree can serve as a second row group's columns.
#[derive(Debug)]
pub struct ColumnNode {
    id: ColumnId,
    header: String,
    sort: Option<SortCriterion>,
    children: Vec<ColumnNode>,
}

impl ColumnNode {
    /// Creates a leaf column without a sort.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            id: next_column_id(),
            header: header.into(),
            sort: None,
            children: Vec::new(),
        }
    }

    /// Attaches a sort criterion (builder pattern).
    pub fn with_sort(mut self, sort: SortCriterion) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Appends a child column (builder pattern).
    pub fn with_child(mut self, child: ColumnNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the node id.
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the sort criterion, if any.
    pub fn sort(&self) -> Option<&SortCriterion> {
        self.sort.as_ref()
    }

    /// Replaces the sort criterion.
    pub fn set_sort(&mut self, sort: Option<SortCriterion>) {
        self.sort = sort;
    }

    /// Returns the sort criterion's key, if the node has a non-empty one.
    pub fn criteria_key(&self) -> Option<&str> {
        self.sort
            .as_ref()
            .map(SortCriterion::criteria_key)
            .filter(|key| !key.is_empty())
    }

    /// Returns the child columns.
    pub fn children(&self) -> &[ColumnNode] {
        &self.children
    }

    /// Appends a child column.
    pub fn push_child(&mut self, child: ColumnNode) {
        self.children.push(child);
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Clone for ColumnNode {
    fn clone(&self) -> Self {
        Self {
            id: next_column_id(),
            header: self.header.clone(),
            sort: self.sort.clone(),
            children: self.children.clone(),
        }
    }
}

fn walk<'a>(columns: &'a [ColumnNode], out: &mut Vec<&'a ColumnNode>) {
    for column in columns {
        walk(&column.children, out);
        out.push(column);
    }
}

/// Returns every node of the forest in index order.
pub fn indexed_columns(columns: &[ColumnNode]) -> Vec<&ColumnNode> {
    let mut out = Vec::new();
    walk(columns, &mut out);
    out
}

/// Returns the index of the first column whose criteria key is `key`.
///
/// An empty or absent key never matches.
pub fn index_by_key(columns: &[ColumnNode], key: Option<&str>) -> Option<usize> {
    let key = key.filter(|key| !key.is_empty())?;
    indexed_columns(columns)
        .iter()
        .position(|column| column.criteria_key() == Some(key))
}

/// Returns the column at `index`, walking the same order as [`index_by_key`].
pub fn column_by_index(columns: &[ColumnNode], index: usize) -> Option<&ColumnNode> {
    indexed_columns(columns).get(index).copied()
}

/// Returns the index of the column with the given id.
pub fn index_of(columns: &[ColumnNode], id: ColumnId) -> Option<usize> {
    indexed_columns(columns)
        .iter()
        .position(|column| column.id() == id)
}

/// Finds a column anywhere in the forest by id.
pub fn find_column(columns: &[ColumnNode], id: ColumnId) -> Option<&ColumnNode> {
    indexed_columns(columns).into_iter().find(|column| column.id() == id)
}
