//! The sort and pagination controller.
//!
//! [`TableController::handle_action`] is the single entry point for UI
//! gestures. Anything that cannot be applied (no table, no such row group,
//! a column without a sort, a page field that is not a number) is logged at
//! `debug` level and skipped; the table keeps its previous sort and page.

use horizon_grid_core::grid_debug;
use horizon_grid_core::logging::targets;

use super::action::{ActionEvent, ActionKind, ActionSource, SortPanel};
use super::column::{column_by_index, find_column, index_by_key, ColumnId};
use super::criteria::SortCriterion;
use super::row_group::RowGroup;
use super::table::Table;

/// What became of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action changed at least one row group.
    Applied,
    /// Nothing was changed.
    Ignored,
}

impl ActionOutcome {
    fn from_applied(applied: bool) -> Self {
        if applied {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Ignored
        }
    }
}

/// Applies sort and pagination actions to a table.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_grid::config::TableConfig;
/// use horizon_grid::model::{
///     ActionEvent, ActionOutcome, MemoryDataProvider, RowGroup, Table, TableController,
/// };
///
/// let config = TableConfig { rows_per_page: 2, pagination_controls: true, ..Default::default() };
/// let mut table = Table::new(config).with_row_group(
///     RowGroup::new("people").with_provider(Arc::new(MemoryDataProvider::default_table())),
/// );
///
/// let outcome = TableController::new().handle_action(Some(&mut table), &ActionEvent::table("last"));
/// assert_eq!(outcome, ActionOutcome::Applied);
/// assert_eq!(table.first_row_group().unwrap().page(), 3);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TableController;

impl TableController {
    /// Creates a controller.
    pub fn new() -> Self {
        Self
    }

    /// Handles one UI action.
    pub fn handle_action(&self, table: Option<&mut Table>, event: &ActionEvent) -> ActionOutcome {
        let Some(table) = table else {
            grid_debug!(target: targets::SORT, step: "process_action", action = %event.action_id, "cannot process action, table is absent");
            return ActionOutcome::Ignored;
        };
        let Some(kind) = event.kind() else {
            grid_debug!(target: targets::SORT, step: "process_action", action = %event.action_id, "unknown action id");
            return ActionOutcome::Ignored;
        };

        let applied = match kind {
            ActionKind::ClearSort => clear_sort(table),
            ActionKind::SortPanelSubmit => {
                let cleared = clear_sort(table);
                custom_sort(table, event.sort_panel.as_ref()) || cleared
            }
            kind if kind.is_sort() => match &event.source {
                ActionSource::Column { row_group, column } => {
                    column_sort(table, kind, row_group, *column)
                }
                _ => {
                    grid_debug!(target: targets::SORT, step: "sort", action = %kind, "cannot sort, action did not come from a column");
                    false
                }
            },
            kind => paginate(table, kind, &event.source, event.page_field.as_deref()),
        };
        ActionOutcome::from_applied(applied)
    }
}

fn clear_sort(table: &mut Table) -> bool {
    for group in table.row_groups_mut() {
        group.clear_sort();
    }
    !table.row_groups().is_empty()
}

fn column_sort(table: &mut Table, kind: ActionKind, row_group: &str, column: ColumnId) -> bool {
    if table.column_headers_count() > 1 {
        let Some(group) = table.row_group_mut(row_group) else {
            grid_debug!(target: targets::SORT, step: "set_sort", row_group, "cannot set sort, row group is absent");
            return false;
        };
        let Some(criterion) = find_column(group.columns(), column).and_then(|c| c.sort()).cloned() else {
            grid_debug!(target: targets::SORT, step: "set_sort", row_group, "cannot set sort, column has no sort criterion");
            return false;
        };
        set_sort(group, kind, criterion);
        return true;
    }

    let key = table
        .row_group(row_group)
        .and_then(|group| find_column(group.columns(), column))
        .or_else(|| table.column(column))
        .and_then(|c| c.criteria_key())
        .map(str::to_string);
    let Some(key) = key else {
        grid_debug!(target: targets::SORT, step: "sort", row_group, "cannot sort, column or sort criterion is absent");
        return false;
    };
    let Some(index) = canonical_index(table, &key) else {
        grid_debug!(target: targets::SORT, step: "sort", key = %key, "cannot sort, key not found in first row group");
        return false;
    };

    let mut applied = false;
    for group in table.row_groups_mut() {
        match criterion_at(group, index) {
            Some(criterion) => {
                set_sort(group, kind, criterion);
                applied = true;
            }
            None => {
                grid_debug!(target: targets::SORT, step: "sort", row_group = %group.id(), index, "no sortable column at index, skipping row group");
            }
        }
    }
    applied
}

fn canonical_index(table: &Table, key: &str) -> Option<usize> {
    table
        .first_row_group()
        .and_then(|group| index_by_key(group.columns(), Some(key)))
}

fn criterion_at(group: &RowGroup, index: usize) -> Option<SortCriterion> {
    column_by_index(group.columns(), index)
        .and_then(|column| column.sort())
        .filter(|sort| !sort.criteria_key().is_empty())
        .cloned()
}

fn set_sort(group: &mut RowGroup, kind: ActionKind, mut criterion: SortCriterion) {
    match kind {
        ActionKind::AddSort => group.add_sort(criterion),
        ActionKind::ToggleSort if group.sort_level(&criterion).is_some() => {
            criterion.set_ascending(group.is_descending_sort(&criterion));
            group.add_sort(criterion);
        }
        ActionKind::SelectSort | ActionKind::PrimarySort | ActionKind::ToggleSort => {
            group.clear_sort();
            group.add_sort(criterion);
        }
        other => {
            grid_debug!(target: targets::SORT, step: "set_sort", action = %other, "cannot add sort, not a column sort action");
        }
    }
}

fn custom_sort(table: &mut Table, panel: Option<&SortPanel>) -> bool {
    let Some(panel) = panel else {
        grid_debug!(target: targets::SORT, step: "custom_sort", "cannot custom sort, no sort panel selections");
        return false;
    };
    let levels = table.config().sort_levels;
    let mut applied = false;
    for (level, selection) in panel.levels.iter().take(levels).enumerate() {
        let Some(key) = selection.column.as_deref().filter(|key| !key.is_empty()) else {
            continue;
        };
        let Some(index) = canonical_index(table, key) else {
            grid_debug!(target: targets::SORT, step: "set_custom_sort", level, key, "cannot set custom sort, key not found");
            continue;
        };
        for group in table.row_groups_mut() {
            match criterion_at(group, index) {
                Some(mut criterion) => {
                    criterion.set_ascending(!selection.descending);
                    group.add_sort(criterion);
                    applied = true;
                }
                None => {
                    grid_debug!(target: targets::SORT, step: "set_custom_sort", row_group = %group.id(), index, "no sortable column at index, skipping row group");
                }
            }
        }
    }
    applied
}

/// Applies a pagination action to every row group, or only to the source row
/// group when the action came from one.
fn paginate(table: &mut Table, kind: ActionKind, source: &ActionSource, page_field: Option<&str>) -> bool {
    let goto = if kind == ActionKind::GotoPage {
        match page_field.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(page)) => Some(page),
            Some(Err(_)) | None => {
                grid_debug!(target: targets::PAGINATION, step: "goto_page", field = ?page_field, "cannot obtain page field value");
                return false;
            }
        }
    } else {
        None
    };

    if let ActionSource::RowGroup(row_group) = source {
        let Some(group) = table.row_group_mut(row_group) else {
            grid_debug!(target: targets::PAGINATION, step: "paginate", row_group = %row_group, action = %kind, "cannot paginate, row group is absent");
            return false;
        };
        return page_group(group, kind, goto);
    }

    let mut applied = false;
    for group in table.row_groups_mut() {
        applied |= page_group(group, kind, goto);
    }
    applied
}

fn page_group(group: &mut RowGroup, kind: ActionKind, goto: Option<i64>) -> bool {
    match kind {
        ActionKind::FirstPage => group.set_page(1),
        ActionKind::LastPage => {
            let last = group.pages();
            group.set_page(last);
        }
        ActionKind::NextPage => {
            let next = group.page() + 1;
            group.set_page(next);
        }
        ActionKind::PrevPage => {
            let prev = group.page() - 1;
            group.set_page(prev);
        }
        ActionKind::TogglePaginated => {
            let paginated = group.is_paginated();
            group.set_paginated(!paginated);
        }
        ActionKind::GotoPage => match goto {
            Some(page) => group.set_page(page),
            None => return false,
        },
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::model::action::SortPanelLevel;
    use crate::model::column::ColumnNode;
    use crate::model::provider::{FieldKey, MemoryDataProvider};
    use crate::model::value::CellValue;
    use std::sync::Arc;

    fn group(id: &str) -> RowGroup {
        let provider = MemoryDataProvider::new(vec![FieldKey::new("name"), FieldKey::new("age")]);
        for n in 0..10i64 {
            provider.push_row(vec![CellValue::from(format!("p{n}")), CellValue::from(n)]);
        }
        RowGroup::new(id)
            .with_provider(Arc::new(provider))
            .with_column(ColumnNode::new("Name").with_sort(SortCriterion::by_expression("name")))
            .with_column(ColumnNode::new("Age").with_sort(SortCriterion::by_expression("age")))
    }

    fn paged_table() -> Table {
        let config = TableConfig {
            rows_per_page: 3,
            pagination_controls: true,
            ..TableConfig::default()
        };
        Table::new(config).with_row_group(group("g1"))
    }

    fn keys(group: &RowGroup) -> Vec<(&str, bool)> {
        group
            .sorts()
            .iter()
            .map(|sort| (sort.criteria_key(), sort.is_ascending()))
            .collect()
    }

    fn column_id(table: &Table, group: &str, index: usize) -> ColumnId {
        column_by_index(table.row_group(group).unwrap().columns(), index)
            .unwrap()
            .id()
    }

    #[test]
    fn test_absent_table_is_ignored() {
        let outcome = TableController::new().handle_action(None, &ActionEvent::table("next"));
        assert_eq!(outcome, ActionOutcome::Ignored);
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let mut table = paged_table();
        let outcome = TableController::new().handle_action(Some(&mut table), &ActionEvent::table("_bogus"));
        assert_eq!(outcome, ActionOutcome::Ignored);
    }

    #[test]
    fn test_pagination_moves() {
        let controller = TableController::new();
        let mut table = paged_table();
        let page = |table: &Table| table.first_row_group().unwrap().page();

        controller.handle_action(Some(&mut table), &ActionEvent::table("last"));
        assert_eq!(page(&table), 4);
        controller.handle_action(Some(&mut table), &ActionEvent::table("_paginationPrevButton"));
        assert_eq!(page(&table), 3);
        controller.handle_action(Some(&mut table), &ActionEvent::table("next"));
        assert_eq!(page(&table), 4);
        controller.handle_action(Some(&mut table), &ActionEvent::table("next"));
        assert_eq!(page(&table), 4);
        controller.handle_action(Some(&mut table), &ActionEvent::table("first"));
        assert_eq!(page(&table), 1);
        controller.handle_action(Some(&mut table), &ActionEvent::table("prev"));
        assert_eq!(page(&table), 1);
    }

    #[test]
    fn test_goto_page() {
        let controller = TableController::new();
        let mut table = paged_table();
        let page = |table: &Table| table.first_row_group().unwrap().page();

        let outcome = controller.handle_action(
            Some(&mut table),
            &ActionEvent::table("goto-page").with_page_field(" 2 "),
        );
        assert_eq!(outcome, ActionOutcome::Applied);
        assert_eq!(page(&table), 2);

        let outcome = controller.handle_action(
            Some(&mut table),
            &ActionEvent::table("goto-page").with_page_field("two"),
        );
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(page(&table), 2);

        let outcome = controller.handle_action(Some(&mut table), &ActionEvent::table("goto-page"));
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(page(&table), 2);
    }

    #[test]
    fn test_row_group_action_pages_only_that_group() {
        let controller = TableController::new();
        let mut table = paged_table().with_row_group(group("g2"));
        let page = |table: &Table, id: &str| table.row_group(id).unwrap().page();

        let outcome = controller.handle_action(Some(&mut table), &ActionEvent::row_group("next", "g2"));
        assert_eq!(outcome, ActionOutcome::Applied);
        assert_eq!(page(&table, "g1"), 1);
        assert_eq!(page(&table, "g2"), 2);

        let outcome = controller.handle_action(
            Some(&mut table),
            &ActionEvent::row_group("goto-page", "g1").with_page_field("4"),
        );
        assert_eq!(outcome, ActionOutcome::Applied);
        assert_eq!(page(&table, "g1"), 4);
        assert_eq!(page(&table, "g2"), 2);

        controller.handle_action(Some(&mut table), &ActionEvent::table("first"));
        assert_eq!(page(&table, "g1"), 1);
        assert_eq!(page(&table, "g2"), 1);
    }

    #[test]
    fn test_absent_row_group_is_ignored() {
        let controller = TableController::new();
        let mut table = paged_table().with_row_group(group("g2"));
        controller.handle_action(Some(&mut table), &ActionEvent::table("next"));

        for id in ["next", "last", "toggle-paginated"] {
            let outcome = controller.handle_action(Some(&mut table), &ActionEvent::row_group(id, "missing"));
            assert_eq!(outcome, ActionOutcome::Ignored);
        }
        for id in ["g1", "g2"] {
            let group = table.row_group(id).unwrap();
            assert!(group.is_paginated());
            assert_eq!(group.page(), 2);
        }
    }

    #[test]
    fn test_toggle_paginated() {
        let controller = TableController::new();
        let mut table = paged_table();
        controller.handle_action(Some(&mut table), &ActionEvent::table("_paginateButton"));
        assert!(!table.first_row_group().unwrap().is_paginated());
        controller.handle_action(Some(&mut table), &ActionEvent::table("toggle-paginated"));
        assert!(table.first_row_group().unwrap().is_paginated());
    }

    #[test]
    fn test_select_versus_add() {
        let controller = TableController::new();
        let mut table = Table::default().with_row_group(group("g1"));
        let name = column_id(&table, "g1", 0);
        let age = column_id(&table, "g1", 1);

        controller.handle_action(Some(&mut table), &ActionEvent::column("select-sort", "g1", name));
        controller.handle_action(Some(&mut table), &ActionEvent::column("add-sort", "g1", age));
        assert_eq!(keys(table.first_row_group().unwrap()), [("name", true), ("age", true)]);

        controller.handle_action(Some(&mut table), &ActionEvent::column("_selectSortButton", "g1", age));
        assert_eq!(keys(table.first_row_group().unwrap()), [("age", true)]);
    }

    #[test]
    fn test_toggle_sort() {
        let controller = TableController::new();
        let mut table = Table::default().with_row_group(group("g1"));
        let name = column_id(&table, "g1", 0);
        let age = column_id(&table, "g1", 1);

        controller.handle_action(Some(&mut table), &ActionEvent::column("add-sort", "g1", name));
        controller.handle_action(Some(&mut table), &ActionEvent::column("toggle-sort", "g1", name));
        assert_eq!(keys(table.first_row_group().unwrap()), [("name", false)]);
        controller.handle_action(Some(&mut table), &ActionEvent::column("toggle-sort", "g1", name));
        assert_eq!(keys(table.first_row_group().unwrap()), [("name", true)]);

        // Not yet sorted: behaves like select.
        controller.handle_action(Some(&mut table), &ActionEvent::column("toggle-sort", "g1", age));
        assert_eq!(keys(table.first_row_group().unwrap()), [("age", true)]);
    }

    #[test]
    fn test_sort_requires_column_source() {
        let controller = TableController::new();
        let mut table = Table::default().with_row_group(group("g1"));
        let outcome = controller.handle_action(Some(&mut table), &ActionEvent::table("add-sort"));
        assert_eq!(outcome, ActionOutcome::Ignored);
    }

    #[test]
    fn test_shared_header_applies_to_every_group() {
        let controller = TableController::new();
        let mut table = Table::default()
            .with_row_group(group("g1"))
            .with_row_group(group("g2"));
        let age = column_id(&table, "g1", 1);

        controller.handle_action(Some(&mut table), &ActionEvent::column("primary-sort", "g1", age));
        for group in table.row_groups() {
            assert_eq!(keys(group), [("age", true)]);
        }
    }

    #[test]
    fn test_own_headers_apply_to_clicked_group() {
        let controller = TableController::new();
        let mut table = Table::default()
            .with_row_group(group("g1").with_own_column_header(true))
            .with_row_group(group("g2").with_own_column_header(true));
        let age = column_id(&table, "g2", 1);

        controller.handle_action(Some(&mut table), &ActionEvent::column("select-sort", "g2", age));
        assert!(table.row_group("g1").unwrap().sorts().is_empty());
        assert_eq!(keys(table.row_group("g2").unwrap()), [("age", true)]);
    }

    #[test]
    fn test_clear_sort_clears_every_group() {
        let controller = TableController::new();
        let mut table = Table::default()
            .with_row_group(group("g1"))
            .with_row_group(group("g2"));
        let age = column_id(&table, "g1", 1);
        controller.handle_action(Some(&mut table), &ActionEvent::column("select-sort", "g1", age));

        controller.handle_action(Some(&mut table), &ActionEvent::table("_clearSortButton"));
        assert!(table.row_groups().iter().all(|group| group.sort_count() == 0));
    }

    #[test]
    fn test_sort_panel_levels() {
        let controller = TableController::new();
        let mut table = Table::default()
            .with_row_group(group("g1"))
            .with_row_group(group("g2"));

        let panel = SortPanel::new(vec![
            SortPanelLevel::new("age", true),
            SortPanelLevel::none(),
            SortPanelLevel::new("name", false),
        ]);
        let outcome = controller.handle_action(
            Some(&mut table),
            &ActionEvent::table("sort-panel-submit").with_sort_panel(panel),
        );

        assert_eq!(outcome, ActionOutcome::Applied);
        for group in table.row_groups() {
            assert_eq!(keys(group), [("age", false), ("name", true)]);
        }
    }

    #[test]
    fn test_sort_panel_honours_level_limit() {
        let controller = TableController::new();
        let config = TableConfig {
            sort_levels: 1,
            ..TableConfig::default()
        };
        let mut table = Table::new(config).with_row_group(group("g1"));

        let panel = SortPanel::new(vec![SortPanelLevel::new("name", false), SortPanelLevel::new("age", false)]);
        controller.handle_action(
            Some(&mut table),
            &ActionEvent::table("_sortPanelSubmitButton").with_sort_panel(panel),
        );
        assert_eq!(keys(table.first_row_group().unwrap()), [("name", true)]);
    }

    #[test]
    fn test_group_without_column_is_skipped() {
        let controller = TableController::new();
        let short = RowGroup::new("short")
            .with_column(ColumnNode::new("Name").with_sort(SortCriterion::by_expression("name")));
        let mut table = Table::default().with_row_group(group("g1")).with_row_group(short);

        let panel = SortPanel::new(vec![SortPanelLevel::new("age", false)]);
        controller.handle_action(
            Some(&mut table),
            &ActionEvent::table("sort-panel-submit").with_sort_panel(panel),
        );
        assert_eq!(keys(table.row_group("g1").unwrap()), [("age", true)]);
        assert!(table.row_group("short").unwrap().sorts().is_empty());
    }
}
