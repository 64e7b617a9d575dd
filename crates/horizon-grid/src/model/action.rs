//! UI actions delivered to the table controller.
//!
//! An [`ActionEvent`] names the gesture (by action id) and carries explicit
//! references to where it came from, so the controller never has to search
//! for the enclosing table, row group or column.

use std::fmt;

use super::column::ColumnId;

/// The gestures the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Add the column's sort as a further level.
    AddSort,
    /// Replace every sort level with the column's sort.
    SelectSort,
    /// Same as [`ActionKind::SelectSort`], from the primary sort control.
    PrimarySort,
    /// Flip the column's sort direction, or select it if not sorted.
    ToggleSort,
    /// Remove every sort level of every row group.
    ClearSort,
    /// Apply the multi-level sort panel.
    SortPanelSubmit,
    /// Go to the first page.
    FirstPage,
    /// Go to the previous page.
    PrevPage,
    /// Go to the next page.
    NextPage,
    /// Go to the last page.
    LastPage,
    /// Switch between paginated and scrolling display.
    TogglePaginated,
    /// Go to the page typed into the page field.
    GotoPage,
}

impl ActionKind {
    const ALL: [ActionKind; 12] = [
        ActionKind::AddSort,
        ActionKind::SelectSort,
        ActionKind::PrimarySort,
        ActionKind::ToggleSort,
        ActionKind::ClearSort,
        ActionKind::SortPanelSubmit,
        ActionKind::FirstPage,
        ActionKind::PrevPage,
        ActionKind::NextPage,
        ActionKind::LastPage,
        ActionKind::TogglePaginated,
        ActionKind::GotoPage,
    ];

    /// Returns the canonical action id.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::AddSort => "add-sort",
            ActionKind::SelectSort => "select-sort",
            ActionKind::PrimarySort => "primary-sort",
            ActionKind::ToggleSort => "toggle-sort",
            ActionKind::ClearSort => "clear-sort",
            ActionKind::SortPanelSubmit => "sort-panel-submit",
            ActionKind::FirstPage => "first",
            ActionKind::PrevPage => "prev",
            ActionKind::NextPage => "next",
            ActionKind::LastPage => "last",
            ActionKind::TogglePaginated => "toggle-paginated",
            ActionKind::GotoPage => "goto-page",
        }
    }

    /// Returns the component ids rendered tables give controls for this action.
    fn component_ids(self) -> &'static [&'static str] {
        match self {
            ActionKind::AddSort => &["_addSortButton"],
            ActionKind::SelectSort => &["_selectSortButton"],
            ActionKind::PrimarySort => &["_primarySortButton", "_primarySortLink"],
            ActionKind::ToggleSort => &["_toggleSortButton"],
            ActionKind::ClearSort => &["_clearSortButton"],
            ActionKind::SortPanelSubmit => &["_sortPanelSubmitButton"],
            ActionKind::FirstPage => &["_paginationFirstButton"],
            ActionKind::PrevPage => &["_paginationPrevButton"],
            ActionKind::NextPage => &["_paginationNextButton"],
            ActionKind::LastPage => &["_paginationLastButton"],
            ActionKind::TogglePaginated => &["_paginateButton"],
            ActionKind::GotoPage => &["_paginationSubmitButton"],
        }
    }

    /// Parses an action id.
    ///
    /// Accepts canonical ids (`"next"`) and component ids
    /// (`"_paginationNextButton"`), optionally prefixed with a
    /// colon-separated client id path (`"form:table:_paginationNextButton"`).
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.rsplit(':').next().unwrap_or(id);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == id || kind.component_ids().iter().any(|c| *c == id))
    }

    /// Returns `true` for actions handled by the sort controller.
    pub fn is_sort(self) -> bool {
        matches!(
            self,
            ActionKind::AddSort
                | ActionKind::SelectSort
                | ActionKind::PrimarySort
                | ActionKind::ToggleSort
                | ActionKind::ClearSort
                | ActionKind::SortPanelSubmit
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an action originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSource {
    /// A table-level control (sort panel, clear sort, pagination bar).
    Table,
    /// A control belonging to a row group. Pagination actions from it only
    /// move that group.
    RowGroup(String),
    /// A column header control.
    Column {
        /// Id of the row group declaring the column.
        row_group: String,
        /// The clicked column.
        column: ColumnId,
    },
}

/// One level of the multi-level sort panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortPanelLevel {
    /// Criteria key of the chosen column; `None` or empty for "None".
    pub column: Option<String>,
    /// `true` if the level sorts descending.
    pub descending: bool,
}

impl SortPanelLevel {
    /// Creates a level sorting on `column`.
    pub fn new(column: impl Into<String>, descending: bool) -> Self {
        Self {
            column: Some(column.into()),
            descending,
        }
    }

    /// Creates a level sorting on nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

/// The selections of a submitted sort panel, primary level first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortPanel {
    /// Levels in priority order.
    pub levels: Vec<SortPanelLevel>,
}

impl SortPanel {
    /// Creates a panel from its levels.
    pub fn new(levels: Vec<SortPanelLevel>) -> Self {
        Self { levels }
    }
}

/// A discrete UI gesture aimed at a table.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{ActionEvent, ActionKind};
///
/// let event = ActionEvent::table("_paginationSubmitButton").with_page_field("3");
/// assert_eq!(event.kind(), Some(ActionKind::GotoPage));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// The action id of the control that fired.
    pub action_id: String,
    /// Where the action came from.
    pub source: ActionSource,
    /// Text of the page field, for page submits.
    pub page_field: Option<String>,
    /// Sort panel selections, for sort panel submits.
    pub sort_panel: Option<SortPanel>,
}

impl ActionEvent {
    /// Creates an event from a table-level control.
    pub fn table(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            source: ActionSource::Table,
            page_field: None,
            sort_panel: None,
        }
    }

    /// Creates an event from a row group control.
    pub fn row_group(action_id: impl Into<String>, row_group: impl Into<String>) -> Self {
        Self {
            source: ActionSource::RowGroup(row_group.into()),
            ..Self::table(action_id)
        }
    }

    /// Creates an event from a column header control.
    pub fn column(action_id: impl Into<String>, row_group: impl Into<String>, column: ColumnId) -> Self {
        Self {
            source: ActionSource::Column {
                row_group: row_group.into(),
                column,
            },
            ..Self::table(action_id)
        }
    }

    /// Attaches the page field text (builder pattern).
    pub fn with_page_field(mut self, text: impl Into<String>) -> Self {
        self.page_field = Some(text.into());
        self
    }

    /// Attaches sort panel selections (builder pattern).
    pub fn with_sort_panel(mut self, panel: SortPanel) -> Self {
        self.sort_panel = Some(panel);
        self
    }

    /// Returns the parsed action, if the id is known.
    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_id(&self.action_id)
    }
}
