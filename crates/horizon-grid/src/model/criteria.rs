//! Sort and filter criteria.
//!
//! A criterion pairs an expression (or a plain field key) with ordering or
//! matching rules. Evaluation always goes through an [`EvaluationContext`],
//! which publishes the row being looked at under the criterion's request key.

use std::fmt;
use std::sync::Arc;

use horizon_grid_core::Result;
use parking_lot::ReentrantMutex;

use super::provider::{FieldKey, RowKey, TableDataProvider};
use super::scope::EvaluationContext;
use super::value::{compare_values, ordering_sign, CellValue, Locale};

/// The scope key rows are published under unless a criterion says otherwise.
pub const DEFAULT_REQUEST_KEY: &str = "currentRow";

/// Where a sort criterion takes its per-row value from.
#[derive(Debug, Clone, PartialEq)]
pub enum SortSource {
    /// Evaluate an expression with the row published in scope.
    Expression(String),
    /// Read a provider field directly.
    Field(FieldKey),
}

/// One level of a row group's sort.
///
/// # Example
///
/// ```
/// use horizon_grid::model::SortCriterion;
///
/// let by_age = SortCriterion::by_expression("#{currentRow.age}").with_ascending(false);
/// assert_eq!(by_age.criteria_key(), "#{currentRow.age}");
/// assert!(!by_age.is_ascending());
/// ```
pub struct SortCriterion {
    source: SortSource,
    ascending: bool,
    request_key: String,
    display_name: Option<String>,
    lock: ReentrantMutex<()>,
}

impl SortCriterion {
    fn new(source: SortSource) -> Self {
        Self {
            source,
            ascending: true,
            request_key: DEFAULT_REQUEST_KEY.to_string(),
            display_name: None,
            lock: ReentrantMutex::new(()),
        }
    }

    /// Creates an ascending criterion over an expression.
    pub fn by_expression(expression: impl Into<String>) -> Self {
        Self::new(SortSource::Expression(expression.into()))
    }

    /// Creates an ascending criterion over a provider field.
    pub fn by_field(field: FieldKey) -> Self {
        Self::new(SortSource::Field(field))
    }

    /// Sets the direction (builder pattern).
    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Sets the request key (builder pattern).
    pub fn with_request_key(mut self, key: impl Into<String>) -> Self {
        self.request_key = key.into();
        self
    }

    /// Sets the display name (builder pattern).
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the value source.
    pub fn source(&self) -> &SortSource {
        &self.source
    }

    /// Returns `true` for an ascending sort.
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Sets the direction.
    pub fn set_ascending(&mut self, ascending: bool) {
        self.ascending = ascending;
    }

    /// Returns the scope key rows are published under.
    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// Sets the scope key rows are published under. Empty disables publishing.
    pub fn set_request_key(&mut self, key: impl Into<String>) {
        self.request_key = key.into();
    }

    /// Returns the key identifying this criterion: the expression text or the
    /// field id.
    pub fn criteria_key(&self) -> &str {
        match &self.source {
            SortSource::Expression(expression) => expression,
            SortSource::Field(field) => field.id(),
        }
    }

    /// Returns the display name, falling back to the criteria key.
    pub fn display_name(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.is_empty() => name,
            _ => match &self.source {
                SortSource::Field(field) => field.display_name(),
                SortSource::Expression(expression) => expression,
            },
        }
    }

    /// Sets the display name.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
    }

    /// Returns the value `row` sorts by.
    ///
    /// An empty or unresolvable expression sorts every row as
    /// `CellValue::None`. Evaluator errors are returned after the request key
    /// has been restored.
    pub fn sort_value(
        &self,
        ctx: &EvaluationContext<'_>,
        provider: &Arc<dyn TableDataProvider>,
        row: &RowKey,
    ) -> Result<CellValue> {
        let expression = match &self.source {
            SortSource::Field(field) => return provider.value(field, row),
            SortSource::Expression(expression) if expression.is_empty() => {
                return Ok(CellValue::None);
            }
            SortSource::Expression(expression) => expression,
        };
        let Some(bound) = ctx.evaluator().create(expression) else {
            return Ok(CellValue::None);
        };
        ctx.with_row(&self.lock, &self.request_key, provider, row, |ctx| {
            bound.value(ctx.scope())
        })
    }
}

impl Clone for SortCriterion {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            ascending: self.ascending,
            request_key: self.request_key.clone(),
            display_name: self.display_name.clone(),
            lock: ReentrantMutex::new(()),
        }
    }
}

impl PartialEq for SortCriterion {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.ascending == other.ascending
            && self.request_key == other.request_key
    }
}

impl fmt::Debug for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortCriterion")
            .field("key", &self.criteria_key())
            .field("ascending", &self.ascending)
            .field("request_key", &self.request_key)
            .finish()
    }
}

/// A rule deciding whether a row stays in a row group.
///
/// The evaluated value is compared against `compare_value`; the row matches
/// if the flag for the outcome (less, equal, greater) is set.
pub struct FilterCriterion {
    expression: String,
    compare_value: CellValue,
    match_less: bool,
    match_equal: bool,
    match_greater: bool,
    locale: Option<Locale>,
    include: bool,
    request_key: String,
    display_name: Option<String>,
    lock: ReentrantMutex<()>,
}

impl Default for FilterCriterion {
    fn default() -> Self {
        Self::new("", CellValue::None)
    }
}

impl FilterCriterion {
    /// Creates an "is equal to" filter.
    pub fn new(expression: impl Into<String>, compare_value: impl Into<CellValue>) -> Self {
        Self {
            expression: expression.into(),
            compare_value: compare_value.into(),
            match_less: false,
            match_equal: true,
            match_greater: false,
            locale: None,
            include: true,
            request_key: DEFAULT_REQUEST_KEY.to_string(),
            display_name: None,
            lock: ReentrantMutex::new(()),
        }
    }

    /// Sets which comparison outcomes match (builder pattern).
    pub fn with_matches(mut self, less: bool, equal: bool, greater: bool) -> Self {
        self.match_less = less;
        self.match_equal = equal;
        self.match_greater = greater;
        self
    }

    /// Sets the comparison locale (builder pattern).
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Sets whether matching rows are kept or dropped (builder pattern).
    pub fn with_include(mut self, include: bool) -> Self {
        self.include = include;
        self
    }

    /// Sets the request key (builder pattern).
    pub fn with_request_key(mut self, key: impl Into<String>) -> Self {
        self.request_key = key.into();
        self
    }

    /// Returns the expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Sets the expression text.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
    }

    /// Returns the value rows are compared against.
    pub fn compare_value(&self) -> &CellValue {
        &self.compare_value
    }

    /// Sets the value rows are compared against.
    pub fn set_compare_value(&mut self, value: impl Into<CellValue>) {
        self.compare_value = value.into();
    }

    /// Returns `true` if values less than the compare value match.
    pub fn is_match_less_than(&self) -> bool {
        self.match_less
    }

    /// Sets whether values less than the compare value match.
    pub fn set_match_less_than(&mut self, matches: bool) {
        self.match_less = matches;
    }

    /// Returns `true` if values equal to the compare value match.
    pub fn is_match_equal_to(&self) -> bool {
        self.match_equal
    }

    /// Sets whether values equal to the compare value match.
    pub fn set_match_equal_to(&mut self, matches: bool) {
        self.match_equal = matches;
    }

    /// Returns `true` if values greater than the compare value match.
    pub fn is_match_greater_than(&self) -> bool {
        self.match_greater
    }

    /// Sets whether values greater than the compare value match.
    pub fn set_match_greater_than(&mut self, matches: bool) {
        self.match_greater = matches;
    }

    /// Returns the comparison locale.
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Sets the comparison locale.
    pub fn set_locale(&mut self, locale: Option<Locale>) {
        self.locale = locale;
    }

    /// Returns `true` if matching rows are kept.
    pub fn is_include(&self) -> bool {
        self.include
    }

    /// Sets whether matching rows are kept or dropped.
    pub fn set_include(&mut self, include: bool) {
        self.include = include;
    }

    /// Returns the scope key rows are published under.
    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// Sets the scope key rows are published under. Empty disables publishing.
    pub fn set_request_key(&mut self, key: impl Into<String>) {
        self.request_key = key.into();
    }

    /// Sets the display name.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
    }

    /// Returns the display name, or a generated description such as
    /// `Include [#{currentRow.age}] is less than OR is equal to [30]`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.display_name.as_ref().filter(|name| !name.is_empty()) {
            return name.clone();
        }
        let mut out = String::from(if self.include { "Include [" } else { "Exclude [" });
        if self.expression.is_empty() {
            out.push_str("<no value expression>");
        } else {
            out.push_str(&self.expression);
        }
        out.push_str("] ");
        let outcomes = [
            (self.match_less, "is less than "),
            (self.match_equal, "is equal to "),
            (self.match_greater, "is greater than "),
        ];
        let mut any = false;
        for (_, text) in outcomes.iter().filter(|(enabled, _)| *enabled) {
            if any {
                out.push_str("OR ");
            }
            any = true;
            out.push_str(text);
        }
        out.push('[');
        out.push_str(&self.compare_value.to_string());
        out.push(']');
        out
    }

    /// Returns `true` if `row` matches.
    ///
    /// An empty or unresolvable expression matches every row. The `include`
    /// flag is not applied here; row groups apply it when filtering.
    pub fn matches(
        &self,
        ctx: &EvaluationContext<'_>,
        provider: &Arc<dyn TableDataProvider>,
        row: &RowKey,
    ) -> Result<bool> {
        if self.expression.is_empty() {
            return Ok(true);
        }
        let Some(bound) = ctx.evaluator().create(&self.expression) else {
            return Ok(true);
        };
        let value = ctx.with_row(&self.lock, &self.request_key, provider, row, |ctx| {
            bound.value(ctx.scope())
        })?;
        let outcome = compare_values(&value, &self.compare_value, self.locale.as_ref());
        Ok(match ordering_sign(outcome) {
            -1 => self.match_less,
            0 => self.match_equal,
            _ => self.match_greater,
        })
    }
}

impl Clone for FilterCriterion {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            compare_value: self.compare_value.clone(),
            match_less: self.match_less,
            match_equal: self.match_equal,
            match_greater: self.match_greater,
            locale: self.locale.clone(),
            include: self.include,
            request_key: self.request_key.clone(),
            display_name: self.display_name.clone(),
            lock: ReentrantMutex::new(()),
        }
    }
}

impl fmt::Debug for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCriterion")
            .field("expression", &self.expression)
            .field("compare_value", &self.compare_value)
            .field("less", &self.match_less)
            .field("equal", &self.match_equal)
            .field("greater", &self.match_greater)
            .field("include", &self.include)
            .finish()
    }
}

static_assertions::assert_impl_all!(SortCriterion: Send, Sync);
static_assertions::assert_impl_all!(FilterCriterion: Send, Sync);
