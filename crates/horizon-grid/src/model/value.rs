//! Cell values and the comparison primitive used for sorting and filtering.
//!
//! Every value a provider hands out, and every value an expression produces,
//! is a [`CellValue`]. Ordering between two values is defined once, by
//! [`compare_values`]; sort criteria and filter criteria never compare values
//! any other way.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Type-erased container for a single cell.
///
/// # Example
///
/// ```
/// use horizon_grid::model::CellValue;
///
/// let data = CellValue::from("Hello");
/// assert_eq!(data.as_str(), Some("Hello"));
///
/// let data = CellValue::from(42i64);
/// assert_eq!(data.as_int(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value. Sorts before everything else.
    #[default]
    None,
    /// String data.
    String(String),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without a zone.
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns `true` if this is `CellValue::None`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns the string slice if this holds a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this holds an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float if it holds any number.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            CellValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the boolean if this holds a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date if this holds a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Consumes the value, returning the owned string if it holds one.
    pub fn into_string(self) -> Option<String> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::None => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) | CellValue::DateTime(_) => 3,
            CellValue::String(_) => 4,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::None => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::String(s.clone())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// A locale tag (for example `"en-US"`) attached to a comparison.
///
/// When present, string comparison folds case before comparing code points,
/// so `"apple"` sorts before `"Banana"`. Without a locale, strings compare by
/// code point only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale from a language tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the language tag.
    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compares two cell values.
///
/// The result is a total order, so it can drive a sort over any mix of
/// values:
///
/// - Values of different kinds order by kind: `None`, then booleans, then
///   numbers, then dates, then strings.
/// - Integers and floats compare numerically with each other. `NaN` sorts
///   after every other number and is equal to itself.
/// - Dates and date-times compare chronologically; a date is treated as
///   midnight of that day.
/// - Strings compare by code point, or case-folded first when `locale` is set.
pub fn compare_values(a: &CellValue, b: &CellValue, locale: Option<&Locale>) -> Ordering {
    let by_kind = a.kind_rank().cmp(&b.kind_rank());
    if by_kind != Ordering::Equal {
        return by_kind;
    }
    match (a, b) {
        (CellValue::Int(x), CellValue::Int(y)) => x.cmp(y),
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::String(x), CellValue::String(y)) => compare_strings(x, y, locale),
        (CellValue::Int(_) | CellValue::Float(_), _) => compare_numbers(
            a.as_float().unwrap_or(f64::NAN),
            b.as_float().unwrap_or(f64::NAN),
        ),
        (CellValue::Date(_) | CellValue::DateTime(_), _) => as_date_time(a).cmp(&as_date_time(b)),
        _ => Ordering::Equal,
    }
}

fn compare_numbers(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

fn as_date_time(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Date(d) => d.and_hms_opt(0, 0, 0),
        _ => None,
    }
}

fn compare_strings(a: &str, b: &str, locale: Option<&Locale>) -> Ordering {
    match locale {
        Some(_) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        None => a.cmp(b),
    }
}

/// Collapses an ordering into the `-1 / 0 / +1` result filters match against.
pub(crate) fn ordering_sign(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_least() {
        assert_eq!(compare_values(&CellValue::None, &CellValue::from(""), None), Ordering::Less);
        assert_eq!(compare_values(&CellValue::from(-5i64), &CellValue::None, None), Ordering::Greater);
        assert_eq!(compare_values(&CellValue::None, &CellValue::None, None), Ordering::Equal);
    }

    #[test]
    fn test_mixed_numbers() {
        assert_eq!(
            compare_values(&CellValue::Int(2), &CellValue::Float(2.5), None),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&CellValue::Float(3.0), &CellValue::Int(3), None),
            Ordering::Equal
        );
    }

    #[test]
    fn test_locale_folds_case() {
        let apple = CellValue::from("apple");
        let banana = CellValue::from("Banana");
        assert_eq!(compare_values(&apple, &banana, None), Ordering::Greater);

        let locale = Locale::new("en-US");
        assert_eq!(compare_values(&apple, &banana, Some(&locale)), Ordering::Less);
    }

    #[test]
    fn test_dates() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let later = day.and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(
            compare_values(&CellValue::from(day), &CellValue::from(later), None),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&CellValue::from(day), &CellValue::from(day.and_hms_opt(0, 0, 0).unwrap()), None),
            Ordering::Equal
        );
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let nan = CellValue::Float(f64::NAN);
        assert_eq!(compare_values(&nan, &CellValue::Float(f64::INFINITY), None), Ordering::Greater);
        assert_eq!(compare_values(&CellValue::Int(i64::MAX), &nan, None), Ordering::Less);
        assert_eq!(compare_values(&nan, &CellValue::Float(f64::NAN), None), Ordering::Equal);
    }

    #[test]
    fn test_unrelated_kinds_order_by_kind() {
        assert_eq!(
            compare_values(&CellValue::Int(10), &CellValue::from("5"), None),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&CellValue::from("5"), &CellValue::Int(9), None),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&CellValue::Bool(true), &CellValue::Int(0), None),
            Ordering::Less
        );
    }

    #[test]
    fn test_ordering_is_transitive() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let values = [
            CellValue::None,
            CellValue::Bool(false),
            CellValue::Bool(true),
            CellValue::Int(9),
            CellValue::Int(10),
            CellValue::Float(9.5),
            CellValue::Float(f64::NAN),
            CellValue::Float(-0.0),
            CellValue::Date(day),
            CellValue::DateTime(day.and_hms_opt(12, 0, 0).unwrap()),
            CellValue::from("5"),
            CellValue::from("10"),
            CellValue::from("apple"),
        ];
        for a in &values {
            for b in &values {
                let ab = compare_values(a, b, None);
                assert_eq!(ab, compare_values(b, a, None).reverse(), "{a:?} vs {b:?}");
                for c in &values {
                    let bc = compare_values(b, c, None);
                    if ab != Ordering::Greater && bc != Ordering::Greater {
                        assert_ne!(compare_values(a, c, None), Ordering::Greater, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CellValue::from(Some(3i64)), CellValue::Int(3));
        assert_eq!(CellValue::from(None::<i64>), CellValue::None);
    }
}
