#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Query result and filter selection types.
//!
//! These types are the currency between the query layer and whatever
//! presents results: the executor produces [`QueryResult`]s, the dataset
//! loader derives [`FilterOptions`] from one, and the presentation layer
//! hands back a [`FilterSelection`] built from the user's current choices.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single result row keyed by column name.
pub type ResultRow = Map<String, Value>;

/// Tabular result of executing a statement.
///
/// `columns` preserves the order the store returned them in; `rows` are in
/// result order. A result with zero rows is a valid outcome, not an error.
/// When the store returns no rows the column list is empty as well, since
/// the column names are only known from the rows themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in store order.
    pub columns: Vec<String>,
    /// Result rows.
    pub rows: Vec<ResultRow>,
}

impl QueryResult {
    /// Creates a result from column names and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self { columns, rows }
    }

    /// Creates a result with no columns and no rows.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a copy holding only the first `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Sorted distinct non-null values of `column`, rendered as strings.
    ///
    /// Returns an empty list when the column is absent.
    #[must_use]
    pub fn distinct(&self, column: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(value_to_text)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Renders a scalar JSON value as plain text. `null` renders as `None`.
#[must_use]
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A categorical column the user can filter on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterField {
    /// Jurisdiction (`country_name`).
    Country,
    /// Normalized violation (`violation`).
    Violation,
}

impl FilterField {
    /// Column the field filters on.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Country => "country_name",
            Self::Violation => "violation",
        }
    }

    /// All fields in the order their predicates are emitted.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Country, Self::Violation]
    }
}

/// The user's current filter choices. Empty sets mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Chosen country names.
    #[serde(default)]
    pub countries: BTreeSet<String>,
    /// Chosen violation names.
    #[serde(default)]
    pub violations: BTreeSet<String>,
}

impl FilterSelection {
    /// Creates a selection from any iterables of values.
    #[must_use]
    pub fn new<C, V>(countries: C, violations: V) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            violations: violations.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses comma-separated country and violation lists, ignoring blank
    /// entries. Entries are trimmed, so values containing commas or edge
    /// whitespace cannot be expressed this way.
    #[must_use]
    pub fn from_comma_lists(countries: Option<&str>, violations: Option<&str>) -> Self {
        fn split(list: Option<&str>) -> BTreeSet<String> {
            list.map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
        }

        Self {
            countries: split(countries),
            violations: split(violations),
        }
    }

    /// Values chosen for `field`.
    #[must_use]
    pub const fn values(&self, field: FilterField) -> &BTreeSet<String> {
        match field {
            FilterField::Country => &self.countries,
            FilterField::Violation => &self.violations,
        }
    }

    /// Whether no field restricts anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.violations.is_empty()
    }
}

/// Choices offered for each filterable field, derived from the loaded
/// dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct country names, sorted.
    pub countries: Vec<String>,
    /// Distinct violations, sorted.
    pub violations: Vec<String>,
}

impl FilterOptions {
    /// Derives the option lists from a whole-table result.
    #[must_use]
    pub fn from_result(result: &QueryResult) -> Self {
        Self {
            countries: result.distinct(FilterField::Country.column()),
            violations: result.distinct(FilterField::Violation.column()),
        }
    }

    /// Options offered for `field`.
    #[must_use]
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Country => &self.countries,
            FilterField::Violation => &self.violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(pairs: &[(&str, Value)]) -> ResultRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn sample() -> QueryResult {
        QueryResult::new(
            vec!["country_name".to_string(), "violation".to_string()],
            vec![
                row(&[("country_name", json!("USA")), ("violation", json!("Speeding"))]),
                row(&[("country_name", json!("India")), ("violation", Value::Null)]),
                row(&[("country_name", json!("USA")), ("violation", json!("DUI"))]),
            ],
        )
    }

    #[test]
    fn distinct_is_sorted_and_skips_nulls() {
        let result = sample();
        assert_eq!(result.distinct("country_name"), vec!["India", "USA"]);
        assert_eq!(result.distinct("violation"), vec!["DUI", "Speeding"]);
        assert!(result.distinct("missing").is_empty());
    }

    #[test]
    fn head_keeps_columns() {
        let result = sample();
        let head = result.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.columns, result.columns);
        assert_eq!(result.head(10).len(), 3);
    }

    #[test]
    fn filter_options_from_empty_result_are_empty() {
        let options = FilterOptions::from_result(&QueryResult::empty());
        assert!(options.countries.is_empty());
        assert!(options.violations.is_empty());
    }

    #[test]
    fn comma_lists_ignore_blanks() {
        let selection = FilterSelection::from_comma_lists(Some("USA, India,,"), None);
        assert_eq!(selection.countries.len(), 2);
        assert!(selection.countries.contains("India"));
        assert!(selection.violations.is_empty());
        assert!(FilterSelection::from_comma_lists(None, Some(" ")).is_empty());
    }

    #[test]
    fn numbers_render_as_text() {
        let result = QueryResult::new(
            vec!["driver_age".to_string()],
            vec![row(&[("driver_age", json!(25))]), row(&[("driver_age", json!(25))])],
        );
        assert_eq!(result.distinct("driver_age"), vec!["25"]);
    }
}
