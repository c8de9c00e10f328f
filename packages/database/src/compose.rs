//! Combining SQL templates with filter fragments.
//!
//! [`compose`] is the plain string splice: it knows nothing about the
//! statement and simply puts the fragment before the terminator. Appending
//! a `WHERE` fragment to a statement that already has a `WHERE`,
//! `GROUP BY`, or `LIMIT` clause yields invalid SQL, so it is reserved for
//! free-form statements where the operator controls the text.
//!
//! [`SqlTemplate`] keeps a statement split around its `WHERE` position so
//! filter predicates are merged into the template's own predicate with
//! `AND`, ahead of any grouping, ordering, or limit.

use std::fmt;

use securecheck_database_models::FilterSelection;

use crate::QueryError;
use crate::filter::{BoundFilter, build};

/// Splices `fragment` into `template` before the statement terminator.
///
/// An empty fragment returns `template` unchanged. Otherwise trailing
/// terminators and whitespace are stripped, a single space and the
/// fragment are appended, and one `;` closes the statement.
#[must_use]
pub fn compose(template: &str, fragment: &str) -> String {
    if fragment.is_empty() {
        return template.to_string();
    }

    let body = template.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("{body} {fragment};")
}

/// Prepares an operator-typed statement, appending `selection` as a
/// literal filter.
///
/// # Errors
///
/// Returns [`QueryError::EmptyStatement`] if `sql` is blank, whatever the
/// filter.
pub fn free_form(sql: &str, selection: &FilterSelection) -> Result<String, QueryError> {
    if sql.trim().is_empty() {
        return Err(QueryError::EmptyStatement);
    }
    Ok(compose(sql, &build(selection)))
}

/// A statement split into the part before `WHERE`, its own predicate, and
/// the part after.
///
/// The own predicate must be a conjunction (or a single comparison) since
/// filter predicates are joined to it with `AND` without parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplate {
    head: String,
    predicate: Option<String>,
    tail: String,
}

impl SqlTemplate {
    /// Starts a template from its `SELECT ... FROM ...` part.
    #[must_use]
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            predicate: None,
            tail: String::new(),
        }
    }

    /// Sets the template's own `WHERE` predicate (without the keyword).
    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Sets the `GROUP BY` / `ORDER BY` / `LIMIT` part.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Renders the statement without any filter.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.render(&BoundFilter::default())
    }

    /// Renders the statement with `filter`'s predicates merged into its
    /// `WHERE` clause.
    #[must_use]
    pub fn render(&self, filter: &BoundFilter) -> String {
        let predicates: Vec<&str> = self
            .predicate
            .as_deref()
            .into_iter()
            .chain(filter.predicates.iter().map(String::as_str))
            .collect();

        let mut sql = self.head.trim().to_string();
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        let tail = self.tail.trim();
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql.push(';');
        sql
    }
}

impl fmt::Display for SqlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
