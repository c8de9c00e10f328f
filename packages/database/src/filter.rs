//! `WHERE` fragments derived from the user's filter choices.
//!
//! Two renderings of the same predicates exist. [`build`] inlines the
//! chosen values as single-quoted literals, verbatim and without escaping
//! embedded quotes; it is only safe for values taken from the loaded
//! dataset and is what the free-form surface appends. [`bind`] emits
//! placeholders plus the values to bind, and is what the report catalog
//! executes.
//!
//! Predicates are always emitted country first, then violation, so the
//! same selection renders to the same SQL every time.

use securecheck_database_models::{FilterField, FilterSelection};
use switchy_database::DatabaseValue;

use crate::SqlDialect;

/// Builds the literal filter fragment for `selection`.
///
/// Returns `""` when nothing is selected, otherwise a string starting with
/// `" WHERE "`, e.g. `" WHERE country_name IN ('USA')"`.
#[must_use]
pub fn build(selection: &FilterSelection) -> String {
    let predicates: Vec<String> = FilterField::all()
        .iter()
        .filter_map(|field| {
            let values = selection.values(*field);
            if values.is_empty() {
                return None;
            }
            let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
            Some(format!("{} IN ({})", field.column(), quoted.join(",")))
        })
        .collect();

    where_clause(&predicates)
}

/// Predicates with placeholders and the values they bind.
#[derive(Debug, Clone, Default)]
pub struct BoundFilter {
    /// One `column IN (...)` predicate per restricted field.
    pub predicates: Vec<String>,
    /// Values for the placeholders, in placeholder order.
    pub params: Vec<DatabaseValue>,
}

impl BoundFilter {
    /// Whether the filter restricts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The predicates as a `" WHERE ..."` fragment, or `""`.
    #[must_use]
    pub fn where_fragment(&self) -> String {
        where_clause(&self.predicates)
    }
}

/// Builds the parameterized form of the filter for `selection`.
///
/// Placeholders are numbered from `start_index` (1-based) so the filter
/// can follow parameters already present in the statement.
#[must_use]
pub fn bind(selection: &FilterSelection, dialect: SqlDialect, start_index: usize) -> BoundFilter {
    let mut filter = BoundFilter::default();
    let mut idx = start_index;

    for field in FilterField::all() {
        let values = selection.values(*field);
        if values.is_empty() {
            continue;
        }

        let mut placeholders = Vec::with_capacity(values.len());
        for value in values {
            placeholders.push(dialect.placeholder(idx));
            filter.params.push(DatabaseValue::String(value.clone()));
            idx += 1;
        }

        filter.predicates.push(format!(
            "{} IN ({})",
            field.column(),
            placeholders.join(", ")
        ));
    }

    filter
}

fn where_clause(predicates: &[String]) -> String {
    if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicates.join(" AND "))
    }
}
