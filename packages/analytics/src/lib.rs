#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Predefined analytics reports over the stops table.
//!
//! The [`catalog::Catalog`] holds one SQL template per
//! [`ReportId`](securecheck_analytics_models::ReportId), rendered once for
//! the connected dialect. [`catalog::run_report`] merges the user's filter
//! into a template and executes it with bound parameters.

pub mod catalog;

use securecheck_database::{QueryError, SqlDialect};
use thiserror::Error;

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No report has the requested identifier.
    #[error("Unknown report: {id}")]
    UnknownReport {
        /// The identifier that was asked for.
        id: String,
    },

    /// The catalog was rendered for a different store than the executor
    /// talks to.
    #[error("Catalog rendered for {catalog} but connected to {store}")]
    DialectMismatch {
        /// Dialect the catalog was rendered for.
        catalog: SqlDialect,
        /// Dialect of the connected store.
        store: SqlDialect,
    },

    /// The store rejected the report query.
    #[error(transparent)]
    Query(#[from] QueryError),
}
