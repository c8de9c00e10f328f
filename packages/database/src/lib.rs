#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Connection, query execution, and statement composition for SecureCheck.
//!
//! Uses `switchy_database` for all store access. MySQL is the production
//! backend; `SQLite` (via `rusqlite`) backs local runs and tests. Every
//! store failure is converted to a [`QueryError`] at the
//! [`executor::QueryExecutor`] boundary so nothing above this crate ever
//! sees a raw driver error.

pub mod compose;
pub mod db;
pub mod executor;
pub mod export;
pub mod filter;
pub mod insert;
pub mod loader;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
mod values;

use strum_macros::{AsRefStr, Display, EnumString};

/// SQL dialect of the connected store.
///
/// Determines placeholder syntax and the handful of functions that differ
/// between backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SqlDialect {
    /// MySQL-compatible servers.
    MySql,
    /// Embedded `SQLite`.
    Sqlite,
}

impl SqlDialect {
    /// Bound-parameter placeholder for the 1-based parameter `index`.
    #[must_use]
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::MySql => "?".to_string(),
            Self::Sqlite => format!("${index}"),
        }
    }

    /// Expression extracting the hour of day (0-23) from a time column.
    #[must_use]
    pub fn hour_of(self, column: &str) -> String {
        match self {
            Self::MySql => format!("HOUR({column})"),
            Self::Sqlite => format!("CAST(strftime('%H', {column}) AS INTEGER)"),
        }
    }
}

/// Errors that can occur while establishing the store connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The connection settings are incomplete or malformed.
    #[error("Invalid connection configuration: {message}")]
    InvalidConfig {
        /// Description of what is wrong.
        message: String,
    },

    /// The store was unreachable or rejected the credentials.
    #[error("Failed to connect to database: {message}")]
    Connect {
        /// Original driver message.
        message: String,
    },
}

/// Errors surfaced by the query executor.
///
/// Recoverable: callers report them and keep going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The store rejected or failed the statement.
    #[error("SQL execution error: {message}")]
    Store {
        /// Original store message.
        message: String,
    },

    /// The statement text was blank.
    #[error("Please enter a SQL query first.")]
    EmptyStatement,
}

impl From<switchy_database::DatabaseError> for QueryError {
    fn from(e: switchy_database::DatabaseError) -> Self {
        Self::Store {
            message: e.to_string(),
        }
    }
}
