//! Statement execution against the connected store.
//!
//! Every call runs inside its own transaction, committed on success and
//! rolled back on failure. Store errors never escape: they come back as
//! [`QueryError`] values carrying the original message.
//!
//! No statement-type restriction is applied. The free-form query surface
//! can issue destructive statements; it is meant for trusted operators
//! only.

use securecheck_database_models::QueryResult;
use switchy_database::{Database as _, DatabaseValue};

use crate::db::Connection;
use crate::values::rows_to_result;
use crate::{QueryError, SqlDialect};

/// Runs SQL against a [`Connection`].
#[derive(Clone)]
pub struct QueryExecutor {
    connection: Connection,
}

impl QueryExecutor {
    /// Creates an executor over `connection`.
    #[must_use]
    pub const fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// The connection statements run on.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Dialect of the connected store.
    #[must_use]
    pub const fn dialect(&self) -> SqlDialect {
        self.connection.dialect()
    }

    /// Executes `sql` and returns whatever rows it produces.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the statement is blank or the store
    /// rejects it.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError> {
        self.execute_params(sql, &[]).await
    }

    /// Executes `sql` with bound `params` and returns whatever rows it
    /// produces.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the statement is blank or the store
    /// rejects it.
    pub async fn execute_params(
        &self,
        sql: &str,
        params: &[DatabaseValue],
    ) -> Result<QueryResult, QueryError> {
        if sql.trim().is_empty() {
            return Err(QueryError::EmptyStatement);
        }

        log::debug!("Executing query: {sql}");

        let txn = self.connection.database().begin_transaction().await?;

        match txn.query_raw_params(sql, params).await {
            Ok(rows) => {
                txn.commit().await?;
                let result = rows_to_result(&rows);
                log::debug!("Query returned {} row(s)", result.len());
                Ok(result)
            }
            Err(e) => {
                log::error!("Query failed: {e}");
                if let Err(rollback) = txn.rollback().await {
                    log::warn!("Failed to roll back after query error: {rollback}");
                }
                Err(e.into())
            }
        }
    }

    /// Executes a write statement with bound `params` and returns the
    /// number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the statement is blank or the store
    /// rejects it.
    pub async fn execute_write(
        &self,
        sql: &str,
        params: &[DatabaseValue],
    ) -> Result<u64, QueryError> {
        if sql.trim().is_empty() {
            return Err(QueryError::EmptyStatement);
        }

        log::debug!("Executing statement: {sql}");

        let txn = self.connection.database().begin_transaction().await?;

        match txn.exec_raw_params(sql, params).await {
            Ok(affected) => {
                txn.commit().await?;
                log::debug!("Statement affected {affected} row(s)");
                Ok(affected)
            }
            Err(e) => {
                log::error!("Statement failed: {e}");
                if let Err(rollback) = txn.rollback().await {
                    log::warn!("Failed to roll back after statement error: {rollback}");
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use switchy_database::DatabaseValue;

    use crate::QueryError;
    use crate::test_support::sqlite_executor;

    #[tokio::test]
    async fn empty_table_is_a_result_not_an_error() {
        let executor = sqlite_executor("executor_empty").await;

        let result = executor
            .execute("SELECT * FROM police_post_log;")
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(result.columns.is_empty());
    }

    #[tokio::test]
    async fn malformed_sql_becomes_query_error() {
        let executor = sqlite_executor("executor_malformed").await;

        let err = executor
            .execute("SELEC country_name FROM police_post_log")
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Store { .. }));
        assert!(err.to_string().starts_with("SQL execution error:"));
    }

    #[tokio::test]
    async fn blank_statement_is_rejected() {
        let executor = sqlite_executor("executor_blank").await;
        assert_eq!(
            executor.execute("   \n").await.unwrap_err(),
            QueryError::EmptyStatement
        );
    }

    #[tokio::test]
    async fn executor_stays_usable_after_failure() {
        let executor = sqlite_executor("executor_after_failure").await;

        assert!(executor.execute("SELECT * FROM no_such_table").await.is_err());

        let affected = executor
            .execute_write(
                "INSERT INTO police_post_log (country_name, violation) VALUES ($1, $2)",
                &[
                    DatabaseValue::String("USA".to_string()),
                    DatabaseValue::String("Speeding".to_string()),
                ],
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let result = executor
            .execute("SELECT country_name, violation FROM police_post_log")
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.columns, vec!["country_name", "violation"]);
        assert_eq!(result.rows[0]["country_name"], "USA");
    }

    #[tokio::test]
    async fn bound_parameters_filter_rows() {
        let executor = sqlite_executor("executor_params").await;

        for country in ["USA", "India", "Canada"] {
            executor
                .execute_write(
                    "INSERT INTO police_post_log (country_name) VALUES ($1)",
                    &[DatabaseValue::String(country.to_string())],
                )
                .await
                .unwrap();
        }

        let result = executor
            .execute_params(
                "SELECT country_name FROM police_post_log WHERE country_name = $1",
                &[DatabaseValue::String("India".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
    }
}
