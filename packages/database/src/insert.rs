//! Single-row `INSERT` statements for stop records.
//!
//! [`insert_record`] binds every value as a parameter. [`compose_insert`]
//! renders the same statement with the values inlined: numbers unquoted,
//! flags as `0`/`1`, and everything else single-quoted with no escaping,
//! so a value containing a quote breaks or alters the statement. It exists
//! for previewing what would be inserted and must never be executed with
//! untrusted values.

use securecheck_stop_models::{STOP_COLUMNS, STOPS_TABLE, StopRecord};
use switchy_database::DatabaseValue;

use crate::executor::QueryExecutor;
use crate::{QueryError, SqlDialect};

/// A column value of a stop record, typed by how it is stored.
enum Field {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl Field {
    fn literal(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Number(n) => n.to_string(),
            Self::Flag(b) => i32::from(*b).to_string(),
        }
    }

    fn into_value(self) -> DatabaseValue {
        match self {
            Self::Text(s) => DatabaseValue::String(s),
            Self::Number(n) => DatabaseValue::Int64(n),
            Self::Flag(b) => DatabaseValue::Int32(i32::from(b)),
        }
    }
}

/// Field values in [`STOP_COLUMNS`] order.
fn fields(record: &StopRecord) -> [Field; 16] {
    [
        Field::Text(record.stop_date.format("%Y-%m-%d").to_string()),
        Field::Text(record.stop_time.format("%H:%M:%S").to_string()),
        Field::Text(record.country_name.clone()),
        Field::Text(record.driver_gender.clone()),
        Field::Number(i64::from(record.driver_age_raw)),
        Field::Number(i64::from(record.driver_age)),
        Field::Text(record.driver_race.clone()),
        Field::Text(record.violation_raw.clone()),
        Field::Text(record.violation.clone()),
        Field::Flag(record.search_conducted),
        Field::Text(record.search_type.clone()),
        Field::Text(record.stop_outcome.clone()),
        Field::Flag(record.is_arrested),
        Field::Text(record.stop_duration.to_string()),
        Field::Flag(record.drugs_related_stop),
        Field::Text(record.vehicle_number.clone()),
    ]
}

/// Renders a literal-valued `INSERT` for `record`.
#[must_use]
pub fn compose_insert(record: &StopRecord) -> String {
    let values: Vec<String> = fields(record).iter().map(Field::literal).collect();
    format!(
        "INSERT INTO {STOPS_TABLE} ({}) VALUES ({});",
        STOP_COLUMNS.join(", "),
        values.join(", ")
    )
}

/// Builds the parameterized `INSERT` for `record` and the values to bind.
#[must_use]
pub fn insert_statement(record: &StopRecord, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
    let placeholders: Vec<String> = (1..=STOP_COLUMNS.len())
        .map(|idx| dialect.placeholder(idx))
        .collect();
    let sql = format!(
        "INSERT INTO {STOPS_TABLE} ({}) VALUES ({})",
        STOP_COLUMNS.join(", "),
        placeholders.join(", ")
    );
    let params = fields(record).into_iter().map(Field::into_value).collect();
    (sql, params)
}

/// Inserts `record` and returns the number of rows written.
///
/// # Errors
///
/// Returns [`QueryError`] if the store rejects the insert.
pub async fn insert_record(
    executor: &QueryExecutor,
    record: &StopRecord,
) -> Result<u64, QueryError> {
    let (sql, params) = insert_statement(record, executor.dialect());
    let inserted = executor.execute_write(&sql, &params).await?;
    log::info!(
        "Inserted stop record for vehicle {} ({})",
        record.vehicle_number,
        record.stop_date
    );
    Ok(inserted)
}
