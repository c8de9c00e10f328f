//! Fixtures for tests that need a populated store.
//!
//! Each fixture database is a `SQLite` file in the temp directory named
//! after the test, recreated on every call.

use chrono::{NaiveDate, NaiveTime};
use securecheck_stop_models::{StopDuration, StopRecord};
use switchy_database::Database as _;

use crate::db::{ConnectionConfig, connect};
use crate::executor::QueryExecutor;

/// `SQLite` definition of the stops table.
pub const STOPS_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS police_post_log (
    stop_date          TEXT,
    stop_time          TEXT,
    country_name       TEXT,
    driver_gender      TEXT,
    driver_age_raw     INTEGER,
    driver_age         INTEGER,
    driver_race        TEXT,
    violation_raw      TEXT,
    violation          TEXT,
    search_conducted   INTEGER,
    search_type        TEXT,
    stop_outcome       TEXT,
    is_arrested        INTEGER,
    stop_duration      TEXT,
    drugs_related_stop INTEGER,
    vehicle_number     TEXT
)";

/// Opens a fresh `SQLite` database named after `name` with an empty stops
/// table.
///
/// # Panics
///
/// Panics if the database cannot be created.
pub async fn sqlite_executor(name: &str) -> QueryExecutor {
    let path = std::env::temp_dir().join(format!("securecheck_test_{name}.db"));
    let _ = std::fs::remove_file(&path);

    let connection = connect(&ConnectionConfig::sqlite(Some(path)))
        .await
        .expect("Failed to open test database");

    connection
        .database()
        .exec_raw(STOPS_TABLE_DDL)
        .await
        .expect("Failed to create stops table");

    QueryExecutor::new(connection)
}

/// A plausible stop record for tests to tweak.
///
/// # Panics
///
/// Never in practice; the literal date and time are valid.
#[must_use]
pub fn sample_record() -> StopRecord {
    StopRecord {
        stop_date: NaiveDate::from_ymd_opt(2020, 1, 15).expect("valid date"),
        stop_time: NaiveTime::from_hms_opt(10, 30, 0).expect("valid time"),
        country_name: "USA".to_string(),
        driver_gender: "M".to_string(),
        driver_age_raw: 34,
        driver_age: 34,
        driver_race: "White".to_string(),
        violation_raw: "Speeding".to_string(),
        violation: "Speeding".to_string(),
        search_conducted: false,
        search_type: String::new(),
        stop_outcome: "Citation".to_string(),
        is_arrested: false,
        stop_duration: StopDuration::UnderFifteen,
        drugs_related_stop: false,
        vehicle_number: "ABC123".to_string(),
    }
}
