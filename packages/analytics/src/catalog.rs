//! The fixed catalog of aggregate reports.
//!
//! Bucketing expressions (stop duration in minutes, time-of-day period,
//! driver age group) are generated from the enums in
//! `securecheck_stop_models`, so the SQL and the Rust classification
//! helpers cannot drift apart.
//!
//! Ratios and averages are cast to `DOUBLE` and flag counts use
//! `COUNT(CASE ...)` so every numeric column comes back as a plain
//! integer or float on both backends rather than MySQL `DECIMAL`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use securecheck_analytics_models::{ReportId, ReportSummary};
use securecheck_database::SqlDialect;
use securecheck_database::compose::SqlTemplate;
use securecheck_database::executor::QueryExecutor;
use securecheck_database::filter::bind;
use securecheck_database_models::{FilterSelection, QueryResult};
use securecheck_stop_models::{AgeGroup, DayPeriod, STOPS_TABLE, StopDuration};

use crate::AnalyticsError;

/// One report: its identifier, label, and statement template.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Stable identifier.
    pub id: ReportId,
    /// Display label.
    pub label: &'static str,
    /// Statement template, filters not yet applied.
    pub template: SqlTemplate,
}

impl CatalogEntry {
    /// Renders the statement with `selection` merged in, plus the values
    /// to bind.
    #[must_use]
    pub fn render(
        &self,
        selection: &FilterSelection,
        dialect: SqlDialect,
    ) -> (String, Vec<switchy_database::DatabaseValue>) {
        let filter = bind(selection, dialect, 1);
        (self.template.render(&filter), filter.params)
    }
}

/// All reports, rendered for one dialect. Immutable once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    dialect: SqlDialect,
    entries: BTreeMap<ReportId, CatalogEntry>,
}

impl Catalog {
    /// Renders every report for `dialect`.
    #[must_use]
    pub fn new(dialect: SqlDialect) -> Self {
        let entries = ReportId::all()
            .iter()
            .map(|&id| {
                (
                    id,
                    CatalogEntry {
                        id,
                        label: id.label(),
                        template: template(id, dialect),
                    },
                )
            })
            .collect();

        Self { dialect, entries }
    }

    /// Dialect the templates were rendered for.
    #[must_use]
    pub const fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Id and label of every report, in catalog order.
    #[must_use]
    pub fn summaries(&self) -> Vec<ReportSummary> {
        self.entries.keys().copied().map(ReportSummary::from).collect()
    }

    /// Looks up a report by identifier.
    #[must_use]
    pub fn get(&self, id: ReportId) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    /// Looks up a report by its kebab-case identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownReport`] if no report matches.
    pub fn lookup(&self, id: &str) -> Result<&CatalogEntry, AnalyticsError> {
        id.trim()
            .parse::<ReportId>()
            .ok()
            .and_then(|id| self.get(id))
            .ok_or_else(|| AnalyticsError::UnknownReport { id: id.to_string() })
    }

    /// Looks up a report by its display label.
    #[must_use]
    pub fn find_by_label(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries().find(|entry| entry.label == label)
    }
}

/// Runs report `id` restricted by `selection`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the report is unknown, the catalog was
/// rendered for another dialect, or the store rejects the query.
pub async fn run_report(
    executor: &QueryExecutor,
    catalog: &Catalog,
    id: ReportId,
    selection: &FilterSelection,
) -> Result<QueryResult, AnalyticsError> {
    if catalog.dialect() != executor.dialect() {
        return Err(AnalyticsError::DialectMismatch {
            catalog: catalog.dialect(),
            store: executor.dialect(),
        });
    }

    let entry = catalog.get(id).ok_or_else(|| AnalyticsError::UnknownReport {
        id: id.to_string(),
    })?;

    let (sql, params) = entry.render(selection, catalog.dialect());
    log::info!("Running report '{id}' with {} filter value(s)", params.len());

    Ok(executor.execute_params(&sql, &params).await?)
}

fn template(id: ReportId, dialect: SqlDialect) -> SqlTemplate {
    let from = format!("FROM {STOPS_TABLE}");

    match id {
        ReportId::TopDrugVehicles => {
            SqlTemplate::new(format!("SELECT vehicle_number, COUNT(*) AS cnt {from}"))
                .with_predicate("drugs_related_stop = 1")
                .with_tail("GROUP BY vehicle_number ORDER BY cnt DESC LIMIT 10")
        }
        ReportId::MostSearchedVehicles => {
            SqlTemplate::new(format!("SELECT vehicle_number, COUNT(*) AS searches {from}"))
                .with_predicate("search_conducted = 1")
                .with_tail("GROUP BY vehicle_number ORDER BY searches DESC LIMIT 20")
        }
        ReportId::AgeGroupArrestRate => SqlTemplate::new(format!(
            "SELECT {} AS age_group, {} AS arrest_rate, COUNT(*) AS stops {from}",
            age_group_case("driver_age"),
            rate_of("is_arrested"),
        ))
        .with_tail("GROUP BY age_group ORDER BY arrest_rate DESC"),
        ReportId::GenderByCountry => SqlTemplate::new(format!(
            "SELECT country_name, driver_gender, COUNT(*) AS cnt {from}"
        ))
        .with_tail("GROUP BY country_name, driver_gender ORDER BY country_name, cnt DESC"),
        ReportId::RaceGenderSearchRate => SqlTemplate::new(format!(
            "SELECT driver_race, driver_gender, {} AS search_rate, COUNT(*) AS stops {from}",
            rate_of("search_conducted"),
        ))
        .with_tail("GROUP BY driver_race, driver_gender ORDER BY search_rate DESC LIMIT 20"),
        ReportId::HourlyStops => SqlTemplate::new(format!(
            "SELECT {} AS hour, COUNT(*) AS stops {from}",
            dialect.hour_of("stop_time"),
        ))
        .with_predicate("stop_time IS NOT NULL")
        .with_tail("GROUP BY hour ORDER BY stops DESC, hour"),
        ReportId::AvgDurationByViolation => SqlTemplate::new(format!(
            "SELECT violation, CAST(AVG({}) AS DOUBLE) AS avg_minutes, COUNT(*) AS stops {from}",
            duration_minutes_case("stop_duration"),
        ))
        .with_tail("GROUP BY violation ORDER BY avg_minutes DESC"),
        ReportId::PeriodArrestRate => SqlTemplate::new(format!(
            "SELECT {} AS period, {} AS arrest_rate, COUNT(*) AS stops {from}",
            day_period_case(&dialect.hour_of("stop_time")),
            rate_of("is_arrested"),
        ))
        .with_tail("GROUP BY period ORDER BY arrest_rate DESC"),
        ReportId::ViolationSearchArrest => SqlTemplate::new(format!(
            "SELECT violation, {} AS searches, {} AS arrests, COUNT(*) AS stops {from}",
            count_of("search_conducted"),
            count_of("is_arrested"),
        ))
        .with_tail("GROUP BY violation ORDER BY searches DESC"),
        ReportId::YoungDriverViolations => {
            SqlTemplate::new(format!("SELECT violation, COUNT(*) AS cnt {from}"))
                .with_predicate("driver_age < 25")
                .with_tail("GROUP BY violation ORDER BY cnt DESC LIMIT 15")
        }
        ReportId::CountrySearchRanking => SqlTemplate::new(format!(
            "SELECT country_name, {} AS searches, COUNT(*) AS stops {from}",
            count_of("search_conducted"),
        ))
        .with_tail("GROUP BY country_name ORDER BY searches DESC LIMIT 20"),
    }
}

/// Number of rows where the 0/1 `flag` column is set.
fn count_of(flag: &str) -> String {
    format!("COUNT(CASE WHEN {flag} = 1 THEN 1 END)")
}

/// Fraction of rows where the 0/1 `flag` column is set.
fn rate_of(flag: &str) -> String {
    format!("CAST({} AS DOUBLE) / COUNT(*)", count_of(flag))
}

/// Maps duration buckets to minutes; unmapped values become `NULL` and
/// drop out of `AVG`.
fn duration_minutes_case(column: &str) -> String {
    let mut sql = String::from("CASE");
    for duration in StopDuration::all() {
        write!(
            sql,
            " WHEN {column} = '{duration}' THEN {}",
            duration.minutes()
        )
        .unwrap();
    }
    sql.push_str(" ELSE NULL END");
    sql
}

fn day_period_case(hour: &str) -> String {
    let mut sql = String::from("CASE");
    let mut fallback = DayPeriod::Evening;
    for period in DayPeriod::all() {
        match period.hour_range() {
            Some((lo, hi)) => {
                write!(sql, " WHEN {hour} BETWEEN {lo} AND {hi} THEN '{period}'").unwrap();
            }
            None => fallback = *period,
        }
    }
    write!(sql, " ELSE '{fallback}' END").unwrap();
    sql
}

fn age_group_case(column: &str) -> String {
    let groups = AgeGroup::all();
    let mut sql = String::from("CASE");
    for (i, group) in groups.iter().enumerate() {
        if i + 1 == groups.len() {
            write!(sql, " ELSE '{group}' END").unwrap();
            break;
        }
        match group.bounds() {
            (Some(lo), Some(hi)) => {
                write!(sql, " WHEN {column} BETWEEN {lo} AND {hi} THEN '{group}'")
            }
            (None, Some(hi)) => write!(sql, " WHEN {column} <= {hi} THEN '{group}'"),
            (Some(lo), None) => write!(sql, " WHEN {column} >= {lo} THEN '{group}'"),
            (None, None) => Ok(()),
        }
        .unwrap();
    }
    sql
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveTime;
    use securecheck_database::insert::insert_record;
    use securecheck_database::test_support::{sample_record, sqlite_executor};
    use securecheck_stop_models::StopRecord;
    use switchy_database::DatabaseValue;

    use super::*;

    fn at(hour: u32) -> StopRecord {
        let mut record = sample_record();
        record.stop_time = NaiveTime::from_hms_opt(hour, 15, 0).unwrap();
        record
    }

    #[test]
    fn catalog_has_every_report_once() {
        let catalog = Catalog::new(SqlDialect::MySql);
        let ids: Vec<ReportId> = catalog.entries().map(|e| e.id).collect();
        assert_eq!(ids, ReportId::all());

        let labels: BTreeSet<&str> = catalog.entries().map(|e| e.label).collect();
        assert_eq!(labels.len(), 11);
        assert_eq!(catalog.summaries().len(), 11);
    }

    #[test]
    fn lookup_by_id_and_label() {
        let catalog = Catalog::new(SqlDialect::Sqlite);
        assert_eq!(
            catalog.lookup("period-arrest-rate").unwrap().id,
            ReportId::PeriodArrestRate
        );
        assert!(matches!(
            catalog.lookup("drop-tables"),
            Err(AnalyticsError::UnknownReport { .. })
        ));
        assert_eq!(
            catalog
                .find_by_label(ReportId::HourlyStops.label())
                .unwrap()
                .id,
            ReportId::HourlyStops
        );
    }

    #[test]
    fn duration_case_uses_minute_mapping() {
        assert_eq!(
            duration_minutes_case("stop_duration"),
            "CASE WHEN stop_duration = '<15' THEN 7.5 WHEN stop_duration = '6-15' THEN 10.5 \
             WHEN stop_duration = '16-30' THEN 23 WHEN stop_duration = '30+' THEN 45 ELSE NULL END"
        );
    }

    #[test]
    fn period_case_buckets_hours() {
        assert_eq!(
            day_period_case("HOUR(stop_time)"),
            "CASE WHEN HOUR(stop_time) BETWEEN 0 AND 5 THEN 'Night' \
             WHEN HOUR(stop_time) BETWEEN 6 AND 17 THEN 'Day' ELSE 'Evening' END"
        );
    }

    #[test]
    fn age_case_ends_with_catch_all() {
        assert_eq!(
            age_group_case("driver_age"),
            "CASE WHEN driver_age <= 17 THEN '<18' WHEN driver_age BETWEEN 18 AND 24 THEN '18-24' \
             WHEN driver_age BETWEEN 25 AND 34 THEN '25-34' \
             WHEN driver_age BETWEEN 35 AND 49 THEN '35-49' ELSE '50+' END"
        );
    }

    #[test]
    fn mysql_templates_use_hour_function() {
        let catalog = Catalog::new(SqlDialect::MySql);
        let sql = catalog.get(ReportId::HourlyStops).unwrap().template.to_sql();
        assert_eq!(
            sql,
            "SELECT HOUR(stop_time) AS hour, COUNT(*) AS stops FROM police_post_log \
             WHERE stop_time IS NOT NULL GROUP BY hour ORDER BY stops DESC, hour;"
        );
    }

    #[test]
    fn filters_merge_into_reports_with_their_own_where() {
        let catalog = Catalog::new(SqlDialect::MySql);
        let selection = FilterSelection::new(["USA"], ["DUI", "Speeding"]);

        for entry in catalog.entries() {
            let (sql, params) = entry.render(&selection, SqlDialect::MySql);
            assert_eq!(sql.matches(" WHERE ").count(), 1, "{}: {sql}", entry.id);
            assert_eq!(sql.matches('?').count(), 3);
            assert_eq!(params.len(), 3);
            assert!(sql.ends_with(';'));
            assert_eq!(sql.matches(';').count(), 1);
        }
    }

    #[tokio::test]
    async fn every_report_runs_on_an_empty_table() {
        let executor = sqlite_executor("catalog_empty").await;
        let catalog = Catalog::new(executor.dialect());

        for id in ReportId::all() {
            let result = run_report(&executor, &catalog, *id, &FilterSelection::default())
                .await
                .unwrap_or_else(|e| panic!("{id} failed: {e}"));
            assert!(result.is_empty(), "{id} returned rows");

            let filtered = run_report(
                &executor,
                &catalog,
                *id,
                &FilterSelection::new(["USA"], ["Speeding"]),
            )
            .await
            .unwrap_or_else(|e| panic!("{id} with filter failed: {e}"));
            assert!(filtered.is_empty());
        }
    }

    #[tokio::test]
    async fn period_report_buckets_night_day_evening() {
        let executor = sqlite_executor("catalog_periods").await;
        for hour in [3, 10, 20] {
            insert_record(&executor, &at(hour)).await.unwrap();
        }
        let mut arrested = at(2);
        arrested.is_arrested = true;
        insert_record(&executor, &arrested).await.unwrap();

        let catalog = Catalog::new(executor.dialect());
        let result = run_report(
            &executor,
            &catalog,
            ReportId::PeriodArrestRate,
            &FilterSelection::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.columns, vec!["period", "arrest_rate", "stops"]);
        assert_eq!(result.len(), 3);
        let first = &result.rows[0];
        assert_eq!(first["period"], "Night");
        assert_eq!(first["stops"], 2);
        assert_eq!(first["arrest_rate"], 0.5);

        let periods: BTreeSet<String> = result
            .rows
            .iter()
            .map(|row| row["period"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            periods,
            ["Day", "Evening", "Night"]
                .into_iter()
                .map(String::from)
                .collect()
        );
    }

    #[tokio::test]
    async fn average_duration_ignores_unmapped_values() {
        let executor = sqlite_executor("catalog_durations").await;
        let mut short = sample_record();
        short.stop_duration = StopDuration::UnderFifteen;
        let mut long = sample_record();
        long.stop_duration = StopDuration::OverThirty;
        insert_record(&executor, &short).await.unwrap();
        insert_record(&executor, &long).await.unwrap();
        executor
            .execute_write(
                "INSERT INTO police_post_log (violation, stop_duration) VALUES ($1, $2)",
                &[
                    DatabaseValue::String("Speeding".to_string()),
                    DatabaseValue::String("2 hours".to_string()),
                ],
            )
            .await
            .unwrap();

        let catalog = Catalog::new(executor.dialect());
        let result = run_report(
            &executor,
            &catalog,
            ReportId::AvgDurationByViolation,
            &FilterSelection::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row["violation"], "Speeding");
        assert_eq!(row["avg_minutes"], 26.25);
        assert_eq!(row["stops"], 3);
    }

    #[tokio::test]
    async fn filter_restricts_report_with_own_predicate() {
        let executor = sqlite_executor("catalog_filtered").await;
        for (country, vehicle) in [("USA", "AAA"), ("USA", "AAA"), ("India", "BBB")] {
            let mut record = sample_record();
            record.country_name = country.to_string();
            record.vehicle_number = vehicle.to_string();
            record.drugs_related_stop = true;
            insert_record(&executor, &record).await.unwrap();
        }

        let catalog = Catalog::new(executor.dialect());
        let result = run_report(
            &executor,
            &catalog,
            ReportId::TopDrugVehicles,
            &FilterSelection::new(["India"], Vec::<String>::new()),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0]["vehicle_number"], "BBB");
        assert_eq!(result.rows[0]["cnt"], 1);
    }

    fn stop(edit: impl FnOnce(&mut StopRecord)) -> StopRecord {
        let mut record = sample_record();
        edit(&mut record);
        record
    }

    async fn populated(name: &str, records: Vec<StopRecord>) -> QueryExecutor {
        let executor = sqlite_executor(name).await;
        for record in &records {
            insert_record(&executor, record).await.unwrap();
        }
        executor
    }

    async fn report(executor: &QueryExecutor, id: ReportId) -> QueryResult {
        let catalog = Catalog::new(executor.dialect());
        run_report(executor, &catalog, id, &FilterSelection::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn age_groups_split_at_18_and_25() {
        let executor = populated(
            "catalog_ages",
            vec![
                stop(|r| {
                    r.driver_age = 17;
                    r.is_arrested = true;
                }),
                stop(|r| r.driver_age = 18),
                stop(|r| {
                    r.driver_age = 24;
                    r.is_arrested = true;
                }),
                stop(|r| r.driver_age = 25),
            ],
        )
        .await;

        let result = report(&executor, ReportId::AgeGroupArrestRate).await;

        assert_eq!(result.columns, vec!["age_group", "arrest_rate", "stops"]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.rows[0]["age_group"], "<18");
        assert_eq!(result.rows[0]["stops"], 1);
        assert_eq!(result.rows[0]["arrest_rate"], 1.0);
        assert_eq!(result.rows[1]["age_group"], "18-24");
        assert_eq!(result.rows[1]["stops"], 2);
        assert_eq!(result.rows[1]["arrest_rate"], 0.5);
        assert_eq!(result.rows[2]["age_group"], "25-34");
        assert_eq!(result.rows[2]["stops"], 1);
        assert_eq!(result.rows[2]["arrest_rate"], 0.0);
    }

    #[tokio::test]
    async fn hourly_stops_group_by_hour_of_day() {
        let executor = populated("catalog_hours", vec![at(10), at(22), at(10), at(0)]).await;

        let result = report(&executor, ReportId::HourlyStops).await;

        assert_eq!(result.columns, vec!["hour", "stops"]);
        let hours: Vec<(i64, i64)> = result
            .rows
            .iter()
            .map(|row| (row["hour"].as_i64().unwrap(), row["stops"].as_i64().unwrap()))
            .collect();
        assert_eq!(hours, vec![(10, 2), (0, 1), (22, 1)]);
    }

    #[tokio::test]
    async fn young_driver_report_only_counts_under_25() {
        let executor = populated(
            "catalog_young",
            vec![
                stop(|r| {
                    r.driver_age = 24;
                    r.violation = "DUI".to_string();
                }),
                stop(|r| {
                    r.driver_age = 19;
                    r.violation = "DUI".to_string();
                }),
                stop(|r| {
                    r.driver_age = 17;
                    r.violation = "Seatbelt".to_string();
                }),
                stop(|r| r.driver_age = 25),
                stop(|r| r.driver_age = 60),
            ],
        )
        .await;

        let result = report(&executor, ReportId::YoungDriverViolations).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0]["violation"], "DUI");
        assert_eq!(result.rows[0]["cnt"], 2);
        assert_eq!(result.rows[1]["violation"], "Seatbelt");
        assert_eq!(result.rows[1]["cnt"], 1);
    }

    #[tokio::test]
    async fn search_rate_by_race_and_gender() {
        let executor = populated(
            "catalog_race_gender",
            vec![
                stop(|r| r.search_conducted = true),
                stop(|_| {}),
                stop(|r| {
                    r.driver_race = "Black".to_string();
                    r.driver_gender = "F".to_string();
                    r.search_conducted = true;
                }),
            ],
        )
        .await;

        let result = report(&executor, ReportId::RaceGenderSearchRate).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0]["driver_race"], "Black");
        assert_eq!(result.rows[0]["driver_gender"], "F");
        assert_eq!(result.rows[0]["search_rate"], 1.0);
        assert_eq!(result.rows[1]["driver_race"], "White");
        assert_eq!(result.rows[1]["driver_gender"], "M");
        assert_eq!(result.rows[1]["search_rate"], 0.5);
        assert_eq!(result.rows[1]["stops"], 2);
    }

    #[tokio::test]
    async fn searches_and_arrests_per_violation() {
        let executor = populated(
            "catalog_violation_outcomes",
            vec![
                stop(|r| {
                    r.search_conducted = true;
                    r.is_arrested = true;
                }),
                stop(|_| {}),
                stop(|r| {
                    r.violation = "DUI".to_string();
                    r.search_conducted = true;
                }),
                stop(|r| {
                    r.violation = "DUI".to_string();
                    r.search_conducted = true;
                }),
            ],
        )
        .await;

        let result = report(&executor, ReportId::ViolationSearchArrest).await;

        assert_eq!(result.columns, vec!["violation", "searches", "arrests", "stops"]);
        assert_eq!(result.len(), 2);
        let dui = &result.rows[0];
        assert_eq!(dui["violation"], "DUI");
        assert_eq!(dui["searches"], 2);
        assert_eq!(dui["arrests"], 0);
        assert_eq!(dui["stops"], 2);
        let speeding = &result.rows[1];
        assert_eq!(speeding["violation"], "Speeding");
        assert_eq!(speeding["searches"], 1);
        assert_eq!(speeding["arrests"], 1);
        assert_eq!(speeding["stops"], 2);
    }

    #[tokio::test]
    async fn countries_ranked_by_searches() {
        let executor = populated(
            "catalog_country_searches",
            vec![
                stop(|r| r.search_conducted = true),
                stop(|_| {}),
                stop(|r| {
                    r.country_name = "India".to_string();
                    r.search_conducted = true;
                }),
                stop(|r| {
                    r.country_name = "India".to_string();
                    r.search_conducted = true;
                }),
            ],
        )
        .await;

        let result = report(&executor, ReportId::CountrySearchRanking).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0]["country_name"], "India");
        assert_eq!(result.rows[0]["searches"], 2);
        assert_eq!(result.rows[0]["stops"], 2);
        assert_eq!(result.rows[1]["country_name"], "USA");
        assert_eq!(result.rows[1]["searches"], 1);
        assert_eq!(result.rows[1]["stops"], 2);
    }

    #[tokio::test]
    async fn gender_counts_per_country() {
        let executor = populated(
            "catalog_gender_country",
            vec![
                stop(|_| {}),
                stop(|_| {}),
                stop(|r| r.driver_gender = "F".to_string()),
                stop(|r| {
                    r.country_name = "India".to_string();
                    r.driver_gender = "F".to_string();
                }),
            ],
        )
        .await;

        let result = report(&executor, ReportId::GenderByCountry).await;

        let counts: Vec<(&str, &str, i64)> = result
            .rows
            .iter()
            .map(|row| {
                (
                    row["country_name"].as_str().unwrap(),
                    row["driver_gender"].as_str().unwrap(),
                    row["cnt"].as_i64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            counts,
            vec![("India", "F", 1), ("USA", "M", 2), ("USA", "F", 1)]
        );
    }

    #[tokio::test]
    async fn most_searched_vehicles_skip_unsearched() {
        let executor = populated(
            "catalog_searched_vehicles",
            vec![
                stop(|r| {
                    r.vehicle_number = "AAA".to_string();
                    r.search_conducted = true;
                }),
                stop(|r| {
                    r.vehicle_number = "AAA".to_string();
                    r.search_conducted = true;
                }),
                stop(|r| {
                    r.vehicle_number = "BBB".to_string();
                    r.search_conducted = true;
                }),
                stop(|r| r.vehicle_number = "CCC".to_string()),
            ],
        )
        .await;

        let result = report(&executor, ReportId::MostSearchedVehicles).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0]["vehicle_number"], "AAA");
        assert_eq!(result.rows[0]["searches"], 2);
        assert_eq!(result.rows[1]["vehicle_number"], "BBB");
        assert_eq!(result.rows[1]["searches"], 1);
    }

    #[tokio::test]
    async fn dialect_mismatch_is_rejected() {
        let executor = sqlite_executor("catalog_mismatch").await;
        let catalog = Catalog::new(SqlDialect::MySql);

        let err = run_report(
            &executor,
            &catalog,
            ReportId::HourlyStops,
            &FilterSelection::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::DialectMismatch { .. }));
    }
}
