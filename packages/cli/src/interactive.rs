//! Interactive dashboard.
//!
//! A menu loop over the dataset preview, the report catalog, free-form
//! SQL, and the insert form, using `dialoguer`. Query failures are
//! logged and the loop carries on; only prompt failures end it.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use securecheck_analytics::catalog::{Catalog, run_report};
use securecheck_database::compose::free_form;
use securecheck_database::db::{ConnectionConfig, connect};
use securecheck_database::executor::QueryExecutor;
use securecheck_database::insert::{compose_insert, insert_record};
use securecheck_database::loader::DatasetLoader;
use securecheck_database_models::{FilterField, FilterSelection, QueryResult};
use securecheck_server_models::DEFAULT_PREVIEW_ROWS;
use securecheck_stop_models::{StopDuration, StopRecord};

use crate::table;

/// Top-level actions in the dashboard menu.
enum Action {
    Preview,
    Report,
    Sql,
    Insert,
    Refresh,
    Serve,
    Exit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Preview,
        Self::Report,
        Self::Sql,
        Self::Insert,
        Self::Refresh,
        Self::Serve,
        Self::Exit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Preview => "Preview dataset",
            Self::Report => "Run a report",
            Self::Sql => "Run custom SQL",
            Self::Insert => "Add a stop record",
            Self::Refresh => "Reload dataset",
            Self::Serve => "Start API server",
            Self::Exit => "Exit",
        }
    }
}

/// Runs the dashboard menu loop against the store described by `config`.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or a prompt fails.
pub async fn run(config: ConnectionConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("SecureCheck Dashboard");

    let executor = QueryExecutor::new(connect(&config).await?);
    println!("Connected to {config}");
    let loader = DatasetLoader::new(executor.clone());
    let catalog = Catalog::new(executor.dialect());

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("SecureCheck")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Preview => handle_preview(&loader).await,
            Action::Report => handle_report(&executor, &catalog, &loader).await?,
            Action::Sql => handle_sql(&executor, &loader).await?,
            Action::Insert => handle_insert(&executor, &loader).await?,
            Action::Refresh => {
                loader.invalidate();
                handle_preview(&loader).await;
            }
            Action::Serve => return serve(config).await,
            Action::Exit => {
                println!("Goodbye.");
                return Ok(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_preview(loader: &DatasetLoader) {
    let load = loader.load().await;
    if let Some(e) = &load.error {
        log::error!("Error loading data: {e}");
    }
    print!("{}", table::render(&load.data.head(DEFAULT_PREVIEW_ROWS)));
    println!("{} record(s) in total", load.data.len());
}

async fn handle_report(
    executor: &QueryExecutor,
    catalog: &Catalog,
    loader: &DatasetLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<_> = catalog.entries().collect();
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label).collect();

    let idx = Select::new()
        .with_prompt("Report")
        .items(&labels)
        .default(0)
        .interact()?;
    let entry = entries[idx];

    let selection = select_filters(loader).await?;

    match run_report(executor, catalog, entry.id, &selection).await {
        Ok(result) => show(&result)?,
        Err(e) => log::error!("Report '{}' failed: {e}", entry.id),
    }
    Ok(())
}

async fn handle_sql(
    executor: &QueryExecutor,
    loader: &DatasetLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    let sql: String = Input::new()
        .with_prompt("SQL")
        .allow_empty(true)
        .interact_text()?;

    let selection = if Confirm::new()
        .with_prompt("Apply country/violation filters?")
        .default(false)
        .interact()?
    {
        select_filters(loader).await?
    } else {
        FilterSelection::default()
    };

    let result = match free_form(&sql, &selection) {
        Ok(sql) => executor.execute(&sql).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => show(&result)?,
        Err(e) => log::error!("{e}"),
    }
    Ok(())
}

async fn handle_insert(
    executor: &QueryExecutor,
    loader: &DatasetLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = prompt_record()?;

    println!("\n{}\n", compose_insert(&record));

    if !Confirm::new()
        .with_prompt("Insert this record?")
        .default(true)
        .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    match insert_record(executor, &record).await {
        Ok(inserted) => {
            loader.invalidate();
            println!("Inserted {inserted} record(s)");
        }
        Err(e) => log::error!("Insert failed: {e}"),
    }
    Ok(())
}

/// Hands the terminal to the server prompts on its own actix system.
async fn serve(config: ConnectionConfig) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            let connection = connect(&config).await.map_err(std::io::Error::other)?;
            securecheck_server::interactive::run(QueryExecutor::new(connection)).await
        })
    })
    .await??;
    Ok(())
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Offers every loaded country and violation for multi-selection. Nothing
/// picked means no restriction.
async fn select_filters(loader: &DatasetLoader) -> Result<FilterSelection, dialoguer::Error> {
    let options = loader.filter_options().await;
    let mut selection = FilterSelection::default();

    for field in FilterField::all() {
        let values = options.values(*field);
        if values.is_empty() {
            continue;
        }

        let picked = MultiSelect::new()
            .with_prompt(format!("Filter by {field} (space to toggle, enter for all)"))
            .items(values)
            .interact()?;

        let chosen = match field {
            FilterField::Country => &mut selection.countries,
            FilterField::Violation => &mut selection.violations,
        };
        chosen.extend(picked.into_iter().map(|i| values[i].clone()));
    }

    Ok(selection)
}

fn prompt_record() -> Result<StopRecord, dialoguer::Error> {
    let stop_date: NaiveDate = Input::new()
        .with_prompt("Stop date (YYYY-MM-DD)")
        .interact_text()?;
    let stop_time: NaiveTime = Input::new()
        .with_prompt("Stop time (HH:MM:SS)")
        .interact_text()?;
    let country_name: String = Input::new().with_prompt("Country").interact_text()?;
    let driver_gender: String = Input::new().with_prompt("Driver gender").interact_text()?;
    let driver_age_raw: i32 = Input::new()
        .with_prompt("Driver age (raw)")
        .interact_text()?;
    let driver_age: i32 = Input::new()
        .with_prompt("Driver age")
        .default(driver_age_raw)
        .interact_text()?;
    let driver_race: String = Input::new().with_prompt("Driver race").interact_text()?;
    let violation_raw: String = Input::new()
        .with_prompt("Violation (raw)")
        .interact_text()?;
    let violation: String = Input::new()
        .with_prompt("Violation")
        .default(violation_raw.clone())
        .interact_text()?;
    let search_conducted = Confirm::new()
        .with_prompt("Search conducted?")
        .default(false)
        .interact()?;
    let search_type: String = Input::new()
        .with_prompt("Search type")
        .allow_empty(true)
        .interact_text()?;
    let stop_outcome: String = Input::new().with_prompt("Stop outcome").interact_text()?;
    let is_arrested = Confirm::new()
        .with_prompt("Driver arrested?")
        .default(false)
        .interact()?;

    let durations = StopDuration::all();
    let labels: Vec<&str> = durations.iter().map(AsRef::as_ref).collect();
    let duration_idx = Select::new()
        .with_prompt("Stop duration")
        .items(&labels)
        .default(0)
        .interact()?;

    let drugs_related_stop = Confirm::new()
        .with_prompt("Drug related?")
        .default(false)
        .interact()?;
    let vehicle_number: String = Input::new().with_prompt("Vehicle number").interact_text()?;

    Ok(StopRecord {
        stop_date,
        stop_time,
        country_name,
        driver_gender,
        driver_age_raw,
        driver_age,
        driver_race,
        violation_raw,
        violation,
        search_conducted,
        search_type,
        stop_outcome,
        is_arrested,
        stop_duration: durations[duration_idx],
        drugs_related_stop,
        vehicle_number,
    })
}

/// Prints `result` and offers to save it as CSV.
fn show(result: &QueryResult) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", table::render(result));

    if result.is_empty() {
        return Ok(());
    }

    let path: String = Input::new()
        .with_prompt("Save as CSV (path, blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    if !path.trim().is_empty() {
        crate::output(result, Some(&PathBuf::from(path.trim())))?;
    }
    Ok(())
}
