#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front-end for the SecureCheck traffic-stop dashboard.
//!
//! ```text
//! securecheck serve [--bind 127.0.0.1] [--port 8080]
//! securecheck reports
//! securecheck report <id> [--countries USA,India] [--violations DUI] [--csv out.csv]
//! securecheck sql "<query>" [--countries ...] [--violations ...] [--csv out.csv]
//! securecheck filters
//! securecheck preview [--limit 5]
//! securecheck insert --date 2020-01-15 --time 10:30:00 ... [--dry-run]
//! ```
//!
//! Running with no subcommand enters the interactive dashboard. The store
//! is configured through `DATABASE_URL` or the `SECURECHECK_DB_*`
//! variables.

mod interactive;
mod table;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use securecheck_analytics::catalog::{Catalog, run_report};
use securecheck_database::compose::free_form;
use securecheck_database::db::{ConnectionConfig, connect};
use securecheck_database::executor::QueryExecutor;
use securecheck_database::export::to_csv;
use securecheck_database::insert::{compose_insert, insert_record};
use securecheck_database::loader::DatasetLoader;
use securecheck_database_models::{FilterSelection, QueryResult};
use securecheck_server_models::DEFAULT_PREVIEW_ROWS;
use securecheck_stop_models::{StopDuration, StopRecord};

#[derive(Parser)]
#[command(name = "securecheck", about = "Traffic-stop records dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// List the predefined reports
    Reports,
    /// Run a predefined report
    Report {
        /// Report identifier (see `reports`)
        id: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Write the result to this CSV file instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run a free-form SQL statement
    Sql {
        /// The statement to run
        query: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Write the result to this CSV file instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show the available filter values
    Filters,
    /// Show the first rows of the dataset
    Preview {
        /// Number of rows to show
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        limit: usize,
    },
    /// Insert a stop record
    Insert {
        #[command(flatten)]
        record: InsertArgs,
        /// Print the statement instead of executing it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Comma-separated country names
    #[arg(long)]
    countries: Option<String>,
    /// Comma-separated violations
    #[arg(long)]
    violations: Option<String>,
}

impl FilterArgs {
    fn selection(&self) -> FilterSelection {
        FilterSelection::from_comma_lists(self.countries.as_deref(), self.violations.as_deref())
    }
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct InsertArgs {
    /// Stop date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// Stop time (HH:MM:SS)
    #[arg(long)]
    time: NaiveTime,
    /// Country name
    #[arg(long)]
    country: String,
    /// Driver gender
    #[arg(long)]
    gender: String,
    /// Driver age as recorded
    #[arg(long)]
    age_raw: i32,
    /// Driver age
    #[arg(long)]
    age: i32,
    /// Driver race
    #[arg(long)]
    race: String,
    /// Violation as recorded
    #[arg(long)]
    violation_raw: String,
    /// Violation
    #[arg(long)]
    violation: String,
    /// A search was conducted
    #[arg(long)]
    searched: bool,
    /// Search type
    #[arg(long, default_value = "")]
    search_type: String,
    /// Stop outcome
    #[arg(long)]
    outcome: String,
    /// The driver was arrested
    #[arg(long)]
    arrested: bool,
    /// Stop duration (<15, 6-15, 16-30, 30+)
    #[arg(long, value_parser = parse_duration)]
    duration: StopDuration,
    /// The stop was drug related
    #[arg(long)]
    drugs: bool,
    /// Vehicle number
    #[arg(long)]
    vehicle: String,
}

impl From<InsertArgs> for StopRecord {
    fn from(args: InsertArgs) -> Self {
        Self {
            stop_date: args.date,
            stop_time: args.time,
            country_name: args.country,
            driver_gender: args.gender,
            driver_age_raw: args.age_raw,
            driver_age: args.age,
            driver_race: args.race,
            violation_raw: args.violation_raw,
            violation: args.violation,
            search_conducted: args.searched,
            search_type: args.search_type,
            stop_outcome: args.outcome,
            is_arrested: args.arrested,
            stop_duration: args.duration,
            drugs_related_stop: args.drugs,
            vehicle_number: args.vehicle,
        }
    }
}

fn parse_duration(s: &str) -> Result<StopDuration, String> {
    s.parse()
        .map_err(|_| format!("expected one of <15, 6-15, 16-30, 30+; got '{s}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        // Only prints the statement, so it works without a configured store.
        Some(Commands::Insert {
            record,
            dry_run: true,
        }) => {
            println!("{}", compose_insert(&record.into()));
            Ok(())
        }
        command => connected(command).await,
    }
}

async fn connected(command: Option<Commands>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConnectionConfig::from_env()?;

    match command {
        None => interactive::run(config).await,
        Some(Commands::Serve { bind, port }) => serve(config, bind, port).await,
        Some(command) => run(command, QueryExecutor::new(connect(&config).await?)).await,
    }
}

async fn run(command: Commands, executor: QueryExecutor) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Reports => {
            let catalog = Catalog::new(executor.dialect());
            for entry in catalog.entries() {
                println!("{:<28} {}", entry.id, entry.label);
            }
        }
        Commands::Report { id, filters, csv } => {
            let catalog = Catalog::new(executor.dialect());
            let entry = catalog.lookup(&id)?;
            println!("{}\n", entry.label);
            let result = run_report(&executor, &catalog, entry.id, &filters.selection()).await?;
            output(&result, csv.as_deref())?;
        }
        Commands::Sql {
            query,
            filters,
            csv,
        } => {
            let sql = free_form(&query, &filters.selection())?;
            let result = executor.execute(&sql).await?;
            output(&result, csv.as_deref())?;
        }
        Commands::Filters => {
            let options = DatasetLoader::new(executor).filter_options().await;
            println!("Countries:  {}", options.countries.join(", "));
            println!("Violations: {}", options.violations.join(", "));
        }
        Commands::Preview { limit } => {
            let load = DatasetLoader::new(executor).load().await;
            if let Some(e) = load.error {
                return Err(e.into());
            }
            print!("{}", table::render(&load.data.head(limit)));
            println!("{} record(s) in total", load.data.len());
        }
        Commands::Insert { record, .. } => {
            let record: StopRecord = record.into();
            let inserted = insert_record(&executor, &record).await?;
            println!("Inserted {inserted} record(s)");
        }
        Commands::Serve { .. } => return Err("the server runs on its own runtime".into()),
    }

    Ok(())
}

/// Prints `result` as a table, or writes it to `csv` when a path is given.
fn output(result: &QueryResult, csv: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match csv {
        Some(path) => {
            std::fs::write(path, to_csv(result)?)?;
            println!("Wrote {} row(s) to {}", result.len(), path.display());
        }
        None => print!("{}", table::render(result)),
    }
    Ok(())
}

/// Runs the API server on its own actix system.
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes. The store connection is opened inside
/// that runtime.
async fn serve(
    config: ConnectionConfig,
    bind: String,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            let connection = connect(&config).await.map_err(std::io::Error::other)?;
            let state = actix_web::web::Data::new(securecheck_server::AppState::new(
                QueryExecutor::new(connection),
            ));
            securecheck_server::serve(state, &bind, port).await
        })
    })
    .await??;
    Ok(())
}
