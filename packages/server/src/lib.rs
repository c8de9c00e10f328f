#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the SecureCheck dashboard.
//!
//! Serves the stops dataset preview, filter options, the analytics report
//! catalog, free-form queries, and record inserts as JSON (and CSV for
//! downloads). The server is a thin adapter: every query goes through the
//! shared [`QueryExecutor`] and every failure comes back as a `400` with
//! an `{"error": ...}` body rather than taking the process down.

mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use securecheck_analytics::catalog::Catalog;
use securecheck_database::db::{ConnectionConfig, connect};
use securecheck_database::executor::QueryExecutor;
use securecheck_database::loader::DatasetLoader;

/// Shared application state.
pub struct AppState {
    /// Executor for reports, free-form queries, and inserts.
    pub executor: QueryExecutor,
    /// Memoized whole-table dataset.
    pub loader: DatasetLoader,
    /// Report templates rendered for the connected dialect.
    pub catalog: Catalog,
}

impl AppState {
    /// Builds the state around an executor, with a cold dataset cache.
    #[must_use]
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            catalog: Catalog::new(executor.dialect()),
            loader: DatasetLoader::new(executor.clone()),
            executor,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dataset", web::get().to(handlers::dataset))
            .route("/dataset.csv", web::get().to(handlers::dataset_csv))
            .route("/dataset/refresh", web::post().to(handlers::refresh))
            .route("/filters", web::get().to(handlers::filters))
            .route("/reports", web::get().to(handlers::reports))
            .route("/reports/{id}.csv", web::get().to(handlers::report_csv))
            .route("/reports/{id}", web::get().to(handlers::report))
            .route("/sql", web::post().to(handlers::run_sql))
            .route("/stops", web::post().to(handlers::insert_stop)),
    );
}

/// Starts the API server, logging to `RUST_LOG`.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the store cannot be reached or
/// the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    start().await
}

/// Connects using the environment configuration and serves on
/// `BIND_ADDR`:`PORT` (default `127.0.0.1:8080`). Does not touch logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid,
/// the store cannot be reached, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn start() -> std::io::Result<()> {
    let config = ConnectionConfig::from_env().map_err(std::io::Error::other)?;

    let connection = connect(&config).await.map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState::new(QueryExecutor::new(connection)));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    serve(state, &bind_addr, port).await
}

/// Serves `state` on `bind_addr`:`port` until shut down.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(state: web::Data<AppState>, bind_addr: &str, port: u16) -> std::io::Result<()> {
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
