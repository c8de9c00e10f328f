//! HTTP handler functions for the SecureCheck API.

use actix_web::{HttpResponse, http::header, web};
use securecheck_analytics::AnalyticsError;
use securecheck_analytics::catalog::run_report;
use securecheck_database::compose::free_form;
use securecheck_database::export::to_csv;
use securecheck_database::insert::insert_record;
use securecheck_database_models::{FilterSelection, QueryResult};
use securecheck_server_models::{
    ApiDatasetPreview, ApiError, ApiHealth, ApiInsert, ApiQueryResult, ApiRefresh, ApiReports,
    DEFAULT_PREVIEW_ROWS, DatasetPreviewParams, ReportQueryParams, RunSqlRequest,
};
use securecheck_stop_models::{STOPS_TABLE, StopRecord};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dataset`
///
/// Returns the first rows of the loaded dataset and its total size. A
/// load failure is reported in the body next to an empty preview.
pub async fn dataset(
    state: web::Data<AppState>,
    params: web::Query<DatasetPreviewParams>,
) -> HttpResponse {
    let load = state.loader.load().await;
    let limit = params.limit.unwrap_or(DEFAULT_PREVIEW_ROWS);

    HttpResponse::Ok().json(ApiDatasetPreview {
        total_rows: load.data.len(),
        preview: load.data.head(limit).into(),
        error: load.error.map(|e| e.to_string()),
    })
}

/// `GET /api/dataset.csv`
pub async fn dataset_csv(state: web::Data<AppState>) -> HttpResponse {
    let load = state.loader.load().await;
    if let Some(e) = load.error {
        return bad_request(e);
    }
    csv_response(&load.data, STOPS_TABLE)
}

/// `POST /api/dataset/refresh`
///
/// Drops the cached dataset and reads it again.
pub async fn refresh(state: web::Data<AppState>) -> HttpResponse {
    state.loader.invalidate();
    let load = state.loader.load().await;
    match load.error {
        Some(e) => bad_request(e),
        None => HttpResponse::Ok().json(ApiRefresh {
            total_rows: load.data.len(),
        }),
    }
}

/// `GET /api/filters`
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.loader.filter_options().await)
}

/// `GET /api/reports`
pub async fn reports(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiReports {
        reports: state.catalog.summaries(),
    })
}

/// `GET /api/reports/{id}`
pub async fn report(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    match report_result(&state, &path, &params.selection()).await {
        Ok(result) => HttpResponse::Ok().json(ApiQueryResult::from(result)),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/reports/{id}.csv`
pub async fn report_csv(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    match report_result(&state, &path, &params.selection()).await {
        Ok(result) => csv_response(&result, &path),
        Err(e) => analytics_error(&e),
    }
}

/// `POST /api/sql`
///
/// Runs an operator-typed statement, with the optional filter appended.
pub async fn run_sql(state: web::Data<AppState>, body: web::Json<RunSqlRequest>) -> HttpResponse {
    let RunSqlRequest { sql, filters } = body.into_inner();

    let sql = match free_form(&sql, &filters) {
        Ok(sql) => sql,
        Err(e) => return bad_request(e),
    };

    match state.executor.execute(&sql).await {
        Ok(result) => HttpResponse::Ok().json(ApiQueryResult::from(result)),
        Err(e) => {
            log::warn!("Free-form query failed: {e}");
            bad_request(e)
        }
    }
}

/// `POST /api/stops`
///
/// Inserts one stop record and drops the cached dataset so the next read
/// sees it.
pub async fn insert_stop(
    state: web::Data<AppState>,
    body: web::Json<StopRecord>,
) -> HttpResponse {
    match insert_record(&state.executor, &body).await {
        Ok(inserted) => {
            state.loader.invalidate();
            HttpResponse::Created().json(ApiInsert { inserted })
        }
        Err(e) => {
            log::error!("Failed to insert stop record: {e}");
            bad_request(e)
        }
    }
}

async fn report_result(
    state: &AppState,
    id: &str,
    selection: &FilterSelection,
) -> Result<QueryResult, AnalyticsError> {
    let entry = state.catalog.lookup(id)?;
    run_report(&state.executor, &state.catalog, entry.id, selection).await
}

fn analytics_error(e: &AnalyticsError) -> HttpResponse {
    match e {
        AnalyticsError::UnknownReport { .. } => HttpResponse::NotFound().json(ApiError::new(e)),
        AnalyticsError::DialectMismatch { .. } | AnalyticsError::Query(_) => {
            log::error!("Report failed: {e}");
            bad_request(e)
        }
    }
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new(e))
}

fn csv_response(result: &QueryResult, name: &str) -> HttpResponse {
    match to_csv(result) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}.csv\""),
            ))
            .body(body),
        Err(e) => {
            log::error!("Failed to render CSV: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e))
        }
    }
}
