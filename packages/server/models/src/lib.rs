#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the SecureCheck server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the query layer types to allow independent evolution of the API
//! contract.

use securecheck_analytics_models::ReportSummary;
use securecheck_database_models::{FilterSelection, QueryResult, ResultRow};
use serde::{Deserialize, Serialize};

/// Default number of rows in a dataset preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message, passed through from the store when a query
    /// failed.
    pub error: String,
}

impl ApiError {
    /// Wraps anything displayable.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Tabular result as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// Rows keyed by column name.
    pub rows: Vec<ResultRow>,
    /// Number of rows.
    pub row_count: usize,
}

impl From<QueryResult> for ApiQueryResult {
    fn from(result: QueryResult) -> Self {
        Self {
            row_count: result.len(),
            columns: result.columns,
            rows: result.rows,
        }
    }
}

/// Query parameters for the dataset preview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetPreviewParams {
    /// Number of rows to include. Defaults to [`DEFAULT_PREVIEW_ROWS`].
    pub limit: Option<usize>,
}

/// First rows of the loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDatasetPreview {
    /// Total rows in the loaded dataset.
    pub total_rows: usize,
    /// The preview rows.
    pub preview: ApiQueryResult,
    /// Load failure, if the dataset could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response to a dataset refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRefresh {
    /// Rows in the freshly loaded dataset.
    pub total_rows: usize,
}

/// Query parameters shared by the report endpoints.
///
/// Each list is split on `,` and every entry is trimmed, so a country or
/// violation that itself contains a comma, or that starts or ends with
/// whitespace, cannot be selected here. `POST /api/sql` takes the filter as
/// JSON arrays and passes such values through verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQueryParams {
    /// Comma-separated country names.
    pub countries: Option<String>,
    /// Comma-separated violations.
    pub violations: Option<String>,
}

impl ReportQueryParams {
    /// The filter these parameters describe.
    #[must_use]
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::from_comma_lists(self.countries.as_deref(), self.violations.as_deref())
    }
}

/// Catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiReports {
    /// Every report, in catalog order.
    pub reports: Vec<ReportSummary>,
}

/// Body of a free-form query request.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSqlRequest {
    /// Statement to run.
    pub sql: String,
    /// Optional filter appended to the statement.
    #[serde(flatten)]
    pub filters: FilterSelection,
}

/// Response to an insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInsert {
    /// Rows written.
    pub inserted: u64,
}
