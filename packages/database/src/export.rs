//! CSV export of query results.

use securecheck_database_models::{QueryResult, value_to_text};

/// Errors that can occur while rendering CSV.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the writer failed.
    #[error("CSV flush error: {message}")]
    Flush {
        /// Description of what went wrong.
        message: String,
    },

    /// The rendered bytes were not UTF-8.
    #[error("CSV encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders `result` as CSV: one header row of column names, then one line
/// per row. `NULL` becomes an empty field.
///
/// # Errors
///
/// Returns [`ExportError`] if the writer fails.
pub fn to_csv(result: &QueryResult) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !result.columns.is_empty() {
        writer.write_record(&result.columns)?;
    }

    for row in &result.rows {
        writer.write_record(result.columns.iter().map(|column| {
            row.get(column)
                .and_then(value_to_text)
                .unwrap_or_default()
        }))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Flush {
        message: e.to_string(),
    })?;

    Ok(String::from_utf8(bytes)?)
}
