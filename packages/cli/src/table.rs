//! Plain-text table rendering for query results.

use std::fmt::Write as _;

use securecheck_database_models::{QueryResult, value_to_text};

/// Cells longer than this are truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Renders `result` as a left-aligned table with a dashed rule under the
/// header. `NULL` renders as an empty cell.
#[must_use]
pub fn render(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return "(no rows)\n".to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .map(|column| {
                    truncate(
                        &row.get(column)
                            .and_then(value_to_text)
                            .unwrap_or_default(),
                    )
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    write_line(&mut out, result.columns.iter().map(String::as_str), &widths);
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule));
    out.push('\n');
    for row in &cells {
        write_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    let _ = writeln!(out, "\n{} row(s)", result.len());
    out
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() > MAX_CELL_WIDTH {
        let kept: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{kept}...")
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use securecheck_database_models::ResultRow;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn aligns_columns_and_counts_rows() {
        let rows: Vec<ResultRow> = vec![
            [
                ("violation".to_string(), json!("Speeding")),
                ("cnt".to_string(), json!(120)),
            ]
            .into_iter()
            .collect(),
            [
                ("violation".to_string(), json!("DUI")),
                ("cnt".to_string(), Value::Null),
            ]
            .into_iter()
            .collect(),
        ];
        let result = QueryResult::new(vec!["violation".to_string(), "cnt".to_string()], rows);

        assert_eq!(
            render(&result),
            "violation  cnt\n--------------\nSpeeding   120\nDUI\n\n2 row(s)\n"
        );
    }

    #[test]
    fn empty_result_says_so() {
        assert_eq!(render(&QueryResult::empty()), "(no rows)\n");
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(60);
        let cell = truncate(&long);
        assert_eq!(cell.chars().count(), MAX_CELL_WIDTH);
        assert!(cell.ends_with("..."));
    }
}
