//! CSV bulk import of categories.
//!
//! The file is parsed up front; a malformed document aborts the whole import.
//! Rows are then created one after another. A failing row is counted and
//! listed, and the run continues with the next row.

use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One data row of a category CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub code: String,
    pub name: String,
    pub description: String,
}

/// A row that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub line: usize,
    pub code: String,
    pub message: String,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<ImportFailure>,
}

/// Parse a category CSV document.
///
/// Columns are matched by header name, `Code`/`code`, `Name`/`name` and
/// `Description`/`description`; other columns are ignored. Each cell falls
/// back to the lower-case column when the capitalised one is empty. A missing
/// column reads as an empty value, which the create command then rejects per
/// row.
pub fn parse_category_csv(content: &[u8]) -> Result<Vec<CategoryRow>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);
    let code_idx = (position("Code"), position("code"));
    let name_idx = (position("Name"), position("name"));
    let description_idx = (position("Description"), position("description"));

    // The capitalised column wins unless its cell is empty in this row.
    let field = |record: &csv::StringRecord, (upper, lower): (Option<usize>, Option<usize>)| {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or_default();
        let value = match cell(upper) {
            "" => cell(lower),
            upper_value => upper_value,
        };
        value.to_string()
    };

    let mut rows = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        rows.push(CategoryRow {
            line: row_idx + 2,
            code: field(&record, code_idx),
            name: field(&record, name_idx),
            description: field(&record, description_idx),
        });
    }

    Ok(rows)
}

/// Create every row in order with `create`, collecting a report.
pub fn import_rows<E, F>(rows: &[CategoryRow], mut create: F) -> ImportReport
where
    E: Display,
    F: FnMut(&CategoryRow) -> Result<(), E>,
{
    rows.iter().fold(ImportReport::default(), |mut report, row| {
        match create(row) {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                tracing::warn!(line = row.line, code = %row.code, error = %e, "import row rejected");
                report.failed += 1;
                report.failures.push(ImportFailure {
                    line: row.line,
                    code: row.code.clone(),
                    message: e.to_string(),
                });
            }
        }
        report
    })
}
