//! Reference tables: course → Gold designation, designation → expected statement.
//!
//! Both are read from CSV once per run and never mutated. A missing, empty, or
//! malformed table aborts the run; auditing without them would silently
//! produce all-"NA" output.

pub mod designation;
pub mod statements;

pub use designation::*;
pub use statements::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference table not found: {0}")]
    NotFound(PathBuf),

    #[error("Reference table has no usable rows: {0}")]
    Empty(PathBuf),

    #[error("Reference table {path} is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot read reference table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read `columns` (by header name) from every row of a CSV file.
///
/// Cells are trimmed. Header names are matched after stripping a UTF-8 BOM,
/// which spreadsheet exports like to prepend.
pub(crate) fn read_columns(
    path: &Path,
    columns: &[&str],
) -> Result<Vec<Vec<String>>, ReferenceError> {
    if !path.is_file() {
        return Err(ReferenceError::NotFound(path.to_path_buf()));
    }

    let csv_err = |source| ReferenceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let indices = columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ReferenceError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(
            indices
                .iter()
                .map(|&i| record.get(i).unwrap_or_default().to_string())
                .collect(),
        );
    }

    Ok(rows)
}
