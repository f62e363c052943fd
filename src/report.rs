//! Result table persistence.
//!
//! One row per audited document, written once per run. A `.json` destination
//! gets a pretty-printed array; anything else is CSV with a header row.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::FOLDER_RESULTS_FILE;
use crate::models::{or_na, CourseAuditRecord, MatchResult};

/// Column order of the result table.
pub const RESULT_COLUMNS: [&str; 11] = [
    "file_name",
    "full_title",
    "course_code",
    "course_name",
    "instructor_name",
    "gold_statement",
    "learning_outcome",
    "gold_designation",
    "match_result",
    "match_reason",
    "audit_error",
];

/// Columns a result file must carry to be re-matched.
const REQUIRED_COLUMNS: [&str; 3] = ["file_name", "course_code", "gold_statement"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error on results file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in results file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Results file {path} is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

/// Where results go when `--output` is not given: `<stem>.csv` for a single
/// file, `all_results.csv` for a folder.
pub fn default_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    if input.is_dir() {
        return output_dir.join(FOLDER_RESULTS_FILE);
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    output_dir.join(format!("{stem}.csv"))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Write `records` to `path`, replacing any existing file.
pub fn write_records(path: &Path, records: &[CourseAuditRecord]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    if is_json(path) {
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    } else {
        let csv_err = |source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        if records.is_empty() {
            writer.write_record(RESULT_COLUMNS).map_err(csv_err)?;
        }
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;
    }

    tracing::info!(path = %path.display(), rows = records.len(), "Results written");
    Ok(())
}

/// Read a result table written by a previous run, CSV or `.json`.
pub fn read_records(path: &Path) -> Result<Vec<CourseAuditRecord>, ReportError> {
    let records = if is_json(path) {
        read_json_records(path)?
    } else {
        read_csv_records(path)?
    };
    tracing::debug!(path = %path.display(), rows = records.len(), "Read results file");
    Ok(records)
}

fn read_json_records(path: &Path) -> Result<Vec<CourseAuditRecord>, ReportError> {
    let file = File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Only the identifying columns are required. Missing text columns become
/// "NA"; a missing or unknown `match_result` becomes `not_matched`, which the
/// next judge pass overwrites anyway.
fn read_csv_records(path: &Path) -> Result<Vec<CourseAuditRecord>, ReportError> {
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);

    for required in REQUIRED_COLUMNS {
        if column(required).is_none() {
            return Err(ReportError::MissingColumn {
                path: path.to_path_buf(),
                column: required.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        let field = |name: &str| column(name).and_then(|i| row.get(i)).map(str::trim);

        records.push(CourseAuditRecord {
            file_name: field("file_name").unwrap_or_default().to_string(),
            full_title: or_na(field("full_title")),
            course_code: or_na(field("course_code")),
            course_name: or_na(field("course_name")),
            instructor_name: or_na(field("instructor_name")),
            gold_statement_text: or_na(field("gold_statement")),
            learning_outcome_text: or_na(field("learning_outcome")),
            gold_designation: or_na(field("gold_designation")),
            match_result: field("match_result")
                .and_then(|v| v.parse::<MatchResult>().ok())
                .unwrap_or(MatchResult::NotMatched),
            match_reason: field("match_reason").unwrap_or_default().to_string(),
            audit_error: field("audit_error")
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        });
    }

    Ok(records)
}
