use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{read_columns, ReferenceError};
use crate::models::{is_na, NA};

pub const SUBJECT_COLUMN: &str = "Subject";
pub const NUMBER_COLUMN: &str = "Nbr";
pub const DESIGNATION_COLUMN: &str = "Gold Designation";

/// Course key → Gold designation area.
#[derive(Debug, Clone, Default)]
pub struct CourseDesignations {
    by_course: HashMap<String, String>,
}

impl CourseDesignations {
    /// Load the approved-courses table (`Subject`, `Nbr`, `Gold Designation`).
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let rows = read_columns(path, &[SUBJECT_COLUMN, NUMBER_COLUMN, DESIGNATION_COLUMN])?;
        let mapping = Self::from_rows(rows.into_iter().map(|row| {
            let mut cells = row.into_iter();
            (
                cells.next().unwrap_or_default(),
                cells.next().unwrap_or_default(),
                cells.next().unwrap_or_default(),
            )
        }));

        if mapping.is_empty() {
            return Err(ReferenceError::Empty(path.to_path_buf()));
        }

        tracing::info!(
            path = %path.display(),
            courses = mapping.len(),
            "Loaded course designations"
        );
        for (course, designation) in mapping.by_course.iter().take(5) {
            tracing::debug!(course = %course, designation = %designation, "Course designation sample");
        }

        Ok(mapping)
    }

    /// Build from `(subject, number, designation)` rows. Rows missing any
    /// part are skipped; later duplicates win.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let mut by_course = HashMap::new();
        for (subject, number, designation) in rows {
            let (subject, number) = (subject.as_ref().trim(), number.as_ref().trim());
            let designation = strip_designation_abbreviation(designation.as_ref());
            if subject.is_empty() || number.is_empty() || designation.is_empty() {
                tracing::debug!(subject, number, "Skipping incomplete course row");
                continue;
            }
            let key = normalize_course_key(&format!("{subject} {number}"));
            if let Some(previous) = by_course.insert(key.clone(), designation) {
                tracing::debug!(course = %key, previous = %previous, "Duplicate course row replaced");
            }
        }
        Self { by_course }
    }

    pub fn len(&self) -> usize {
        self.by_course.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_course.is_empty()
    }

    pub fn get(&self, course_code: &str) -> Option<&str> {
        self.by_course
            .get(&normalize_course_key(course_code))
            .map(String::as_str)
    }

    /// Designation for an extracted course code, or "NA".
    ///
    /// "NA"/blank codes are not looked up. A miss is an expected outcome,
    /// not an error.
    pub fn resolve(&self, course_code: &str) -> String {
        if is_na(course_code) {
            return NA.to_string();
        }
        self.get(course_code).unwrap_or(NA).to_string()
    }
}

/// Canonical course key: uppercase, single spaces, and a space between the
/// subject letters and the course number ("abs130" → "ABS 130").
pub fn normalize_course_key(code: &str) -> String {
    static SUBJECT_NUMBER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^([A-Z]+) ?(\d.*)$").expect("valid regex"));

    let collapsed = code
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    match SUBJECT_NUMBER_RE.captures(&collapsed) {
        Some(caps) => format!("{} {}", &caps[1], &caps[2]),
        None => collapsed,
    }
}

/// Drop a trailing parenthetical abbreviation:
/// "Humanities, Arts and Design (HU)" → "Humanities, Arts and Design".
pub fn strip_designation_abbreviation(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            return trimmed[..open].trim().to_string();
        }
    }
    trimmed.to_string()
}
