use std::collections::HashMap;
use std::path::Path;

use super::{read_columns, ReferenceError};

pub const STATEMENT_DESIGNATION_COLUMN: &str = "gold_designation";
pub const STATEMENT_TEXT_COLUMN: &str = "statements";

/// Gold designation area → canonical expected statement.
#[derive(Debug, Clone, Default)]
pub struct DesignationStatements {
    by_designation: HashMap<String, String>,
}

impl DesignationStatements {
    /// Load the statement table (`gold_designation`, `statements`).
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let rows = read_columns(path, &[STATEMENT_DESIGNATION_COLUMN, STATEMENT_TEXT_COLUMN])?;
        let statements = Self::from_pairs(rows.into_iter().map(|row| {
            let mut cells = row.into_iter();
            (cells.next().unwrap_or_default(), cells.next().unwrap_or_default())
        }));

        if statements.is_empty() {
            return Err(ReferenceError::Empty(path.to_path_buf()));
        }

        tracing::info!(
            path = %path.display(),
            designations = statements.len(),
            "Loaded designation statements"
        );
        Ok(statements)
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let by_designation = pairs
            .into_iter()
            .filter_map(|(designation, statement)| {
                let designation = designation.as_ref().trim();
                if designation.is_empty() {
                    None
                } else {
                    Some((designation.to_string(), statement.as_ref().trim().to_string()))
                }
            })
            .collect();
        Self { by_designation }
    }

    pub fn len(&self) -> usize {
        self.by_designation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_designation.is_empty()
    }

    /// Expected statement for a designation area, if one is registered.
    pub fn expected_for(&self, designation: &str) -> Option<&str> {
        self.by_designation
            .get(designation.trim())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn looks_up_trimmed_designation() {
        let statements = DesignationStatements::from_pairs(vec![(
            " Humanities, Arts and Design ",
            " Courses in this area explore... ",
        )]);
        assert_eq!(
            statements.expected_for("Humanities, Arts and Design"),
            Some("Courses in this area explore...")
        );
        assert_eq!(statements.expected_for("NA"), None);
    }

    #[test]
    fn blank_designations_are_dropped() {
        let statements = DesignationStatements::from_pairs(vec![("", "orphan"), ("  ", "x")]);
        assert!(statements.is_empty());
    }

    #[test]
    fn loads_from_csv_with_quoted_multiline_statement() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "gold_designation,statements\n\
             Quantitative Reasoning,\"Students apply\nmathematical reasoning.\"\n"
        )
        .unwrap();

        let statements = DesignationStatements::load(file.path()).unwrap();
        assert_eq!(
            statements.expected_for("Quantitative Reasoning"),
            Some("Students apply\nmathematical reasoning.")
        );
    }

    #[test]
    fn wrong_header_is_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "designation,text\nA,B").unwrap();
        let err = DesignationStatements::load(file.path()).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingColumn { .. }));
    }
}
