//! Submission validation.
//!
//! Checks every row of a submission file before anything is scored:
//! - header names every column
//! - `docId` + `annotSet` + `annotId` unique within the file
//! - `annotId` shaped like `T1-2`, `T12` or `3`
//! - `annotType` one of the four categories
//! - `annotSet` an integer
//! - `startOffset`, `endOffset` non-negative integers, `endOffset` not before `startOffset`
//! - `other` empty or a JSON object with the keys its category allows
//! - relation-bearing rows name exactly one relation
//! - `text` length equals `endOffset - startOffset`
//!
//! All problems are collected, not just the first.

use crate::loader::{list_tsv_files, TsvFile, COLUMNS};
use crate::{Error, Result};
use measeval_core::{AnnotType, Payload, Span};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

static ANNOT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T?\d*-?\d+$").expect("annotId pattern is valid"));

/// Validation result for one submission file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,
    /// Validation errors found
    pub errors: Vec<String>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a new validation result.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation outcome of one named file.
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub file: String,
    pub result: ValidationResult,
}

fn check_integer(value: Option<&str>, column: &str, line: usize, result: &mut ValidationResult) -> Option<i64> {
    let raw = value.unwrap_or("");
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            result.add_error(format!("line {}: {} '{}' is not an integer", line, column, raw));
            None
        }
    }
}

/// Offsets index characters, so they must be non-negative, as the loader reads them.
fn check_offset(value: Option<&str>, column: &str, line: usize, result: &mut ValidationResult) -> Option<usize> {
    let raw = value.unwrap_or("");
    let v = check_integer(value, column, line, result)?;
    match usize::try_from(v) {
        Ok(v) => Some(v),
        Err(_) => {
            result.add_error(format!("line {}: {} '{}' is negative", line, column, raw));
            None
        }
    }
}

/// Validate a parsed TSV file.
#[must_use]
pub fn validate_file(file: &TsvFile) -> ValidationResult {
    let mut result = ValidationResult::new();

    let missing: Vec<&str> = COLUMNS.iter().copied().filter(|c| !file.has_column(c)).collect();
    if !missing.is_empty() {
        result.add_error(format!("missing columns: {}", missing.join(", ")));
        return result;
    }
    if file.rows.is_empty() {
        result.add_warning("file has no rows".to_string());
    }

    let mut seen: HashMap<(String, String, String), usize> = HashMap::new();
    for row in &file.rows {
        let line = row.line;
        let field = |c: &str| file.get(row, c);

        let doc_id = field("docId").unwrap_or("");
        let annot_set = field("annotSet").unwrap_or("");
        let annot_id = field("annotId").unwrap_or("");
        let key = (doc_id.to_string(), annot_set.trim().to_string(), annot_id.to_string());
        if let Some(first) = seen.insert(key, line) {
            result.add_error(format!(
                "line {}: docId '{}', annotSet '{}', annotId '{}' already used on line {}",
                line, doc_id, annot_set, annot_id, first
            ));
        }

        if !ANNOT_ID.is_match(annot_id) {
            result.add_error(format!("line {}: annotId '{}' is malformed", line, annot_id));
        }

        let annot_type = match field("annotType").unwrap_or("").parse::<AnnotType>() {
            Ok(t) => Some(t),
            Err(e) => {
                result.add_error(format!("line {}: {}", line, e));
                None
            }
        };

        check_integer(Some(annot_set), "annotSet", line, &mut result);
        let start = check_offset(field("startOffset"), "startOffset", line, &mut result);
        let end = check_offset(field("endOffset"), "endOffset", line, &mut result);

        if let Some(t) = annot_type {
            match Payload::parse(t, field("other").unwrap_or("")) {
                Ok(payload) => {
                    let links = payload.relation_links().len();
                    if t.is_relation_bearing() && links != 1 {
                        result.add_error(format!(
                            "line {}: {} must name exactly one relation, found {}",
                            line, t, links
                        ));
                    }
                }
                Err(e) => result.add_error(format!("line {}: {}", line, e)),
            }
        }

        match (start, end) {
            (Some(start), Some(end)) if end < start => result.add_error(format!(
                "line {}: endOffset {} is before startOffset {}",
                line, end, start
            )),
            (Some(start), Some(end)) => {
                let text = field("text").unwrap_or("");
                let span = Span::new(start, end);
                if !span.fits_text(text) {
                    result.add_error(format!(
                        "line {}: '{}' length {} does not match expected length {}",
                        line,
                        text,
                        text.chars().count(),
                        span.len()
                    ));
                }
            }
            _ => {}
        }
    }

    result
}

/// Validate one file on disk.
///
/// # Errors
///
/// IO failure or a file without header.
pub fn validate_path(path: &Path) -> Result<ValidationResult> {
    Ok(validate_file(&TsvFile::read(path)?))
}

/// Validate every submission file in `dir` not named in `skip`.
///
/// # Errors
///
/// Directory listing or IO failure. Invalid content is reported in the
/// returned results, not as an error; see [`ensure_valid`].
pub fn validate_dir(dir: &Path, skip: &BTreeSet<String>) -> Result<Vec<FileValidation>> {
    let mut out = Vec::new();
    for path in list_tsv_files(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if skip.contains(&name) {
            continue;
        }
        let result = match validate_path(&path) {
            Ok(r) => r,
            Err(Error::Parse(msg)) => {
                let mut result = ValidationResult::new();
                result.add_error(msg);
                out.push(FileValidation { file: name, result });
                continue;
            }
            Err(e) => return Err(e),
        };
        for e in &result.errors {
            log::warn!("{}: {}", name, e);
        }
        for w in &result.warnings {
            log::debug!("{}: {}", name, w);
        }
        out.push(FileValidation { file: name, result });
    }
    Ok(out)
}

/// Fail with [`Error::InvalidSubmission`] naming every invalid file.
///
/// # Errors
///
/// At least one file failed validation.
pub fn ensure_valid(results: &[FileValidation]) -> Result<()> {
    let files: Vec<String> = results
        .iter()
        .filter(|v| !v.result.is_valid)
        .map(|v| v.file.clone())
        .collect();
    if files.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidSubmission { files })
    }
}
