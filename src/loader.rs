//! Annotation file loading.
//!
//! Gold and submission directories have the same layout: every `*.tsv` file
//! directly inside the directory is one batch of rows, read in sorted
//! filename order.
//!
//! ## File format
//!
//! | Column | Content |
//! |--------|---------|
//! | docId | document identifier |
//! | annotSet | integer measurement set |
//! | annotType | Quantity, MeasuredEntity, MeasuredProperty, Qualifier |
//! | startOffset, endOffset | integer character offsets |
//! | annotId | row identifier |
//! | text | covered text |
//! | other | JSON payload, may be empty |
//!
//! The first line names the columns, in any order. Fields are tab separated;
//! a field wrapped in double quotes is unquoted, with `""` standing for `"`.

use crate::store::AnnotationStore;
use crate::{Error, Result};
use glob::glob;
use measeval_core::{AnnotType, Annotation, Payload};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Column names every annotation file carries.
pub const COLUMNS: [&str; 8] = [
    "docId",
    "annotSet",
    "annotType",
    "startOffset",
    "endOffset",
    "annotId",
    "text",
    "other",
];

// =============================================================================
// Raw TSV
// =============================================================================

/// One data line of a TSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the file
    pub line: usize,
    /// Unquoted fields
    pub fields: Vec<String>,
}

/// A TSV file split into header and rows.
#[derive(Debug, Clone)]
pub struct TsvFile {
    pub path: PathBuf,
    pub header: Vec<String>,
    columns: HashMap<String, usize>,
    pub rows: Vec<RawRow>,
}

impl TsvFile {
    /// Parse TSV text. `path` is only used in messages.
    ///
    /// # Errors
    ///
    /// The text has no header line.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header_line) = lines
            .next()
            .ok_or_else(|| Error::parse(format!("{}: empty file, expected a header", path.display())))?;
        let header: Vec<String> = split_fields(header_line)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let columns = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        let rows = lines
            .map(|(line, l)| RawRow {
                line,
                fields: split_fields(l),
            })
            .collect();

        Ok(Self {
            path,
            header,
            columns,
            rows,
        })
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// IO failure or a missing header.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// File name without directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    /// Whether the header names `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Value of `column` in `row`. A column missing from the header or a
    /// short row both read as `None`.
    #[must_use]
    pub fn get<'a>(&self, row: &'a RawRow, column: &str) -> Option<&'a str> {
        let i = *self.columns.get(column)?;
        row.fields.get(i).map(String::as_str)
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('\t').map(unquote).collect()
}

/// Strip surrounding double quotes and collapse `""` to `"`.
#[must_use]
pub fn unquote(field: &str) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Rows -> annotations
// =============================================================================

fn required<'a>(file: &TsvFile, row: &'a RawRow, column: &'static str) -> Result<&'a str> {
    file.get(row, column).ok_or_else(|| {
        Error::parse(format!(
            "{}:{}: missing column '{}'",
            file.path.display(),
            row.line,
            column
        ))
    })
}

fn integer<T: std::str::FromStr>(file: &TsvFile, row: &RawRow, column: &'static str) -> Result<T> {
    let raw = required(file, row, column)?;
    raw.trim().parse().map_err(|_| {
        Error::parse(format!(
            "{}:{}: {} '{}' is not an integer",
            file.path.display(),
            row.line,
            column,
            raw
        ))
    })
}

/// Convert one raw row into an annotation.
///
/// # Errors
///
/// A missing column, a non-integer set or offset, an unknown category, or a
/// malformed payload; messages name `file:line`.
pub fn parse_row(file: &TsvFile, row: &RawRow) -> Result<Annotation> {
    let at = |e: measeval_core::Error| {
        Error::parse(format!("{}:{}: {}", file.path.display(), row.line, e))
    };

    let annot_type: AnnotType = required(file, row, "annotType")?.trim().parse().map_err(at)?;
    let start: usize = integer(file, row, "startOffset")?;
    let end: usize = integer(file, row, "endOffset")?;
    let annotation = Annotation::new(
        required(file, row, "docId")?,
        integer(file, row, "annotSet")?,
        required(file, row, "annotId")?,
        annot_type,
        start,
        end,
        required(file, row, "text")?,
    );
    if !annotation.text_length_matches() {
        // Gold files are not validated; scoring still uses the offsets.
        log::warn!(
            "{}:{}: text of {} does not span {}..{}",
            file.path.display(),
            row.line,
            annotation.annot_id,
            start,
            end
        );
    }
    let other = file.get(row, "other").unwrap_or("");
    let payload = Payload::parse(annot_type, other).map_err(at)?;
    annotation.with_payload(payload).map_err(at)
}

/// Read every row of one file.
///
/// # Errors
///
/// See [`parse_row`]; the first bad row aborts.
pub fn parse_file(path: &Path) -> Result<Vec<Annotation>> {
    let file = TsvFile::read(path)?;
    file.rows.iter().map(|row| parse_row(&file, row)).collect()
}

// =============================================================================
// Directories
// =============================================================================

/// `*.tsv` files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// `dir` is not a directory or not valid UTF-8.
pub fn list_tsv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::parse(format!("{} is not valid UTF-8", dir.display())))?;
    let pattern = format!("{}/*.tsv", glob::Pattern::escape(dir_str));

    let mut files = Vec::new();
    for entry in glob(&pattern).map_err(|e| Error::parse(format!("Invalid glob pattern '{}': {}", pattern, e)))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("glob match error: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Read a skip list: one file name per line, blank lines ignored.
///
/// # Errors
///
/// IO failure.
pub fn read_skip_list(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Which files to load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// File names to leave out on both sides
    pub skip: BTreeSet<String>,
    /// Load only the gold files the submission also has
    pub limit_to_submission: bool,
}

impl LoadOptions {
    /// Options skipping `names`.
    #[must_use]
    pub fn skipping(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            skip: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Annotations of one side and the files they came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedSide {
    pub store: AnnotationStore,
    /// File names, in load order
    pub files: Vec<String>,
}

impl LoadedSide {
    /// Per-category row counts, in scoring order.
    #[must_use]
    pub fn type_counts(&self) -> Vec<(AnnotType, usize)> {
        AnnotType::ALL
            .into_iter()
            .map(|t| (t, self.store.count_of_type(t)))
            .collect()
    }
}

fn load_files(
    dir: &Path,
    options: &LoadOptions,
    keep: impl Fn(&str) -> bool,
) -> Result<LoadedSide> {
    let mut side = LoadedSide::default();
    for path in list_tsv_files(dir)? {
        let name = file_name(&path);
        if options.skip.contains(&name) {
            log::info!("skipping {}", name);
            continue;
        }
        if !keep(&name) {
            continue;
        }
        side.store.extend(parse_file(&path)?);
        side.files.push(name);
    }
    Ok(side)
}

/// Load every annotation file in `dir`.
///
/// # Errors
///
/// Directory listing, IO, or row parse failure.
pub fn load_dir(dir: &Path, options: &LoadOptions) -> Result<LoadedSide> {
    let side = load_files(dir, options, |_| true)?;
    log::info!(
        "{}: {} files, {} documents, {} rows",
        dir.display(),
        side.files.len(),
        side.store.doc_count(),
        side.store.len()
    );
    Ok(side)
}

/// Load gold and submission directories, returning `(gold, submission)`.
///
/// # Errors
///
/// See [`load_dir`].
pub fn load_corpora(gold_dir: &Path, sub_dir: &Path, options: &LoadOptions) -> Result<(LoadedSide, LoadedSide)> {
    let sub = load_dir(sub_dir, options)?;
    let gold = if options.limit_to_submission {
        let wanted: BTreeSet<&str> = sub.files.iter().map(String::as_str).collect();
        let gold = load_files(gold_dir, options, |name| wanted.contains(name))?;
        log::info!(
            "{}: {} files matching the submission, {} documents, {} rows",
            gold_dir.display(),
            gold.files.len(),
            gold.store.doc_count(),
            gold.store.len()
        );
        gold
    } else {
        load_dir(gold_dir, options)?
    };

    for (side, loaded) in [("gold", &gold), ("submission", &sub)] {
        for (t, n) in loaded.type_counts() {
            log::info!("{} {}: {}", side, t, n);
        }
    }
    Ok((gold, sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "docId\tannotSet\tannotType\tstartOffset\tendOffset\tannotId\ttext\tother";

    #[test]
    fn test_parse_rows_by_header_name() {
        let content = "annotId\tdocId\tannotSet\tannotType\tstartOffset\tendOffset\ttext\tother\n\
                       T1-1\tS0-1\t1\tQuantity\t0\t4\t5 kg\t{\"unit\": \"kg\"}\n";
        let file = TsvFile::parse("a.tsv", content).unwrap();
        let a = parse_row(&file, &file.rows[0]).unwrap();
        assert_eq!(a.doc_id, "S0-1");
        assert_eq!(a.annot_id, "T1-1");
        assert_eq!(a.payload.quantity().unwrap().unit(), Some("kg"));
    }

    #[test]
    fn test_quoted_field() {
        assert_eq!(unquote(r#""{""unit"": ""kg""}""#), r#"{"unit": "kg"}"#);
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_missing_trailing_other_is_empty() {
        let content = format!("{}\nd\t1\tMeasuredEntity\t0\t5\tT1-2\twater\n", HEADER);
        let file = TsvFile::parse("a.tsv", &content).unwrap();
        let a = parse_row(&file, &file.rows[0]).unwrap();
        assert!(a.relation().is_none());
    }

    #[test]
    fn test_bad_offset_names_file_and_line() {
        let content = format!("{}\n\nd\t1\tQuantity\tx\t5\tT1\t5 kg\t\n", HEADER);
        let file = TsvFile::parse("gold/a.tsv", &content).unwrap();
        let err = parse_row(&file, &file.rows[0]).unwrap_err().to_string();
        assert!(err.contains("gold/a.tsv:3"), "{}", err);
        assert!(err.contains("startOffset"));
    }

    #[test]
    fn test_text_length_mismatch_still_loads() {
        let content = format!("{}\nd\t1\tQuantity\t0\t9\tT1\t5 kg\t\n", HEADER);
        let file = TsvFile::parse("gold/a.tsv", &content).unwrap();
        let a = parse_row(&file, &file.rows[0]).unwrap();
        assert!(!a.text_length_matches());
        assert_eq!(a.span.len(), 9);
    }

    #[test]
    fn test_negative_offset_is_rejected() {
        let content = format!("{}\nd\t1\tQuantity\t-1\t2\tT1-1\tabc\t\n", HEADER);
        let file = TsvFile::parse("a.tsv", &content).unwrap();
        let err = parse_row(&file, &file.rows[0]).unwrap_err().to_string();
        assert!(err.contains("startOffset"), "{}", err);
    }

    #[test]
    fn test_empty_file_has_no_header() {
        assert!(TsvFile::parse("a.tsv", "\n\n").is_err());
    }
}
