//! Document subject lookup.
//!
//! Document ids look like `S0022314X13001777-3253`; the part before the first
//! `-` identifies the source article, and a categories file maps it to a
//! subject:
//!
//! ```text
//! S0022314X13001777	Mathematics
//! S0019103512002801	Astronomy
//! ```

use crate::eval::SubjectSource;
use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Article prefix to subject map, remembering first-seen subject order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectLookup {
    by_prefix: HashMap<String, String>,
    order: Vec<String>,
}

impl SubjectLookup {
    /// Parse `prefix<TAB>subject` lines. Blank lines and lines without a tab
    /// are ignored; a repeated prefix keeps its last subject.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut lookup = Self::default();
        for line in content.lines() {
            let Some((prefix, subject)) = line.split_once('\t') else {
                if !line.trim().is_empty() {
                    log::warn!("ignoring categories line without a tab: {:?}", line);
                }
                continue;
            };
            let subject = subject.trim_end();
            if !lookup.order.iter().any(|s| s == subject) {
                lookup.order.push(subject.to_string());
            }
            lookup
                .by_prefix
                .insert(prefix.trim().to_string(), subject.to_string());
        }
        lookup
    }

    /// Read a categories file.
    ///
    /// # Errors
    ///
    /// IO failure.
    pub fn load(path: &Path) -> Result<Self> {
        let lookup = Self::parse(&fs::read_to_string(path)?);
        log::info!(
            "{}: {} articles in {} subjects",
            path.display(),
            lookup.by_prefix.len(),
            lookup.order.len()
        );
        Ok(lookup)
    }

    /// Subject of `doc_id`, keyed by its prefix before the first `-`.
    #[must_use]
    pub fn subject_for(&self, doc_id: &str) -> Option<&str> {
        let prefix = doc_id.split('-').next().unwrap_or(doc_id);
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// Subjects in first-seen order.
    #[must_use]
    pub fn subjects(&self) -> &[String] {
        &self.order
    }

    /// Number of known articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    /// True if nothing was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}

impl SubjectSource for SubjectLookup {
    fn subject_for(&self, doc_id: &str) -> Option<&str> {
        SubjectLookup::subject_for(self, doc_id)
    }

    fn subjects(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup() {
        let lookup = SubjectLookup::parse("S001\tBiology\nS002\tMedicine\r\nS003\tBiology\n\n");
        assert_eq!(lookup.subject_for("S001-1234"), Some("Biology"));
        assert_eq!(lookup.subject_for("S002"), Some("Medicine"));
        assert_eq!(lookup.subject_for("S999-1"), None);
        assert_eq!(lookup.subjects(), ["Biology", "Medicine"]);
        assert_eq!(lookup.len(), 3);
    }

    #[test]
    fn test_subject_with_space() {
        let lookup = SubjectLookup::parse("S1\tComputer Science\n");
        assert_eq!(lookup.subject_for("S1-9"), Some("Computer Science"));
    }
}
