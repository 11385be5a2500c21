//! Run configuration.
//!
//! Every field can come from a TOML file; command-line flags override it.
//!
//! ```toml
//! mode = "class"
//! format = "human"
//! token_split = "whitespace"
//! limit_to_submission = true
//! skip = ["S0019103512002801-3145.tsv"]
//! categories = "../fileCategories.txt"
//! ```

use crate::eval::{Mode, OutputFormat, TokenSplit};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Options of a scoring run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreConfig {
    /// Load only the gold files the submission also has
    pub limit_to_submission: bool,
    /// File names to leave out on both sides
    pub skip: Vec<String>,
    /// Tokenization rule of the overlap score
    pub token_split: TokenSplit,
    /// Subject categories file, needed for subject mode
    pub categories: Option<PathBuf>,
    /// Reporting granularity
    pub mode: Mode,
    /// Report format
    pub format: OutputFormat,
}

impl ScoreConfig {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Invalid TOML, unknown keys, or unknown enum values.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {}", e)))
    }

    /// Read a TOML file. A relative `categories` path is resolved against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// IO failure or see [`ScoreConfig::from_toml`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(categories), Some(dir)) = (&config.categories, path.parent()) {
            if categories.is_relative() {
                config.categories = Some(dir.join(categories));
            }
        }
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Serialization failure.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))
    }

    /// Subject mode needs a categories file.
    ///
    /// # Errors
    ///
    /// Subject mode without `categories`.
    pub fn check(&self) -> Result<()> {
        if self.mode == Mode::Subject && self.categories.is_none() {
            return Err(Error::config(
                "subject mode needs a categories file (--categories)",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ScoreConfig::from_toml("").unwrap();
        assert_eq!(c, ScoreConfig::default());
        assert_eq!(c.mode, Mode::Overall);
        assert_eq!(c.token_split, TokenSplit::Whitespace);
    }

    #[test]
    fn test_parse_all_fields() {
        let c = ScoreConfig::from_toml(
            r#"
            mode = "both"
            format = "json"
            token_split = "single-space"
            limit_to_submission = true
            skip = ["a.tsv"]
            categories = "cats.txt"
            "#,
        )
        .unwrap();
        assert_eq!(c.mode, Mode::ClassDoc);
        assert_eq!(c.format, OutputFormat::Json);
        assert_eq!(c.token_split, TokenSplit::SingleSpace);
        assert!(c.limit_to_submission);
        assert_eq!(c.skip, vec!["a.tsv"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ScoreConfig::from_toml("moed = \"class\"").is_err());
        assert!(ScoreConfig::from_toml("mode = \"weekly\"").is_err());
    }

    #[test]
    fn test_subject_mode_needs_categories() {
        let c = ScoreConfig {
            mode: Mode::Subject,
            ..ScoreConfig::default()
        };
        assert!(c.check().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let c = ScoreConfig {
            mode: Mode::Class,
            skip: vec!["x.tsv".into()],
            ..ScoreConfig::default()
        };
        assert_eq!(ScoreConfig::from_toml(&c.to_toml().unwrap()).unwrap(), c);
    }
}
