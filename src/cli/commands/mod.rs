//! Command implementations for the measeval CLI
//!
//! Each command has its own module and a `run(args) -> Result<(), String>`.

pub mod score;
pub mod validate;

// Re-export argument types for parser
pub use score::ScoreArgs;
pub use validate::ValidateArgs;

use crate::loader::read_skip_list;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// `base/dir` when a base directory was given, `dir` otherwise.
pub(crate) fn resolve_dir(base: Option<&Path>, dir: &Path) -> PathBuf {
    match base {
        Some(base) => base.join(dir),
        None => dir.to_path_buf(),
    }
}

/// Skip names from config plus the optional skip file.
pub(crate) fn skip_set(configured: &[String], skip_file: Option<&Path>) -> Result<BTreeSet<String>, String> {
    let mut skip: BTreeSet<String> = configured.iter().cloned().collect();
    if let Some(path) = skip_file {
        let names = read_skip_list(path)
            .map_err(|e| format!("Failed to read skip list {}: {}", path.display(), e))?;
        skip.extend(names);
    }
    Ok(skip)
}
