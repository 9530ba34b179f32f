use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod names;
pub mod reader;
pub mod table;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("submissions are not row-aligned: {0}")]
    Misaligned(String),
    #[error("duplicate submission id '{0}'")]
    DuplicateSubmission(String),
}

const TABLE_SUFFIXES: &[&str] = &[".csv.gz", ".csv"];

/// Submission id of a metrics table: its file name without the table suffix.
pub fn submission_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for suffix in TABLE_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            return stem.to_string();
        }
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

pub fn is_table_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .is_some_and(|name| TABLE_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// All metric tables in `dir`, sorted by path.
pub fn discover_submissions(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_table_path(&path) {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(InputError::MissingInput(format!(
            "no .csv or .csv.gz submissions in {}",
            dir.display()
        )));
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
