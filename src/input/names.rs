use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::open_maybe_gz;

/// Display names for submission ids. Only the report layer reads this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<String, String>,
}

impl NameTable {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut names = BTreeMap::new();
        for (id, name) in pairs {
            names.entry(id.into()).or_insert_with(|| name.into());
        }
        Self { names }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Loads `id<TAB>display name` lines. `#` starts a comment line.
pub fn load_name_table(path: &Path) -> Result<NameTable, InputError> {
    let reader = open_maybe_gz(path)?;
    let mut names = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let Some((id, name)) = line.split_once('\t') else {
            return Err(InputError::Parse(format!(
                "{}: line {} is not 'id<TAB>name'",
                path.display(),
                line_no
            )));
        };
        let id = id.trim();
        if id.is_empty() {
            tracing::warn!(line = line_no, "name table line has empty id; skipping");
            continue;
        }
        if names.contains_key(id) {
            tracing::warn!(
                line = line_no,
                id,
                "duplicate id in name table; keeping first"
            );
            continue;
        }
        names.insert(id.to_string(), name.trim().to_string());
    }

    Ok(NameTable::from_pairs(names))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/names.rs"]
mod tests;
