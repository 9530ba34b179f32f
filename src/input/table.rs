use std::collections::HashSet;
use std::path::Path;

use crate::input::reader::open_maybe_gz;
use crate::input::{InputError, submission_id};
use crate::model::profile::TaskProfile;
use crate::model::table::{MetricColumn, MetricTable};

/// Reads one submission's per-sample metrics.
///
/// Only columns the profile ranks are kept; count columns (`Num...`) and
/// unranked columns are dropped. The profile's key column, when present, is
/// kept as row keys for the alignment check.
pub fn read_metric_table(path: &Path, profile: &TaskProfile) -> Result<MetricTable, InputError> {
    let reader = open_maybe_gz(path)?;
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut seen = HashSet::new();
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(InputError::Parse(format!(
                "{}: duplicate column '{}'",
                path.display(),
                name
            )));
        }
    }

    let selected: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| profile.direction_of(name).is_some())
        .collect();
    let dropped = headers.len() - selected.len();
    if dropped > 0 {
        tracing::debug!(
            path = %path.display(),
            dropped,
            "dropped unranked columns"
        );
    }

    let key_idx = headers.iter().position(|h| h == profile.key_column);
    let mut keys = key_idx.map(|_| Vec::new());
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); selected.len()];

    for (row, record) in csv.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line_no = row + 2;
        for (slot, &(col, name)) in selected.iter().enumerate() {
            let raw = record.get(col).unwrap_or("");
            let value = parse_score(raw).ok_or_else(|| {
                InputError::Parse(format!(
                    "{}: line {}: column '{}' has non-numeric value '{}'",
                    path.display(),
                    line_no,
                    name,
                    raw
                ))
            })?;
            values[slot].push(value);
        }
        if let (Some(idx), Some(keys)) = (key_idx, keys.as_mut()) {
            keys.push(record.get(idx).unwrap_or("").to_string());
        }
    }

    let columns = selected
        .iter()
        .zip(values)
        .map(|(&(_, name), values)| MetricColumn {
            name: name.to_string(),
            values,
        })
        .collect();

    Ok(MetricTable {
        id: submission_id(path),
        source: path.to_path_buf(),
        columns,
        keys,
    })
}

fn parse_score(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}
