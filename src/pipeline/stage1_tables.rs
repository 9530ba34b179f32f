use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::input::InputError;
use crate::input::table::read_metric_table;
use crate::model::profile::TaskProfile;
use crate::model::table::MetricTable;

#[derive(Debug, Clone)]
pub struct Stage1Input<'a> {
    pub paths: &'a [PathBuf],
    pub profile: &'a TaskProfile,
}

pub fn run_stage1(input: &Stage1Input<'_>) -> Result<Vec<MetricTable>, InputError> {
    if input.paths.is_empty() {
        return Err(InputError::MissingInput(
            "no submission tables given".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    let mut tables = Vec::with_capacity(input.paths.len());
    for path in input.paths {
        let table = read_metric_table(path, input.profile)?;
        if !seen.insert(table.id.clone()) {
            return Err(InputError::DuplicateSubmission(table.id));
        }
        tracing::info!(
            submission = %table.id,
            path = %table.source.display(),
            rows = table.n_rows(),
            metrics = table.columns.len(),
            "loaded submission table"
        );
        tables.push(table);
    }

    check_alignment(&tables)?;
    Ok(tables)
}

/// Verifies that row keys agree across submissions.
///
/// Unequal row counts are left to the ranking stage, which rejects them.
pub fn check_alignment(tables: &[MetricTable]) -> Result<(), InputError> {
    let Some(first) = tables.first() else {
        return Ok(());
    };
    if tables.iter().any(|t| t.n_rows() != first.n_rows()) {
        return Ok(());
    }
    let Some(reference) = &first.keys else {
        return Ok(());
    };

    for table in &tables[1..] {
        let Some(keys) = &table.keys else {
            tracing::warn!(
                submission = %table.id,
                "no key column; row alignment not verified"
            );
            continue;
        };
        if let Some(row) = reference.iter().zip(keys).position(|(a, b)| a != b) {
            return Err(InputError::Misaligned(format!(
                "row {} is '{}' in '{}' but '{}' in '{}'",
                row + 1,
                reference[row],
                first.id,
                keys[row],
                table.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_tables.rs"]
mod tests;
