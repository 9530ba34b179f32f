use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Per-sample metric values of one submission, rows aligned across submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub id: String,
    pub source: PathBuf,
    pub columns: Vec<MetricColumn>,
    /// Row keys (case ids) when the table carries the key column.
    pub keys: Option<Vec<String>>,
}

impl MetricTable {
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }
}
