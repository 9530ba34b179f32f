use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::profile::TieBreak;

pub type SubmissionId = String;

/// Metric name to mean rank over all samples, for one submission.
pub type MetricMeans = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionMeans {
    pub id: SubmissionId,
    pub means: MetricMeans,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSubmission {
    pub id: SubmissionId,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    Flat,
    Categorized,
}

/// Composite and per-category scores of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionScores {
    pub id: SubmissionId,
    pub composite: f64,
    pub categories: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub mode: AggregationMode,
    pub tie_break: TieBreak,
    pub categories: Vec<String>,
    /// In input order.
    pub scores: Vec<SubmissionScores>,
    pub best_per_category: BTreeMap<String, ScoredSubmission>,
    pub best_overall: ScoredSubmission,
    /// Ascending by composite, best first.
    pub ordering: Vec<ScoredSubmission>,
    pub top: Vec<ScoredSubmission>,
}

impl Summary {
    pub fn n_submissions(&self) -> usize {
        self.ordering.len()
    }
}
