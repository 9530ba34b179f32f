use rayon::prelude::*;

use crate::error::RankError;
use crate::model::profile::{Direction, TaskProfile};
use crate::model::summary::{MetricMeans, SubmissionMeans};
use crate::model::table::MetricTable;

/// Per-sample ranks of one submission for one metric. 1 is best.
pub type RankSeries = Vec<u32>;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRanks {
    pub metric: String,
    pub direction: Direction,
    /// Index-aligned with the submission tables.
    pub ranks: Vec<RankSeries>,
}

#[derive(Debug)]
pub struct Stage2Output {
    pub metrics: Vec<MetricRanks>,
    pub means: Vec<SubmissionMeans>,
}

/// Ranks K parallel score lists position by position.
///
/// All lists must have the same non-zero length; this is checked before any
/// position is ranked. The result is index-aligned with `series`.
pub fn compute_ranks(series: &[&[f64]], direction: Direction) -> Result<Vec<RankSeries>, RankError> {
    let Some(first) = series.first() else {
        return Err(RankError::EmptyInput(
            "at least one score list is required".to_string(),
        ));
    };
    let n_samples = first.len();
    if series.iter().any(|s| s.len() != n_samples) {
        return Err(RankError::LengthMismatch {
            lengths: series.iter().map(|s| s.len()).collect(),
        });
    }
    if n_samples == 0 {
        return Err(RankError::EmptyInput(
            "score lists contain no samples".to_string(),
        ));
    }

    let mut ranks: Vec<RankSeries> = (0..series.len())
        .map(|_| Vec::with_capacity(n_samples))
        .collect();
    let mut column = Vec::with_capacity(series.len());
    for sample in 0..n_samples {
        column.clear();
        column.extend(series.iter().map(|s| s[sample]));
        for (sub, rank) in rank_position(&column, direction).into_iter().enumerate() {
            ranks[sub].push(rank);
        }
    }
    Ok(ranks)
}

/// Dense ranks of the scores at one sample position.
///
/// rank = 1 + number of distinct scores strictly better than this one.
pub fn rank_position(scores: &[f64], direction: Direction) -> Vec<u32> {
    let mut groups = scores.to_vec();
    groups.sort_by(|a, b| direction.quality_cmp(*a, *b));
    groups.dedup_by(|a, b| direction.quality_cmp(*a, *b).is_eq());

    scores
        .iter()
        .map(|&score| {
            let better = groups.partition_point(|&g| direction.quality_cmp(g, score).is_lt());
            better as u32 + 1
        })
        .collect()
}

pub fn mean_rank(ranks: &[u32]) -> f64 {
    if ranks.is_empty() {
        return 0.0;
    }
    let sum: u64 = ranks.iter().map(|&r| r as u64).sum();
    sum as f64 / ranks.len() as f64
}

/// Ranks every metric column the profile knows about and reduces each rank
/// series to its mean.
///
/// Metrics come from the first table, in its column order. Every other table
/// must carry the same metric columns.
pub fn run_stage2(tables: &[MetricTable], profile: &TaskProfile) -> Result<Stage2Output, RankError> {
    let Some(first) = tables.first() else {
        return Err(RankError::EmptyInput("no submissions to rank".to_string()));
    };

    let plan: Vec<(&str, Direction)> = first
        .columns
        .iter()
        .filter_map(|c| profile.direction_of(&c.name).map(|d| (c.name.as_str(), d)))
        .collect();
    if plan.is_empty() {
        return Err(RankError::EmptyInput(format!(
            "submission '{}' has no metric columns ranked by profile '{}'",
            first.id, profile.name
        )));
    }

    // Metrics are independent; collect in column order so the first error is deterministic.
    let ranked: Vec<Result<MetricRanks, RankError>> = plan
        .par_iter()
        .map(|&(metric, direction)| rank_metric(tables, metric, direction))
        .collect();
    let metrics = ranked.into_iter().collect::<Result<Vec<_>, _>>()?;

    let means = tables
        .iter()
        .enumerate()
        .map(|(idx, table)| SubmissionMeans {
            id: table.id.clone(),
            means: metrics
                .iter()
                .map(|m| (m.metric.clone(), mean_rank(&m.ranks[idx])))
                .collect::<MetricMeans>(),
        })
        .collect();

    Ok(Stage2Output { metrics, means })
}

fn rank_metric(
    tables: &[MetricTable],
    metric: &str,
    direction: Direction,
) -> Result<MetricRanks, RankError> {
    let series = tables
        .iter()
        .map(|t| {
            t.column(metric).ok_or_else(|| RankError::MissingMetric {
                submission: t.id.clone(),
                metric: metric.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let ranks = compute_ranks(&series, direction)?;
    Ok(MetricRanks {
        metric: metric.to_string(),
        direction,
        ranks,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_ranks.rs"]
mod tests;
