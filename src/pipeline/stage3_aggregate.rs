use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::RankError;
use crate::model::profile::{DEFAULT_TOP_N, MetricPartition, TieBreak};
use crate::model::summary::{
    AggregationMode, ScoredSubmission, SubmissionMeans, SubmissionScores, Summary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub top_n: usize,
    pub tie_break: TieBreak,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            tie_break: TieBreak::SubmissionId,
        }
    }
}

/// Folds per-metric mean ranks into composites and selects winners.
///
/// Lower composites are better: every input is a mean rank and rank 1 is best,
/// whatever the direction of the underlying metric.
pub fn summarize(
    submissions: &[SubmissionMeans],
    partition: &MetricPartition,
    options: &AggregateOptions,
) -> Result<Summary, RankError> {
    if submissions.is_empty() {
        return Err(RankError::EmptyInput(
            "no submissions to aggregate".to_string(),
        ));
    }

    let (mode, categories, scores) = match partition {
        MetricPartition::Flat { metrics } => {
            if metrics.is_empty() {
                return Err(RankError::EmptyInput(
                    "flat partition names no metrics".to_string(),
                ));
            }
            let scores = submissions
                .iter()
                .map(|sub| {
                    Ok(SubmissionScores {
                        id: sub.id.clone(),
                        composite: mean_of(sub, metrics.iter().map(String::as_str))?,
                        categories: BTreeMap::new(),
                    })
                })
                .collect::<Result<Vec<_>, RankError>>()?;
            (AggregationMode::Flat, Vec::new(), scores)
        }
        MetricPartition::Categorized { family, members } => {
            if members.is_empty() {
                return Err(RankError::EmptyInput(
                    "categorized partition names no member metrics".to_string(),
                ));
            }
            let categories = discover_categories(submissions, family);
            if categories.is_empty() {
                return Err(RankError::EmptyInput(format!(
                    "no metric starts with category family '{family}'"
                )));
            }
            let scores = submissions
                .iter()
                .map(|sub| score_categories(sub, &categories, members))
                .collect::<Result<Vec<_>, RankError>>()?;
            (AggregationMode::Categorized, categories, scores)
        }
    };

    let tie_break = options.tie_break;
    let best_per_category = categories
        .iter()
        .filter_map(|category| {
            scores
                .iter()
                .filter_map(|s| s.categories.get(category).map(|&v| (s.id.as_str(), v)))
                .min_by(|a, b| compare_scored(*a, *b, tie_break))
                .map(|(id, score)| {
                    (
                        category.clone(),
                        ScoredSubmission {
                            id: id.to_string(),
                            score,
                        },
                    )
                })
        })
        .collect::<BTreeMap<_, _>>();

    let mut ordering: Vec<ScoredSubmission> = scores
        .iter()
        .map(|s| ScoredSubmission {
            id: s.id.clone(),
            score: s.composite,
        })
        .collect();
    // Stable, so InputOrder keeps first-encountered among equal composites.
    ordering.sort_by(|a, b| {
        compare_scored((a.id.as_str(), a.score), (b.id.as_str(), b.score), tie_break)
    });

    let best_overall = ordering[0].clone();
    let top = ordering.iter().take(options.top_n).cloned().collect();

    Ok(Summary {
        mode,
        tie_break,
        categories,
        scores,
        best_per_category,
        best_overall,
        ordering,
        top,
    })
}

/// Distinct suffixes of metric names starting with `family`, over all
/// submissions, sorted.
pub fn discover_categories(submissions: &[SubmissionMeans], family: &str) -> Vec<String> {
    submissions
        .iter()
        .flat_map(|sub| sub.means.keys())
        .filter_map(|metric| metric.strip_prefix(family))
        .filter(|suffix| !suffix.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn score_categories(
    sub: &SubmissionMeans,
    categories: &[String],
    members: &[String],
) -> Result<SubmissionScores, RankError> {
    let mut by_category = BTreeMap::new();
    for category in categories {
        let names: Vec<String> = members.iter().map(|m| format!("{m}{category}")).collect();
        let score = mean_of(sub, names.iter().map(String::as_str))?;
        by_category.insert(category.clone(), score);
    }
    let composite = by_category.values().sum::<f64>() / by_category.len() as f64;
    Ok(SubmissionScores {
        id: sub.id.clone(),
        composite,
        categories: by_category,
    })
}

fn mean_of<'a>(
    sub: &SubmissionMeans,
    metrics: impl Iterator<Item = &'a str>,
) -> Result<f64, RankError> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for metric in metrics {
        let value = sub.means.get(metric).ok_or_else(|| RankError::MissingMetric {
            submission: sub.id.clone(),
            metric: metric.to_string(),
        })?;
        sum += value;
        count += 1;
    }
    Ok(sum / count as f64)
}

fn compare_scored(a: (&str, f64), b: (&str, f64), tie_break: TieBreak) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| match tie_break {
        TieBreak::SubmissionId => a.0.cmp(b.0),
        TieBreak::InputOrder => Ordering::Equal,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_aggregate.rs"]
mod tests;
