use std::cmp::Ordering;

use serde::Serialize;

/// Which end of a metric's scale is the better one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Overlap/quality metrics (Dice, NSD, PSNR, SSIM).
    #[default]
    HigherIsBetter,
    /// Error metrics (MSE).
    LowerIsBetter,
}

impl Direction {
    /// Orders two scores best-first: `Less` means `a` is better than `b`.
    ///
    /// NaN is worse than every comparable score in both directions and
    /// equal to itself. `0.0` and `-0.0` compare equal.
    pub fn quality_cmp(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Direction::HigherIsBetter => ord.reverse(),
                    Direction::LowerIsBetter => ord,
                }
            }
        }
    }
}

/// Assigns a direction to every metric column whose name contains `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRule {
    pub pattern: String,
    pub direction: Direction,
}

impl MetricRule {
    pub fn new(pattern: &str, direction: Direction) -> Self {
        Self {
            pattern: pattern.to_string(),
            direction,
        }
    }
}

/// How per-metric mean ranks are folded into one composite per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricPartition {
    /// Composite is the mean of a fixed metric set.
    Flat { metrics: Vec<String> },
    /// Categories are the suffixes of metric names starting with `family`.
    /// A category score is the mean of `member + category` over `members`;
    /// the composite is the mean of the category scores.
    Categorized {
        family: String,
        members: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Equal scores are ordered lexicographically by submission id.
    #[default]
    SubmissionId,
    /// Equal scores keep the order the submissions were supplied in.
    InputOrder,
}

#[derive(Debug, Clone)]
pub struct TaskProfile {
    pub name: String,
    pub rules: Vec<MetricRule>,
    pub ignore_prefixes: Vec<String>,
    pub partition: MetricPartition,
    pub key_column: String,
    pub top_n: usize,
}

pub const DEFAULT_TOP_N: usize = 10;

impl TaskProfile {
    /// Lesion-wise segmentation scoring: Dice and NSD at two tolerances, per region.
    pub fn lesionwise_v1() -> Self {
        Self {
            name: "lesionwise".to_string(),
            rules: vec![
                MetricRule::new("Dice", Direction::HigherIsBetter),
                MetricRule::new("NSD", Direction::HigherIsBetter),
            ],
            ignore_prefixes: vec!["Num".to_string()],
            partition: MetricPartition::Categorized {
                family: "LesionWise_Dice_".to_string(),
                members: vec![
                    "LesionWise_Dice_".to_string(),
                    "LesionWise_NSD_1.0_".to_string(),
                    "LesionWise_NSD_0.5_".to_string(),
                ],
            },
            key_column: "Label".to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Image inpainting scoring: one flat composite over SSIM, PSNR and MSE.
    pub fn inpainting_v1() -> Self {
        Self {
            name: "inpainting".to_string(),
            rules: vec![
                MetricRule::new("MSE", Direction::LowerIsBetter),
                MetricRule::new("PSNR", Direction::HigherIsBetter),
                MetricRule::new("SSIM", Direction::HigherIsBetter),
            ],
            ignore_prefixes: vec!["Num".to_string()],
            partition: MetricPartition::Flat {
                metrics: vec!["SSIM".to_string(), "PSNR".to_string(), "MSE".to_string()],
            },
            key_column: "Label".to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| column.starts_with(prefix.as_str()))
    }

    /// Direction for a ranked column, or `None` when the column is not ranked.
    pub fn direction_of(&self, column: &str) -> Option<Direction> {
        if self.is_ignored(column) {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| column.contains(rule.pattern.as_str()))
            .map(|rule| rule.direction)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
