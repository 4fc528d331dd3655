//! Rank and tie grouping.
//!
//! Samples are ordered by score and every run of equal scores is collapsed
//! into one [`RankGroup`] carrying its positive and negative counts. A tied
//! group therefore moves the curve in a single step: there is never an
//! intermediate point between two samples that share a score.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{Result, RocError};

/// Direction in which scores are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrder {
    /// Higher score = more likely positive.
    #[default]
    Decreasing,
    /// Lower score = more likely positive (distances, p-values).
    Increasing,
}

impl ScoreOrder {
    /// Map the conventional `decreasing` flag onto an order.
    pub fn from_decreasing(decreasing: bool) -> Self {
        if decreasing {
            ScoreOrder::Decreasing
        } else {
            ScoreOrder::Increasing
        }
    }

    fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            ScoreOrder::Decreasing => b.total_cmp(&a),
            ScoreOrder::Increasing => a.total_cmp(&b),
        }
    }
}

impl std::fmt::Display for ScoreOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreOrder::Decreasing => write!(f, "decreasing"),
            ScoreOrder::Increasing => write!(f, "increasing"),
        }
    }
}

/// All samples sharing one score value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankGroup {
    /// The shared score.
    pub score: f64,
    /// Positive labels in the group.
    pub true_positives: usize,
    /// Negative labels in the group.
    pub false_positives: usize,
}

impl RankGroup {
    /// Number of samples in the group.
    pub fn size(&self) -> usize {
        self.true_positives + self.false_positives
    }
}

/// Positive/negative totals of a label vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelCounts {
    pub positives: usize,
    pub negatives: usize,
}

impl LabelCounts {
    /// Count the classes in `labels`.
    pub fn from_labels(labels: &[bool]) -> Self {
        let positives = labels.iter().filter(|&&l| l).count();
        LabelCounts {
            positives,
            negatives: labels.len() - positives,
        }
    }

    /// Sum the classes over a sequence of rank groups.
    pub fn from_groups(groups: &[RankGroup]) -> Self {
        groups.iter().fold(LabelCounts::default(), |acc, g| LabelCounts {
            positives: acc.positives + g.true_positives,
            negatives: acc.negatives + g.false_positives,
        })
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.positives + self.negatives
    }

    /// Fail unless both classes are present.
    pub fn ensure_both_classes(&self) -> Result<()> {
        if self.positives == 0 || self.negatives == 0 {
            return Err(RocError::DegenerateLabelSet {
                positives: self.positives,
                negatives: self.negatives,
            });
        }
        Ok(())
    }
}

/// Fail with `DimensionMismatch` unless the lengths agree.
pub fn check_dimensions(scores: usize, labels: usize) -> Result<()> {
    if scores != labels {
        return Err(RocError::DimensionMismatch { scores, labels });
    }
    Ok(())
}

/// Group samples into rank groups ordered by `order`.
///
/// Sorting uses `f64::total_cmp` and grouping uses `==`, so `-0.0` and `0.0`
/// share a group and infinities are ordinary scores. NaN is rejected.
pub fn rank_groups(scores: &[f64], labels: &[bool], order: ScoreOrder) -> Result<Vec<RankGroup>> {
    check_dimensions(scores.len(), labels.len())?;
    if let Some(index) = scores.iter().position(|s| s.is_nan()) {
        return Err(RocError::InvalidScore { index });
    }

    let mut samples: Vec<(f64, bool)> = scores
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .collect();
    samples.sort_by(|a, b| order.compare(a.0, b.0));

    let groups: Vec<RankGroup> = samples
        .chunk_by(|a, b| a.0 == b.0)
        .map(|run| {
            let true_positives = run.iter().filter(|(_, positive)| *positive).count();
            RankGroup {
                score: run[0].0,
                true_positives,
                false_positives: run.len() - true_positives,
            }
        })
        .collect();

    tracing::trace!(
        samples = scores.len(),
        groups = groups.len(),
        order = %order,
        "rank groups built"
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_follow_decreasing_order() {
        let groups = rank_groups(
            &[0.1, 0.4, 0.35, 0.8],
            &[false, true, false, true],
            ScoreOrder::Decreasing,
        )
        .unwrap();
        let scores: Vec<f64> = groups.iter().map(|g| g.score).collect();
        assert_eq!(scores, vec![0.8, 0.4, 0.35, 0.1]);
        assert_eq!(groups[0].true_positives, 1);
        assert_eq!(groups[3].false_positives, 1);
    }

    #[test]
    fn groups_follow_increasing_order() {
        let groups =
            rank_groups(&[3.0, 1.0, 2.0], &[true, false, true], ScoreOrder::Increasing).unwrap();
        let scores: Vec<f64> = groups.iter().map(|g| g.score).collect();
        assert_eq!(scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn ties_collapse_into_one_group() {
        let groups = rank_groups(
            &[1.0, 1.0, 1.0, 1.0],
            &[true, false, true, false],
            ScoreOrder::Decreasing,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].true_positives, 2);
        assert_eq!(groups[0].false_positives, 2);
        assert_eq!(groups[0].size(), 4);
    }

    #[test]
    fn ties_are_grouped_even_when_not_adjacent_in_input() {
        let groups = rank_groups(
            &[0.5, 0.9, 0.5, 0.2, 0.5],
            &[true, true, false, false, false],
            ScoreOrder::Decreasing,
        )
        .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].score, 0.5);
        assert_eq!(groups[1].true_positives, 1);
        assert_eq!(groups[1].false_positives, 2);
    }

    #[test]
    fn signed_zeros_share_a_group() {
        let groups = rank_groups(&[-0.0, 0.0, 1.0], &[true, false, true], ScoreOrder::Decreasing)
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].size(), 2);
    }

    #[test]
    fn infinities_are_valid_scores() {
        let groups = rank_groups(
            &[f64::NEG_INFINITY, f64::INFINITY, 0.0],
            &[false, true, false],
            ScoreOrder::Decreasing,
        )
        .unwrap();
        assert_eq!(groups[0].score, f64::INFINITY);
        assert_eq!(groups[2].score, f64::NEG_INFINITY);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = rank_groups(
            &[0.1, 0.2, 0.3, 0.4, 0.5],
            &[true, false, true, false],
            ScoreOrder::Decreasing,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RocError::DimensionMismatch {
                scores: 5,
                labels: 4
            }
        );
    }

    #[test]
    fn nan_score_is_rejected_with_index() {
        let err = rank_groups(&[0.1, f64::NAN], &[true, false], ScoreOrder::Decreasing)
            .unwrap_err();
        assert_eq!(err, RocError::InvalidScore { index: 1 });
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = rank_groups(&[], &[], ScoreOrder::Decreasing).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn label_counts_detect_degenerate_sets() {
        assert!(LabelCounts::from_labels(&[true, true]).ensure_both_classes().is_err());
        assert!(LabelCounts::from_labels(&[false]).ensure_both_classes().is_err());
        assert!(LabelCounts::from_labels(&[]).ensure_both_classes().is_err());
        assert!(LabelCounts::from_labels(&[true, false]).ensure_both_classes().is_ok());
    }

    #[test]
    fn label_counts_from_groups_match_labels() {
        let labels = [true, false, false, true, true];
        let groups =
            rank_groups(&[0.3, 0.3, 0.1, 0.9, 0.1], &labels, ScoreOrder::Decreasing).unwrap();
        assert_eq!(LabelCounts::from_groups(&groups), LabelCounts::from_labels(&labels));
    }

    #[test]
    fn score_order_serde_names() {
        assert_eq!(
            serde_json::to_string(&ScoreOrder::Increasing).unwrap(),
            "\"increasing\""
        );
        assert_eq!(ScoreOrder::from_decreasing(true), ScoreOrder::Decreasing);
        assert_eq!(ScoreOrder::Decreasing.to_string(), "decreasing");
    }
}
