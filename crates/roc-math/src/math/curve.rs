//! ROC curve construction.
//!
//! Rank groups are accumulated into cumulative (tp, fp) counts, prefixed with
//! the origin, and collapsed so that each distinct false positive rate keeps
//! only its last point. The result is a polyline with strictly increasing FPR
//! and non-decreasing TPR that runs from (0, 0) to (1, 1).

use serde::{Deserialize, Serialize};

use super::rank::{LabelCounts, RankGroup};
use crate::error::Result;

/// A single (FPR, TPR) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// False positive rate (x axis).
    pub fpr: f64,
    /// True positive rate (y axis).
    pub tpr: f64,
}

impl CurvePoint {
    pub const ORIGIN: CurvePoint = CurvePoint { fpr: 0.0, tpr: 0.0 };

    pub fn new(fpr: f64, tpr: f64) -> Self {
        CurvePoint { fpr, tpr }
    }
}

/// Running confusion counts after a prefix of rank groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CumulativeCounts {
    pub tp: usize,
    pub fp: usize,
}

/// Cumulative counts after each group, starting with the origin.
pub fn cumulative_counts(groups: &[RankGroup]) -> Vec<CumulativeCounts> {
    let mut out = Vec::with_capacity(groups.len() + 1);
    let mut running = CumulativeCounts::default();
    out.push(running);
    for g in groups {
        running.tp += g.true_positives;
        running.fp += g.false_positives;
        out.push(running);
    }
    out
}

/// Keep only the last item of every run of equal keys.
///
/// Walks backward from the end: an item survives when its key differs from
/// the key of its immediate successor in the forward sequence. The last item
/// always survives.
pub fn keep_last_per_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Copy,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut kept = Vec::with_capacity(items.len());
    let mut successor: Option<K> = None;
    for item in items.iter().rev() {
        let k = key(item);
        if successor.as_ref() != Some(&k) {
            kept.push(*item);
        }
        successor = Some(k);
    }
    kept.reverse();
    kept
}

/// Collapse points that share an FPR, keeping the last of each run.
pub fn dedup_by_fpr(points: &[CurvePoint]) -> Vec<CurvePoint> {
    keep_last_per_key(points, |p| p.fpr)
}

/// Build the deduplicated ROC curve from rank groups.
///
/// Fails with `DegenerateLabelSet` when the groups do not contain both
/// classes. Deduplication compares integer false positive counts so equal
/// rates are detected exactly.
pub fn build_curve(groups: &[RankGroup]) -> Result<Vec<CurvePoint>> {
    let totals = LabelCounts::from_groups(groups);
    totals.ensure_both_classes()?;

    let cumulative = cumulative_counts(groups);
    let kept = keep_last_per_key(&cumulative, |c| c.fp);

    let positives = totals.positives as f64;
    let negatives = totals.negatives as f64;
    let curve: Vec<CurvePoint> = kept
        .iter()
        .map(|c| CurvePoint::new(c.fp as f64 / negatives, c.tp as f64 / positives))
        .collect();

    tracing::trace!(
        groups = groups.len(),
        raw_points = cumulative.len(),
        points = curve.len(),
        "curve built"
    );
    Ok(curve)
}
