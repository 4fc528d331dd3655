//! Scalar ROC engine: rank, build the curve, integrate.

use serde::{Deserialize, Serialize};

use super::curve::build_curve;
use super::integrate::{RocTable, Selection, ThresholdRule};
use super::rank::{rank_groups, ScoreOrder};
use crate::error::{Result, RocError};

/// Options for [`compute_roc`].
///
/// `Default` gives the conventional call: decreasing scores, full table,
/// `x_threshold = 1`, FPR threshold rule, no diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocOptions {
    /// Higher score = more positive. `false` ranks ascending.
    pub decreasing: bool,
    /// Return only the (partial) AUC instead of the curve table.
    pub auc_only: bool,
    /// Partial-AUC cutoff; values >= 1 select the full AUC.
    pub x_threshold: f64,
    /// What `x_threshold` is compared against.
    pub threshold_rule: ThresholdRule,
    /// Emit the selected point as an info event on `roc.partial_auc`.
    pub verbose: bool,
}

impl Default for RocOptions {
    fn default() -> Self {
        RocOptions {
            decreasing: true,
            auc_only: false,
            x_threshold: 1.0,
            threshold_rule: ThresholdRule::Fpr,
            verbose: false,
        }
    }
}

impl RocOptions {
    pub fn with_decreasing(mut self, decreasing: bool) -> Self {
        self.decreasing = decreasing;
        self
    }

    pub fn with_auc_only(mut self, auc_only: bool) -> Self {
        self.auc_only = auc_only;
        self
    }

    pub fn with_x_threshold(mut self, x_threshold: f64) -> Self {
        self.x_threshold = x_threshold;
        self
    }

    pub fn with_threshold_rule(mut self, rule: ThresholdRule) -> Self {
        self.threshold_rule = rule;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn order(&self) -> ScoreOrder {
        ScoreOrder::from_decreasing(self.decreasing)
    }

    /// Reject options that cannot select a curve index.
    pub fn validate(&self) -> Result<()> {
        if self.x_threshold.is_nan() {
            return Err(RocError::InvalidThreshold);
        }
        Ok(())
    }
}

/// Result of [`compute_roc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RocOutput {
    /// Full mode: one row per deduplicated curve point.
    Curve(RocTable),
    /// AUC-only mode: AUC at the selected index.
    Auc(f64),
}

impl RocOutput {
    /// The scalar AUC, if this is an AUC-only result.
    pub fn auc(&self) -> Option<f64> {
        match self {
            RocOutput::Auc(v) => Some(*v),
            RocOutput::Curve(_) => None,
        }
    }

    /// The curve table, if this is a full result.
    pub fn curve(&self) -> Option<&RocTable> {
        match self {
            RocOutput::Curve(t) => Some(t),
            RocOutput::Auc(_) => None,
        }
    }
}

/// Build the full curve table for one scorer.
pub fn roc_table(scores: &[f64], labels: &[bool], decreasing: bool) -> Result<RocTable> {
    let groups = rank_groups(scores, labels, ScoreOrder::from_decreasing(decreasing))?;
    let curve = build_curve(&groups)?;
    Ok(RocTable::from_curve(&curve))
}

/// Select the partial-AUC row of `table` per `options`, emitting the
/// verbose diagnostic when requested.
pub fn select_point(table: &RocTable, options: &RocOptions) -> Result<Option<Selection>> {
    let selection = table.select(options.x_threshold, options.threshold_rule)?;
    if options.verbose {
        if let Some(sel) = selection {
            tracing::info!(
                target: "roc.partial_auc",
                index = sel.index,
                fpr = sel.fpr,
                tpr = sel.tpr,
                auc = sel.auc,
                fell_back = sel.fell_back,
                rule = %options.threshold_rule,
                x_threshold = options.x_threshold,
                "selected curve point"
            );
        }
    }
    Ok(selection)
}

/// Compute the ROC curve or the (partial) AUC of one scorer.
///
/// Fails with `DimensionMismatch` when the lengths differ,
/// `DegenerateLabelSet` when only one class is present, `InvalidScore` on a
/// NaN score and `InvalidThreshold` on a NaN cutoff. Nothing is returned on
/// error.
pub fn compute_roc(scores: &[f64], labels: &[bool], options: &RocOptions) -> Result<RocOutput> {
    options.validate()?;
    let table = roc_table(scores, labels, options.decreasing)?;
    tracing::debug!(
        samples = scores.len(),
        points = table.len(),
        auc = table.full_auc(),
        "roc computed"
    );

    if !options.auc_only {
        return Ok(RocOutput::Curve(table));
    }
    let auc = select_point(&table, options)?
        .map(|s| s.auc)
        .unwrap_or_else(|| table.full_auc());
    Ok(RocOutput::Auc(auc))
}

/// Scalar AUC shortcut: `compute_roc` with `auc_only` forced on.
pub fn roc_auc(scores: &[f64], labels: &[bool], options: &RocOptions) -> Result<f64> {
    let options = options.with_auc_only(true);
    match compute_roc(scores, labels, &options)? {
        RocOutput::Auc(v) => Ok(v),
        RocOutput::Curve(t) => Ok(t.full_auc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORES: [f64; 4] = [0.1, 0.4, 0.35, 0.8];
    const LABELS: [bool; 4] = [false, true, false, true];

    #[test]
    fn defaults_match_conventional_call() {
        let opts = RocOptions::default();
        assert!(opts.decreasing);
        assert!(!opts.auc_only);
        assert_eq!(opts.x_threshold, 1.0);
        assert_eq!(opts.threshold_rule, ThresholdRule::Fpr);
        assert!(!opts.verbose);
    }

    #[test]
    fn full_mode_returns_table() {
        let out = compute_roc(&SCORES, &LABELS, &RocOptions::default()).unwrap();
        let table = out.curve().expect("full mode");
        assert_eq!(table.len(), 3);
        assert_eq!(table.full_auc(), 1.0);
        assert!(out.auc().is_none());
    }

    #[test]
    fn auc_only_mode_returns_scalar() {
        let opts = RocOptions::default().with_auc_only(true);
        let out = compute_roc(&SCORES, &LABELS, &opts).unwrap();
        assert_eq!(out, RocOutput::Auc(1.0));
    }

    #[test]
    fn increasing_order_ranks_the_negatives_first() {
        // Points: (0, 0), (0.5, 0), (1, 1)
        let opts = RocOptions::default().with_decreasing(false);
        assert_eq!(roc_auc(&SCORES, &LABELS, &opts).unwrap(), 0.25);
    }

    #[test]
    fn partial_auc_stops_at_fpr_cutoff() {
        let scores = [0.9, 0.8, 0.7, 0.6, 0.5, 0.4];
        let labels = [true, false, true, false, true, false];
        let full = roc_auc(&scores, &labels, &RocOptions::default()).unwrap();
        let partial = roc_auc(
            &scores,
            &labels,
            &RocOptions::default().with_x_threshold(0.3),
        )
        .unwrap();
        assert!(partial < full);
        assert!(partial > 0.0);
    }

    #[test]
    fn verbose_does_not_change_result() {
        let quiet = RocOptions::default().with_x_threshold(0.5);
        let loud = quiet.with_verbose(true);
        assert_eq!(
            roc_auc(&SCORES, &LABELS, &quiet).unwrap(),
            roc_auc(&SCORES, &LABELS, &loud).unwrap()
        );
    }

    #[test]
    fn nan_threshold_fails_before_work() {
        let opts = RocOptions::default().with_x_threshold(f64::NAN);
        assert_eq!(
            compute_roc(&SCORES, &LABELS, &opts).unwrap_err(),
            RocError::InvalidThreshold
        );
    }

    #[test]
    fn degenerate_labels_fail() {
        let err = compute_roc(&[0.1, 0.2], &[false, false], &RocOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RocError::DegenerateLabelSet {
                positives: 0,
                negatives: 2
            }
        );
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: RocOptions = serde_json::from_str(r#"{"x_threshold": 0.2}"#).unwrap();
        assert_eq!(opts.x_threshold, 0.2);
        assert!(opts.decreasing);
    }

    #[test]
    fn output_serializes_with_mode_tag() {
        let json = serde_json::to_value(RocOutput::Auc(0.75)).unwrap();
        assert_eq!(json["mode"], "auc");
        assert_eq!(json["value"], 0.75);
    }
}
