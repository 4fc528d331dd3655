//! Trapezoidal integration and partial-AUC selection.

use serde::{Deserialize, Serialize};

use super::curve::CurvePoint;
use super::stable::{clamp_unit, NeumaierSum};
use crate::error::{Result, RocError};

/// How `x_threshold` selects a curve index in AUC-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdRule {
    /// First index whose FPR reaches the threshold (partial AUC up to an
    /// FPR cutoff).
    #[default]
    Fpr,
    /// First index whose cumulative AUC reaches the threshold.
    Auc,
}

impl std::fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdRule::Fpr => write!(f, "fpr"),
            ThresholdRule::Auc => write!(f, "auc"),
        }
    }
}

impl std::str::FromStr for ThresholdRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fpr" | "x" => Ok(ThresholdRule::Fpr),
            "auc" => Ok(ThresholdRule::Auc),
            _ => Err(format!("unknown threshold rule: {}", s)),
        }
    }
}

/// Trapezoid area between each point and its predecessor.
///
/// The first increment is always 0.
pub fn area_increments(points: &[CurvePoint]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    if points.is_empty() {
        return out;
    }
    out.push(0.0);
    for pair in points.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        out.push(0.5 * (cur.fpr - prev.fpr) * (cur.tpr + prev.tpr));
    }
    out
}

/// Running AUC aligned with `points`.
///
/// Uses compensated summation; every entry is clamped to [0, 1], which keeps
/// the series non-decreasing.
pub fn auc_series(points: &[CurvePoint]) -> Vec<f64> {
    let mut acc = NeumaierSum::new();
    area_increments(points)
        .into_iter()
        .map(|inc| {
            acc.add(inc);
            clamp_unit(acc.value())
        })
        .collect()
}

/// One row of the curve table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocRow {
    pub fpr: f64,
    pub tpr: f64,
    /// Cumulative AUC up to and including this point.
    pub auc: f64,
}

/// Curve point chosen by a partial-AUC threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub index: usize,
    pub fpr: f64,
    pub tpr: f64,
    pub auc: f64,
    /// True when no index met the threshold and the last row was used.
    pub fell_back: bool,
}

/// The full curve table: one row per deduplicated point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RocTable {
    rows: Vec<RocRow>,
}

impl RocTable {
    /// Integrate a deduplicated curve.
    pub fn from_curve(points: &[CurvePoint]) -> Self {
        let series = auc_series(points);
        let rows = points
            .iter()
            .zip(series)
            .map(|(p, auc)| RocRow {
                fpr: p.fpr,
                tpr: p.tpr,
                auc,
            })
            .collect();
        RocTable { rows }
    }

    pub fn rows(&self) -> &[RocRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// FPR column.
    pub fn x(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.fpr).collect()
    }

    /// TPR column.
    pub fn y(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.tpr).collect()
    }

    /// Cumulative AUC column.
    pub fn auc_series(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.auc).collect()
    }

    /// Area under the whole curve (0.0 for an empty table).
    pub fn full_auc(&self) -> f64 {
        self.rows.last().map(|r| r.auc).unwrap_or(0.0)
    }

    /// Select the row for a partial-AUC threshold.
    ///
    /// Returns the first row meeting `x_threshold` under `rule`, or the last
    /// row when none does. `None` only for an empty table.
    pub fn select(&self, x_threshold: f64, rule: ThresholdRule) -> Result<Option<Selection>> {
        if x_threshold.is_nan() {
            return Err(RocError::InvalidThreshold);
        }
        let last = match self.rows.len().checked_sub(1) {
            Some(last) => last,
            None => return Ok(None),
        };

        let hit = self.rows.iter().position(|r| match rule {
            ThresholdRule::Fpr => r.fpr >= x_threshold,
            ThresholdRule::Auc => r.auc >= x_threshold,
        });
        let index = hit.unwrap_or(last);
        let row = self.rows[index];
        Ok(Some(Selection {
            index,
            fpr: row.fpr,
            tpr: row.tpr,
            auc: row.auc,
            fell_back: hit.is_none(),
        }))
    }

    /// AUC at the selected row (the full AUC for thresholds >= 1).
    pub fn partial_auc(&self, x_threshold: f64, rule: ThresholdRule) -> Result<f64> {
        Ok(self
            .select(x_threshold, rule)?
            .map(|s| s.auc)
            .unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<CurvePoint> {
        raw.iter().map(|&(x, y)| CurvePoint::new(x, y)).collect()
    }

    #[test]
    fn increments_follow_trapezoid_rule() {
        let curve = pts(&[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
        assert_eq!(area_increments(&curve), vec![0.0, 0.125, 0.375]);
    }

    #[test]
    fn increments_of_empty_curve() {
        assert!(area_increments(&[]).is_empty());
        assert_eq!(area_increments(&pts(&[(0.0, 0.0)])), vec![0.0]);
    }

    #[test]
    fn diagonal_integrates_to_half() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(table.auc_series(), vec![0.0, 0.5]);
        assert_eq!(table.full_auc(), 0.5);
    }

    #[test]
    fn staircase_series_is_cumulative() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.5), (0.5, 1.0), (1.0, 1.0)]));
        let series = table.auc_series();
        assert_eq!(series[0], 0.0);
        assert!((series[1] - 0.375).abs() < 1e-12);
        assert!((series[2] - 0.875).abs() < 1e-12);
    }

    #[test]
    fn table_columns_align() {
        let table = RocTable::from_curve(&pts(&[(0.0, 1.0), (1.0, 1.0)]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.x(), vec![0.0, 1.0]);
        assert_eq!(table.y(), vec![1.0, 1.0]);
        assert_eq!(table.full_auc(), 1.0);
    }

    #[test]
    fn fpr_rule_selects_first_point_at_cutoff() {
        let table = RocTable::from_curve(&pts(&[
            (0.0, 0.5),
            (0.25, 0.75),
            (0.5, 1.0),
            (1.0, 1.0),
        ]));
        let sel = table.select(0.3, ThresholdRule::Fpr).unwrap().unwrap();
        assert_eq!(sel.index, 2);
        assert_eq!(sel.fpr, 0.5);
        assert!(!sel.fell_back);
        assert!((sel.auc - table.auc_series()[2]).abs() < 1e-15);
    }

    #[test]
    fn auc_rule_scans_the_cumulative_area() {
        let table = RocTable::from_curve(&pts(&[
            (0.0, 0.5),
            (0.25, 0.75),
            (0.5, 1.0),
            (1.0, 1.0),
        ]));
        // series: 0, 0.15625, 0.375, 0.875
        let sel = table.select(0.2, ThresholdRule::Auc).unwrap().unwrap();
        assert_eq!(sel.index, 2);
    }

    #[test]
    fn unreachable_threshold_falls_back_to_full_auc() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        for rule in [ThresholdRule::Fpr, ThresholdRule::Auc] {
            let sel = table.select(1.5, rule).unwrap().unwrap();
            assert_eq!(sel.index, 1);
            assert!(sel.fell_back);
            assert_eq!(table.partial_auc(1.5, rule).unwrap(), 0.5);
        }
        // 0.5 diagonal never reaches an AUC of 0.9
        assert_eq!(table.partial_auc(0.9, ThresholdRule::Auc).unwrap(), 0.5);
    }

    #[test]
    fn threshold_one_is_full_auc() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.5), (0.5, 1.0), (1.0, 1.0)]));
        assert_eq!(
            table.partial_auc(1.0, ThresholdRule::Fpr).unwrap(),
            table.full_auc()
        );
        assert_eq!(
            table.partial_auc(1.0, ThresholdRule::Auc).unwrap(),
            table.full_auc()
        );
    }

    #[test]
    fn zero_threshold_selects_first_row() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.5), (1.0, 1.0)]));
        let sel = table.select(0.0, ThresholdRule::Fpr).unwrap().unwrap();
        assert_eq!(sel.index, 0);
        assert_eq!(sel.auc, 0.0);
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(
            table.select(f64::NAN, ThresholdRule::Fpr).unwrap_err(),
            RocError::InvalidThreshold
        );
    }

    #[test]
    fn empty_table_has_no_selection() {
        let table = RocTable::default();
        assert!(table.select(1.0, ThresholdRule::Fpr).unwrap().is_none());
        assert_eq!(table.full_auc(), 0.0);
    }

    #[test]
    fn threshold_rule_parsing() {
        assert_eq!("FPR".parse::<ThresholdRule>().unwrap(), ThresholdRule::Fpr);
        assert_eq!("auc".parse::<ThresholdRule>().unwrap(), ThresholdRule::Auc);
        assert!("tpr".parse::<ThresholdRule>().is_err());
        assert_eq!(ThresholdRule::default(), ThresholdRule::Fpr);
    }

    #[test]
    fn table_serializes_as_row_array() {
        let table = RocTable::from_curve(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["auc"], 0.5);
    }
}
