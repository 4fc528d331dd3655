//! Column-wise AUC over a score matrix.
//!
//! Rows are samples, columns are independent scorers sharing one label
//! vector. Each column runs the scalar engine in AUC-only mode; columns share
//! no state, so with the `parallel` feature they are mapped across the rayon
//! pool. Output order always equals column order.

use ndarray::{ArrayView1, ArrayView2, Axis};

use super::rank::{check_dimensions, LabelCounts};
use super::roc::{roc_auc, RocOptions};
use crate::error::{Result, RocError};

/// Execution strategy for [`compute_roc_batch_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Parallel when the `parallel` feature is enabled, otherwise sequential.
    #[default]
    Auto,
    /// One column after another on the calling thread.
    Sequential,
}

/// AUC of every column of `scores` against the shared `labels`.
///
/// `options.auc_only` is ignored (always on). Fails with `DimensionMismatch`
/// when the row count differs from the label count and with
/// `DegenerateLabelSet` before any column is touched; per-column failures are
/// wrapped in `ColumnFailed`.
pub fn compute_roc_batch(
    scores: ArrayView2<'_, f64>,
    labels: &[bool],
    options: &RocOptions,
) -> Result<Vec<f64>> {
    compute_roc_batch_with(scores, labels, options, BatchMode::Auto)
}

/// [`compute_roc_batch`] with an explicit execution strategy.
pub fn compute_roc_batch_with(
    scores: ArrayView2<'_, f64>,
    labels: &[bool],
    options: &RocOptions,
    mode: BatchMode,
) -> Result<Vec<f64>> {
    let (rows, cols) = scores.dim();
    check_dimensions(rows, labels.len())?;
    LabelCounts::from_labels(labels).ensure_both_classes()?;
    options.validate()?;

    let options = options.with_auc_only(true);
    let columns: Vec<ArrayView1<'_, f64>> = scores.axis_iter(Axis(1)).collect();

    let aucs = match mode {
        BatchMode::Sequential => run_sequential(&columns, labels, &options),
        BatchMode::Auto => run_auto(&columns, labels, &options),
    }?;

    tracing::debug!(rows, cols, ?mode, "batch auc computed");
    Ok(aucs)
}

fn column_auc(
    column: usize,
    values: &ArrayView1<'_, f64>,
    labels: &[bool],
    options: &RocOptions,
) -> Result<f64> {
    let owned;
    let slice = match values.as_slice() {
        Some(s) => s,
        None => {
            owned = values.to_vec();
            &owned
        }
    };
    roc_auc(slice, labels, options).map_err(|e| RocError::ColumnFailed {
        column,
        source: Box::new(e),
    })
}

fn run_sequential(
    columns: &[ArrayView1<'_, f64>],
    labels: &[bool],
    options: &RocOptions,
) -> Result<Vec<f64>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| column_auc(i, c, labels, options))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_auto(
    columns: &[ArrayView1<'_, f64>],
    labels: &[bool],
    options: &RocOptions,
) -> Result<Vec<f64>> {
    use rayon::prelude::*;
    // Workers do not inherit the caller's span.
    let span = tracing::Span::current();
    columns
        .par_iter()
        .enumerate()
        .map(|(i, c)| {
            let _entered = span.enter();
            column_auc(i, c, labels, options)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_auto(
    columns: &[ArrayView1<'_, f64>],
    labels: &[bool],
    options: &RocOptions,
) -> Result<Vec<f64>> {
    run_sequential(columns, labels, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn labels() -> Vec<bool> {
        vec![false, true, false, true]
    }

    #[test]
    fn each_column_matches_scalar_engine() {
        let m = array![[0.1, 1.0, 0.9], [0.4, 1.0, 0.2], [0.35, 1.0, 0.8], [0.8, 1.0, 0.3]];
        let out = compute_roc_batch(m.view(), &labels(), &RocOptions::default()).unwrap();
        assert_eq!(out.len(), 3);
        for (j, auc) in out.iter().enumerate() {
            let col = m.column(j).to_vec();
            let expected = roc_auc(&col, &labels(), &RocOptions::default()).unwrap();
            assert_eq!(*auc, expected, "column {}", j);
        }
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 0.5);
        assert_eq!(out[2], 0.25);
    }

    #[test]
    fn sequential_and_auto_agree() {
        let m = Array2::from_shape_fn((6, 5), |(i, j)| ((i * 7 + j * 3) % 5) as f64);
        let labels = vec![true, false, true, true, false, false];
        let opts = RocOptions::default();
        let auto = compute_roc_batch_with(m.view(), &labels, &opts, BatchMode::Auto).unwrap();
        let seq = compute_roc_batch_with(m.view(), &labels, &opts, BatchMode::Sequential).unwrap();
        assert_eq!(auto, seq);
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        let m = Array2::<f64>::zeros((5, 2));
        let err = compute_roc_batch(m.view(), &labels(), &RocOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RocError::DimensionMismatch {
                scores: 5,
                labels: 4
            }
        );
    }

    #[test]
    fn degenerate_labels_fail_before_columns() {
        let m = Array2::<f64>::zeros((2, 3));
        let err = compute_roc_batch(m.view(), &[true, true], &RocOptions::default()).unwrap_err();
        assert!(matches!(err, RocError::DegenerateLabelSet { .. }));
    }

    #[test]
    fn nan_in_a_column_names_the_column() {
        let m = array![[0.1, 0.2], [0.3, f64::NAN]];
        let err = compute_roc_batch(m.view(), &[true, false], &RocOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RocError::ColumnFailed {
                column: 1,
                source: Box::new(RocError::InvalidScore { index: 1 })
            }
        );
    }

    #[test]
    fn zero_columns_yield_empty_output() {
        let m = Array2::<f64>::zeros((2, 0));
        let out = compute_roc_batch(m.view(), &[true, false], &RocOptions::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn auc_only_flag_is_forced() {
        let m = array![[0.9], [0.1]];
        let opts = RocOptions::default().with_auc_only(false);
        let out = compute_roc_batch(m.view(), &[true, false], &opts).unwrap();
        assert_eq!(out, vec![1.0]);
    }

    #[test]
    fn transposed_view_is_handled() {
        // Columns of a transposed view are contiguous; rows of the original are not.
        let m = array![[0.9, 0.1], [0.2, 0.8]];
        let t = m.t();
        let out = compute_roc_batch(t, &[true, false], &RocOptions::default()).unwrap();
        // Second column ranks its negative first: (0,0) -> (1,1).
        assert_eq!(out, vec![1.0, 0.5]);
    }
}
