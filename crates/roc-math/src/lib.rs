//! ROC curve and AUC engine.
//!
//! Three stages per scorer: rank and tie grouping ([`math::rank`]), curve
//! construction with FPR deduplication ([`math::curve`]), and trapezoidal
//! integration with partial-AUC selection ([`math::integrate`]).
//! [`compute_roc_batch`] repeats them per column of a score matrix.

pub mod error;
pub mod math;

pub use ndarray;

pub use error::{Result, RocError};
pub use math::batch::{compute_roc_batch, compute_roc_batch_with, BatchMode};
pub use math::curve::{build_curve, dedup_by_fpr, CurvePoint};
pub use math::integrate::{area_increments, auc_series, RocRow, RocTable, Selection, ThresholdRule};
pub use math::rank::{rank_groups, LabelCounts, RankGroup, ScoreOrder};
pub use math::roc::{compute_roc, roc_auc, roc_table, select_point, RocOptions, RocOutput};
pub use math::stable::*;
