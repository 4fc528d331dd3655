//! Command runners: decoded request in, report out.
//!
//! Each runner enters the stage spans of its [`LogContext`] so engine
//! events inherit the run's correlation fields.

use roc_common::{BatchRequest, Error, LoadedConfig, Result, RocRequest};
use roc_math::{
    build_curve, compute_roc_batch_with, rank_groups, roc_auc, roc_table, select_point, BatchMode,
    LabelCounts, RocError, RocOptions, RocTable,
};

use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::output::{AucReport, BatchReport, ColumnAuc, ConfigReport, CurveReport, RunSummary};

/// Full curve table for one scorer.
///
/// `partial` is filled when the cutoff is below 1 or the run is verbose.
pub fn run_curve(ctx: &LogContext, req: &RocRequest, options: &RocOptions) -> Result<CurveReport> {
    options.validate()?;

    let groups = {
        let _span = ctx.span(Stage::Rank).entered();
        rank_groups(&req.scores, &req.labels, options.order())?
    };

    let table = {
        let _span = ctx.span(Stage::Curve).entered();
        let table = RocTable::from_curve(&build_curve(&groups)?);
        log_event!(
            DEBUG,
            event_names::CURVE_BUILT,
            "curve built",
            points = table.len() as u64,
            auc = table.full_auc()
        );
        table
    };

    let partial = if options.x_threshold < 1.0 || options.verbose {
        let _span = ctx.span(Stage::Integrate).entered();
        select_point(&table, options)?
    } else {
        None
    };

    Ok(CurveReport {
        summary: RunSummary::new(&req.labels, options),
        auc: table.full_auc(),
        partial,
        points: table.len(),
        curve: table,
    })
}

/// Scalar (partial) AUC for one scorer, optionally with the selected point.
pub fn run_auc(
    ctx: &LogContext,
    req: &RocRequest,
    options: &RocOptions,
    show_point: bool,
) -> Result<AucReport> {
    let options = options.with_auc_only(true);
    let _span = ctx.span(Stage::Integrate).entered();

    let (auc, point) = if show_point {
        options.validate()?;
        let table = roc_table(&req.scores, &req.labels, options.decreasing)?;
        let point = select_point(&table, &options)?;
        (point.map_or_else(|| table.full_auc(), |p| p.auc), point)
    } else {
        (roc_auc(&req.scores, &req.labels, &options)?, None)
    };

    log_event!(
        DEBUG,
        event_names::AUC_COMPUTED,
        "auc computed",
        auc = auc,
        x_threshold = options.x_threshold
    );

    Ok(AucReport {
        summary: RunSummary::new(&req.labels, &options),
        auc,
        point,
    })
}

/// Column-wise AUC over the request's score matrix.
pub fn run_batch(
    ctx: &LogContext,
    req: &BatchRequest,
    options: &RocOptions,
    mode: BatchMode,
) -> Result<BatchReport> {
    let matrix = {
        let _span = ctx.span(Stage::Load).entered();
        req.to_matrix()?
    };
    let names = req.column_names();

    let _span = ctx.span(Stage::Batch).entered();
    log_event!(
        DEBUG,
        event_names::BATCH_STARTED,
        "batch started",
        rows = matrix.nrows() as u64,
        columns = matrix.ncols() as u64,
        mode = ?mode
    );

    let aucs = compute_roc_batch_with(matrix.view(), &req.labels, options, mode).map_err(|e| {
        if let RocError::ColumnFailed { column, .. } = &e {
            let name = names.get(*column).map(String::as_str).unwrap_or("?");
            log_event!(
                WARN,
                event_names::BATCH_COLUMN_FAILED,
                "column failed",
                column = %name,
                index = *column as u64
            );
        }
        Error::from(e)
    })?;

    log_event!(
        DEBUG,
        event_names::BATCH_FINISHED,
        "batch finished",
        columns = aucs.len() as u64
    );

    let counts = LabelCounts::from_labels(&req.labels);
    let columns = names
        .into_iter()
        .zip(&aucs)
        .map(|(column, &auc)| ColumnAuc { column, auc })
        .collect();

    Ok(BatchReport {
        rows: matrix.nrows(),
        positives: counts.positives,
        negatives: counts.negatives,
        decreasing: options.decreasing,
        x_threshold: options.x_threshold,
        threshold_rule: options.threshold_rule,
        parallel: mode == BatchMode::Auto && cfg!(feature = "parallel"),
        aucs,
        columns,
    })
}

/// Effective configuration report.
pub fn run_config_show(loaded: &LoadedConfig) -> ConfigReport {
    ConfigReport {
        source: loaded.source,
        path: loaded.path.clone(),
        config: loaded.config.clone(),
    }
}
