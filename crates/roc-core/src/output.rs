//! Command payloads and their rendering.
//!
//! Every command produces a report that serializes into the `result` field
//! of a versioned [`Envelope`]. The same report renders as Markdown or as a
//! one-line summary for humans.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use roc_common::config::{ConfigSource, RocConfig};
use roc_common::{OutputFormat, Result, SCHEMA_VERSION};
use roc_math::{LabelCounts, RocTable, Selection, ThresholdRule};
use serde::Serialize;

/// Versioned wrapper around every JSON payload.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub run_id: &'a str,
    pub command: &'a str,
    pub result: &'a T,
}

/// A report that can be written in every [`OutputFormat`].
pub trait Render: Serialize {
    /// Subcommand name recorded in the envelope.
    fn command(&self) -> &'static str;
    fn markdown(&self) -> String;
    fn summary(&self) -> String;
}

/// Render `report` for stdout.
pub fn render<T: Render>(report: &T, format: OutputFormat, run_id: &str) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&Envelope {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            run_id,
            command: report.command(),
            result: report,
        })?,
        OutputFormat::Md => report.markdown(),
        OutputFormat::Summary => report.summary(),
    })
}

/// Inputs and settings shared by the scalar reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub positives: usize,
    pub negatives: usize,
    pub decreasing: bool,
    pub x_threshold: f64,
    pub threshold_rule: ThresholdRule,
}

impl RunSummary {
    pub fn new(labels: &[bool], options: &roc_math::RocOptions) -> Self {
        let counts = LabelCounts::from_labels(labels);
        RunSummary {
            samples: counts.total(),
            positives: counts.positives,
            negatives: counts.negatives,
            decreasing: options.decreasing,
            x_threshold: options.x_threshold,
            threshold_rule: options.threshold_rule,
        }
    }

    fn markdown_rows(&self, out: &mut String) {
        let order = if self.decreasing {
            "decreasing"
        } else {
            "increasing"
        };
        let _ = writeln!(out, "| samples | {} |", self.samples);
        let _ = writeln!(out, "| positives | {} |", self.positives);
        let _ = writeln!(out, "| negatives | {} |", self.negatives);
        let _ = writeln!(out, "| order | {} |", order);
        let _ = writeln!(
            out,
            "| threshold | {} ({}) |",
            fmt_num(self.x_threshold),
            self.threshold_rule
        );
    }

    fn counts(&self) -> String {
        format!("n={} (+{}/-{})", self.samples, self.positives, self.negatives)
    }
}

/// `curve`: the full table plus headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Area under the whole curve.
    pub auc: f64,
    /// Selected point when a cutoff below 1 was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<Selection>,
    pub points: usize,
    pub curve: RocTable,
}

impl Render for CurveReport {
    fn command(&self) -> &'static str {
        "curve"
    }

    fn markdown(&self) -> String {
        let mut out = String::from("# ROC curve\n\n| | |\n|---|---|\n");
        self.summary.markdown_rows(&mut out);
        let _ = writeln!(out, "| auc | {} |", fmt_num(self.auc));
        if let Some(ref p) = self.partial {
            let _ = writeln!(out, "| partial auc | {} (row {}) |", fmt_num(p.auc), p.index);
        }
        out.push_str("\n| # | fpr | tpr | auc |\n|---:|---:|---:|---:|\n");
        for (i, row) in self.curve.rows().iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                i,
                fmt_num(row.fpr),
                fmt_num(row.tpr),
                fmt_num(row.auc)
            );
        }
        out
    }

    fn summary(&self) -> String {
        let mut line = format!(
            "[curve] auc={} points={} {}",
            fmt_num(self.auc),
            self.points,
            self.summary.counts()
        );
        if let Some(ref p) = self.partial {
            let _ = write!(line, " partial_auc={}", fmt_num(p.auc));
        }
        line
    }
}

/// `auc`: the (partial) AUC and optionally the point it was read at.
#[derive(Debug, Clone, Serialize)]
pub struct AucReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub auc: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Selection>,
}

impl Render for AucReport {
    fn command(&self) -> &'static str {
        "auc"
    }

    fn markdown(&self) -> String {
        let mut out = String::from("# AUC\n\n| | |\n|---|---|\n");
        self.summary.markdown_rows(&mut out);
        let _ = writeln!(out, "| auc | {} |", fmt_num(self.auc));
        if let Some(ref p) = self.point {
            let _ = writeln!(
                out,
                "| point | row {} at fpr={} tpr={}{} |",
                p.index,
                fmt_num(p.fpr),
                fmt_num(p.tpr),
                if p.fell_back { " (fallback)" } else { "" }
            );
        }
        out
    }

    fn summary(&self) -> String {
        let mut line = format!("[auc] auc={} {}", fmt_num(self.auc), self.summary.counts());
        if self.summary.x_threshold < 1.0 {
            let _ = write!(
                line,
                " x_threshold={} rule={}",
                fmt_num(self.summary.x_threshold),
                self.summary.threshold_rule
            );
        }
        line
    }
}

/// One column of a `batch` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAuc {
    pub column: String,
    pub auc: f64,
}

/// `batch`: one AUC per matrix column, in column order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub rows: usize,
    pub positives: usize,
    pub negatives: usize,
    pub decreasing: bool,
    pub x_threshold: f64,
    pub threshold_rule: ThresholdRule,
    pub parallel: bool,
    pub aucs: Vec<f64>,
    pub columns: Vec<ColumnAuc>,
}

impl Render for BatchReport {
    fn command(&self) -> &'static str {
        "batch"
    }

    fn markdown(&self) -> String {
        let mut out = format!(
            "# Batch AUC\n\n{} rows (+{}/-{}), {} columns\n\n| column | auc |\n|---|---:|\n",
            self.rows,
            self.positives,
            self.negatives,
            self.columns.len()
        );
        for c in &self.columns {
            let _ = writeln!(out, "| {} | {} |", c.column, fmt_num(c.auc));
        }
        out
    }

    fn summary(&self) -> String {
        let best = self
            .columns
            .iter()
            .max_by(|a, b| a.auc.total_cmp(&b.auc))
            .map(|c| format!(" best={}:{}", c.column, fmt_num(c.auc)))
            .unwrap_or_default();
        format!(
            "[batch] columns={} rows={}{}",
            self.columns.len(),
            self.rows,
            best
        )
    }
}

/// `config show`: the effective configuration and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub source: ConfigSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub config: RocConfig,
}

impl Render for ConfigReport {
    fn command(&self) -> &'static str {
        "config show"
    }

    fn markdown(&self) -> String {
        let toml = self
            .config
            .to_toml_string()
            .unwrap_or_else(|e| format!("# {}\n", e));
        format!(
            "# Configuration\n\nsource: {}{}\n\n```toml\n{}```\n",
            self.source,
            self.path
                .as_deref()
                .map(|p| format!(" ({})", p))
                .unwrap_or_default(),
            toml
        )
    }

    fn summary(&self) -> String {
        let e = &self.config.engine;
        format!(
            "[config] source={} decreasing={} x_threshold={} rule={} parallel={}",
            self.source,
            e.decreasing,
            fmt_num(e.x_threshold),
            e.threshold_rule,
            self.config.batch.parallel
        )
    }
}

/// `version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub version: &'static str,
    pub schema_version: &'static str,
    pub rust_version: &'static str,
    pub parallel: bool,
}

impl VersionReport {
    pub fn current() -> Self {
        VersionReport {
            version: env!("CARGO_PKG_VERSION"),
            schema_version: SCHEMA_VERSION,
            rust_version: env!("CARGO_PKG_RUST_VERSION"),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl Render for VersionReport {
    fn command(&self) -> &'static str {
        "version"
    }

    fn markdown(&self) -> String {
        format!(
            "# roc-core {}\n\nschema version: {}\n",
            self.version, self.schema_version
        )
    }

    fn summary(&self) -> String {
        format!("roc-core {} (schema {})", self.version, self.schema_version)
    }
}

/// Fixed six-decimal formatting for human output.
fn fmt_num(v: f64) -> String {
    format!("{:.6}", v)
}
