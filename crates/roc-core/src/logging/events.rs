//! Structured event definitions for logging.
//!
//! Events follow a consistent schema for machine-parseable JSONL output.
//! All events carry the run_id of the invocation and, when known, the stage
//! and command that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Processing stages of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and decoding the request.
    Load,
    /// Sorting and tie grouping.
    Rank,
    /// Curve construction and deduplication.
    Curve,
    /// Trapezoid integration and threshold selection.
    Integrate,
    /// Column-wise matrix evaluation.
    Batch,
    /// Rendering the payload to stdout.
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Rank => "rank",
            Stage::Curve => "curve",
            Stage::Integrate => "integrate",
            Stage::Batch => "batch",
            Stage::Output => "output",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Stage::Init),
            "load" => Ok(Stage::Load),
            "rank" => Ok(Stage::Rank),
            "curve" => Ok(Stage::Curve),
            "integrate" => Ok(Stage::Integrate),
            "batch" => Ok(Stage::Batch),
            "output" => Ok(Stage::Output),
            _ => Err(format!("unknown stage: {}", s)),
        }
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_FAILED: &str = "run.failed";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Load stage
    pub const INPUT_LOADED: &str = "input.loaded";

    // Engine stages
    pub const CURVE_BUILT: &str = "curve.built";
    pub const AUC_COMPUTED: &str = "auc.computed";
    /// Emitted by the engine itself when `verbose` is set.
    pub const PARTIAL_AUC_SELECTED: &str = "roc.partial_auc";

    // Batch stage
    pub const BATCH_STARTED: &str = "batch.started";
    pub const BATCH_FINISHED: &str = "batch.finished";
    pub const BATCH_COLUMN_FAILED: &str = "batch.column_failed";

    // Output stage
    pub const OUTPUT_WRITTEN: &str = "output.written";
}

/// A structured log event, one per JSONL line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    pub level: Level,

    /// Event name (e.g., "run.started", "roc.partial_auc").
    pub event: String,

    /// Unique ID for this invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    /// Subcommand being run (curve, auc, batch, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Additional structured fields (stable keys).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEvent {
    pub fn new(level: Level, event: impl Into<String>) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            run_id: None,
            command: None,
            stage: None,
            message: None,
            fields: HashMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Add a field to the event.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }
}

/// Correlation data shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub command: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, command: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            command: command.into(),
        }
    }

    /// Span carrying run_id, command and stage for everything emitted
    /// inside it, including the engine's own events.
    pub fn span(&self, stage: Stage) -> tracing::Span {
        tracing::info_span!(
            "stage",
            run_id = %self.run_id,
            command = %self.command,
            stage = %stage
        )
    }
}
