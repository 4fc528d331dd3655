//! Error types for the ROC workspace.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Dimension Mismatch
//!   Reason: dimension mismatch: 5 scores but 4 labels
//!   Fix: Supply exactly one label per score (or per matrix row).
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 31,
//!   "category": "engine",
//!   "message": "dimension mismatch: 5 scores but 4 labels",
//!   "recoverable": false,
//!   "suggested_action": "fix_input",
//!   "context": { "scores": 5, "labels": 4 }
//! }
//! ```

use roc_math::RocError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Malformed requests handed to the engine.
    Input,
    /// Engine precondition failures.
    Engine,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Engine => write!(f, "engine"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Correct the scores/labels and resubmit.
    FixInput,
    /// Correct or remove the configuration file.
    FixConfig,
    /// Retry the operation.
    Retry,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::Retry => write!(f, "retry"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Input errors (20-29)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Engine errors (30-39)
    #[error(transparent)]
    Roc(#[from] RocError),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Engine errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::ConfigParse { .. } => 11,
            Error::Toml(_) => 12,
            Error::InvalidInput(_) => 20,
            Error::Roc(e) => match e.root() {
                RocError::DimensionMismatch { .. } => 31,
                RocError::DegenerateLabelSet { .. } => 32,
                RocError::InvalidScore { .. } => 33,
                RocError::InvalidThreshold => 34,
                RocError::ColumnFailed { .. } => 30,
            },
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::ConfigParse { .. } | Error::Toml(_) => ErrorCategory::Config,
            Error::InvalidInput(_) => ErrorCategory::Input,
            Error::Roc(_) => ErrorCategory::Engine,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Recoverable errors go away by fixing the invocation (config, flags,
    /// JSON syntax, file access). Errors in the scored data itself do not:
    /// the same scores and labels fail the same way on every run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::ConfigParse { .. } | Error::Toml(_) => true,
            Error::InvalidInput(_) => false,
            Error::Roc(e) => match e.root() {
                RocError::InvalidThreshold => true,
                RocError::DimensionMismatch { .. }
                | RocError::DegenerateLabelSet { .. }
                | RocError::InvalidScore { .. }
                | RocError::ColumnFailed { .. } => false,
            },
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) | Error::ConfigParse { .. } | Error::Toml(_) => {
                SuggestedAction::FixConfig
            }
            Error::InvalidInput(_) | Error::Roc(_) | Error::Json(_) => SuggestedAction::FixInput,
            Error::Io(_) => SuggestedAction::Retry,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Check the values in roc.toml, or run 'roc-core config show' to see the effective configuration."
            }
            Error::ConfigParse { .. } | Error::Toml(_) => {
                "Fix the TOML syntax in the config file, or unset ROC_CONFIG to fall back to defaults."
            }
            Error::InvalidInput(_) => {
                "Check the request shape: scores must be a list (or a rectangular list of rows) and labels a list of booleans."
            }
            Error::Roc(e) => match e.root() {
                RocError::DimensionMismatch { .. } => {
                    "Supply exactly one label per score (or per matrix row)."
                }
                RocError::DegenerateLabelSet { .. } => {
                    "ROC needs at least one positive and one negative label. Check how labels were derived."
                }
                RocError::InvalidScore { .. } => {
                    "Remove or impute NaN scores before computing the curve."
                }
                RocError::InvalidThreshold => "Pass a numeric --x-threshold (1 means full AUC).",
                RocError::ColumnFailed { .. } => "Inspect the named column of the score matrix.",
            },
            Error::Io(_) => "Check that the input file exists and is readable. Use '-' to read stdin.",
            Error::Json(_) => {
                "Invalid JSON in request. Check syntax with 'jq . <file>'."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::ConfigParse { .. } | Error::Toml(_) => "Invalid Configuration File",
            Error::InvalidInput(_) => "Invalid Input",
            Error::Roc(e) => match e.root() {
                RocError::DimensionMismatch { .. } => "Dimension Mismatch",
                RocError::DegenerateLabelSet { .. } => "Degenerate Label Set",
                RocError::InvalidScore { .. } => "Invalid Score",
                RocError::InvalidThreshold => "Invalid Threshold",
                RocError::ColumnFailed { .. } => "Column Failed",
            },
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., counts, column index).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

fn engine_context(err: &RocError, context: &mut HashMap<String, serde_json::Value>) {
    match err {
        RocError::DimensionMismatch { scores, labels } => {
            context.insert("scores".to_string(), serde_json::json!(scores));
            context.insert("labels".to_string(), serde_json::json!(labels));
        }
        RocError::DegenerateLabelSet {
            positives,
            negatives,
        } => {
            context.insert("positives".to_string(), serde_json::json!(positives));
            context.insert("negatives".to_string(), serde_json::json!(negatives));
        }
        RocError::InvalidScore { index } => {
            context.insert("index".to_string(), serde_json::json!(index));
        }
        RocError::ColumnFailed { column, source } => {
            context.insert("column".to_string(), serde_json::json!(column));
            engine_context(source, context);
        }
        RocError::InvalidThreshold => {}
    }
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::Roc(e) => engine_context(e, &mut context),
            Error::ConfigParse { path, .. } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
