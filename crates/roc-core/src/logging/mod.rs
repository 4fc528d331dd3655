//! Structured logging for roc-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines and agents
//!
//! # Usage
//!
//! ```ignore
//! use roc_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//!
//! let ctx = LogContext::new(generate_run_id(), "auc");
//! let _span = ctx.span(Stage::Integrate).entered();
//! log_event!(INFO, event_names::AUC_COMPUTED, "auc computed", auc = 0.91);
//! ```
//!
//! # Design Notes
//!
//! - stdout is reserved for command payloads (JSON/MD output)
//! - stderr receives all log output (human or JSONL)
//! - Events inside a [`LogContext`] span carry its run_id, command and stage

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, LogEvent, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// Must be called once at startup. A second call (e.g. from tests sharing a
/// process) leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    // Shorten to first 12 hex chars for readability
    format!("run-{}", &uuid[..12])
}

/// Structured event logging with a constant event name as the target.
///
/// Usage:
/// ```ignore
/// log_event!(INFO, event_names::RUN_STARTED, "starting", input = %source);
/// log_event!(DEBUG, event_names::CURVE_BUILT, "curve built", points = 12);
/// ```
#[macro_export]
macro_rules! log_event {
    (INFO, $event:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::info!(target: $event, $($($fields)+,)? message = $msg)
    };
    (DEBUG, $event:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::debug!(target: $event, $($($fields)+,)? message = $msg)
    };
    (WARN, $event:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::warn!(target: $event, $($($fields)+,)? message = $msg)
    };
    (ERROR, $event:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::error!(target: $event, $($($fields)+,)? message = $msg)
    };
}
