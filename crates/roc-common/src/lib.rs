//! Shared types for the ROC engine tooling.
//!
//! This crate sits between the numeric engine (`roc-math`) and the CLI:
//! - Unified error type with stable codes and remediation hints
//! - Request decoding (scalar and matrix) with shape validation
//! - Configuration loading and resolution
//! - Output format and schema versioning

pub mod config;
pub mod error;
pub mod output;
pub mod request;
pub mod schema;

pub use config::{ConfigResolver, ConfigSource, LoadedConfig, RocConfig};
pub use error::{format_error_human, Error, Result, StructuredError};
pub use output::OutputFormat;
pub use request::{BatchRequest, InputSource, RocRequest};
pub use schema::SCHEMA_VERSION;
