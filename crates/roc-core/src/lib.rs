//! roc-core: command-line front end for the ROC engine.
//!
//! Requests are JSON documents read from a file or stdin; reports are
//! written to stdout as JSON, Markdown or a one-line summary. Logs go to
//! stderr.

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod logging;
pub mod output;

pub use cli::{run, Cli};
pub use exit_codes::ExitCode;
