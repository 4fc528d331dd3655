//! Configuration loading and validation.
//!
//! This module provides:
//! - Typed configuration sections for `roc.toml`
//! - Deterministic config resolution (CLI > env > XDG > defaults)
//! - Semantic validation before any option reaches the engine

pub mod resolve;

pub use resolve::{ConfigResolver, ConfigSource};

use std::path::Path;

use roc_math::{RocOptions, ThresholdRule};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine defaults applied to every `curve`/`auc`/`batch` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Higher score means more likely positive.
    pub decreasing: bool,
    /// FPR cutoff for partial AUC; values >= 1 mean the full area.
    pub x_threshold: f64,
    /// How the cutoff index is chosen.
    pub threshold_rule: ThresholdRule,
    /// Log the selected point at info level.
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = RocOptions::default();
        EngineConfig {
            decreasing: defaults.decreasing,
            x_threshold: defaults.x_threshold,
            threshold_rule: defaults.threshold_rule,
            verbose: defaults.verbose,
        }
    }
}

/// Matrix-mode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Spread columns across the thread pool.
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig { parallel: true }
    }
}

/// Logging defaults. Values are parsed by the CLI's logging layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Contents of `roc.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RocConfig {
    pub engine: EngineConfig,
    pub batch: BatchConfig,
    pub log: LogSection,
}

impl RocConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RocConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: RocConfig = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that TOML typing cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.engine.x_threshold.is_nan() {
            return Err(Error::Config(
                "engine.x_threshold must be a number".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine options derived from the `[engine]` section.
    pub fn roc_options(&self) -> RocOptions {
        RocOptions::default()
            .with_decreasing(self.engine.decreasing)
            .with_x_threshold(self.engine.x_threshold)
            .with_threshold_rule(self.engine.threshold_rule)
            .with_verbose(self.engine.verbose)
    }

    /// Render back to TOML, for `config show`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to render config: {}", e)))
    }
}

/// A config together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedConfig {
    pub config: RocConfig,
    pub source: ConfigSource,
    /// File the config was read from; `None` for built-in defaults.
    pub path: Option<String>,
}

impl LoadedConfig {
    /// Built-in defaults with no file behind them.
    pub fn defaults() -> Self {
        LoadedConfig {
            config: RocConfig::default(),
            source: ConfigSource::Default,
            path: None,
        }
    }
}
