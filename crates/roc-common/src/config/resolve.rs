//! Configuration resolution.
//!
//! Resolution order:
//! 1. Explicit CLI flag (`--config`)
//! 2. `ROC_CONFIG` environment variable (direct file path)
//! 3. `ROC_CONFIG_DIR` environment variable + `roc.toml`
//! 4. XDG config directory (`~/.config/roc-engine/roc.toml`)
//! 5. Built-in defaults
//!
//! Explicit paths (1 and 2) must exist; directory lookups (3 and 4) are
//! skipped when the file is absent.

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{LoadedConfig, RocConfig};
use crate::error::{Error, Result};

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "ROC_CONFIG";
/// Environment variable naming a directory holding `roc.toml`.
pub const ENV_CONFIG_DIR: &str = "ROC_CONFIG_DIR";
/// Standard config file name.
pub const CONFIG_FILENAME: &str = "roc.toml";
/// Application name for XDG directories.
pub const APP_NAME: &str = "roc-engine";

/// How a config file was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// From explicit CLI flag
    CliFlag,
    /// From `ROC_CONFIG`
    EnvVar,
    /// From `ROC_CONFIG_DIR`
    EnvDir,
    /// From XDG config directory
    XdgConfig,
    /// Using built-in defaults
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliFlag => write!(f, "cli"),
            ConfigSource::EnvVar => write!(f, "env"),
            ConfigSource::EnvDir => write!(f, "env-dir"),
            ConfigSource::XdgConfig => write!(f, "xdg"),
            ConfigSource::Default => write!(f, "default"),
        }
    }
}

/// Configuration resolver with deterministic resolution order.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
    env_path: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_dir: Option<PathBuf>,
}

impl ConfigResolver {
    /// Resolver reading the process environment and XDG location.
    pub fn from_env(cli_path: Option<PathBuf>) -> Self {
        ConfigResolver {
            cli_path,
            env_path: env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
            env_dir: env::var_os(ENV_CONFIG_DIR).map(PathBuf::from),
            xdg_dir: xdg_config_dir(),
        }
    }

    /// Resolver that ignores the environment entirely.
    pub fn isolated(cli_path: Option<PathBuf>) -> Self {
        ConfigResolver {
            cli_path,
            ..ConfigResolver::default()
        }
    }

    pub fn with_env_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_path = Some(path.into());
        self
    }

    pub fn with_env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env_dir = Some(dir.into());
        self
    }

    pub fn with_xdg_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xdg_dir = Some(dir.into());
        self
    }

    /// Resolve the config file path.
    pub fn resolve_path(&self) -> Result<(Option<PathBuf>, ConfigSource)> {
        // 1. CLI flag
        if let Some(ref path) = self.cli_path {
            return explicit(path, ConfigSource::CliFlag, "--config");
        }

        // 2. ROC_CONFIG
        if let Some(ref path) = self.env_path {
            return explicit(path, ConfigSource::EnvVar, ENV_CONFIG_PATH);
        }

        // 3. ROC_CONFIG_DIR
        if let Some(ref dir) = self.env_dir {
            let path = dir.join(CONFIG_FILENAME);
            if path.is_file() {
                return Ok((Some(path), ConfigSource::EnvDir));
            }
        }

        // 4. XDG config dir
        if let Some(ref dir) = self.xdg_dir {
            let path = dir.join(CONFIG_FILENAME);
            if path.is_file() {
                return Ok((Some(path), ConfigSource::XdgConfig));
            }
        }

        // 5. Default
        Ok((None, ConfigSource::Default))
    }

    /// Load the resolved config, or defaults when nothing is found.
    pub fn load(&self) -> Result<LoadedConfig> {
        let (path, source) = self.resolve_path()?;
        match path {
            Some(p) => {
                let config = RocConfig::from_path(&p)?;
                tracing::debug!(path = %p.display(), %source, "loaded config");
                Ok(LoadedConfig {
                    config,
                    source,
                    path: Some(p.to_string_lossy().to_string()),
                })
            }
            None => Ok(LoadedConfig::defaults()),
        }
    }
}

fn explicit(
    path: &Path,
    source: ConfigSource,
    origin: &str,
) -> Result<(Option<PathBuf>, ConfigSource)> {
    if path.is_file() {
        Ok((Some(path.to_path_buf()), source))
    } else {
        Err(Error::Config(format!(
            "config file from {} not found: {}",
            origin,
            path.display()
        )))
    }
}

/// Get the XDG config directory for the ROC tooling.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::CliFlag.to_string(), "cli");
        assert_eq!(ConfigSource::EnvVar.to_string(), "env");
        assert_eq!(ConfigSource::EnvDir.to_string(), "env-dir");
        assert_eq!(ConfigSource::XdgConfig.to_string(), "xdg");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_nothing_configured_uses_defaults() {
        let loaded = ConfigResolver::isolated(None).load().unwrap();
        assert_eq!(loaded, LoadedConfig::defaults());
    }

    #[test]
    fn test_cli_flag_wins() {
        let cli = TempDir::new().unwrap();
        let env = TempDir::new().unwrap();
        let cli_path = write_config(&cli, "[engine]\nx_threshold = 0.1\n");
        let env_path = write_config(&env, "[engine]\nx_threshold = 0.9\n");

        let loaded = ConfigResolver::isolated(Some(cli_path.clone()))
            .with_env_path(env_path)
            .load()
            .unwrap();
        assert_eq!(loaded.source, ConfigSource::CliFlag);
        assert_eq!(loaded.config.engine.x_threshold, 0.1);
        assert_eq!(loaded.path, Some(cli_path.to_string_lossy().to_string()));
    }

    #[test]
    fn test_env_dir_before_xdg() {
        let env_dir = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        write_config(&env_dir, "[batch]\nparallel = false\n");
        write_config(&xdg, "[batch]\nparallel = true\n");

        let loaded = ConfigResolver::isolated(None)
            .with_env_dir(env_dir.path())
            .with_xdg_dir(xdg.path())
            .load()
            .unwrap();
        assert_eq!(loaded.source, ConfigSource::EnvDir);
        assert!(!loaded.config.batch.parallel);
    }

    #[test]
    fn test_empty_env_dir_falls_through_to_xdg() {
        let env_dir = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        write_config(&xdg, "[engine]\ndecreasing = false\n");

        let loaded = ConfigResolver::isolated(None)
            .with_env_dir(env_dir.path())
            .with_xdg_dir(xdg.path())
            .load()
            .unwrap();
        assert_eq!(loaded.source, ConfigSource::XdgConfig);
        assert!(!loaded.config.engine.decreasing);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigResolver::isolated(Some(dir.path().join("absent.toml")))
            .load()
            .unwrap_err();
        assert_eq!(err.code(), 10);
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[engine\n");
        let err = ConfigResolver::isolated(Some(path.clone())).load().unwrap_err();
        match err {
            Error::ConfigParse { path: p, .. } => assert_eq!(p, path.display().to_string()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
