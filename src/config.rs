//! `envgate.toml` configuration

use crate::validator::{ExecutionContext, Options};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "envgate.toml";

/// Commented configuration written by `envgate init-config`
pub const SAMPLE_CONFIG: &str = include_str!("../envgate.toml.example");

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Execution context override; detected when unset
    pub context: Option<ExecutionContext>,
    /// Read variables from this dotenv file instead of the process environment
    pub env_file: Option<PathBuf>,
    /// Log the parsed values after a successful validation
    pub log_snapshot: Option<bool>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: None,
            env_file: None,
            log_snapshot: Some(true),
            log_level: Some("info".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise `envgate.toml` in `dir` when present,
    /// otherwise the defaults.
    pub fn resolve<P: AsRef<Path>>(path: Option<PathBuf>, dir: P) -> Result<Config> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_config = dir.as_ref().join(CONFIG_FILE);
                if default_config.exists() {
                    Self::load(default_config)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context.unwrap_or_else(ExecutionContext::detect)
    }

    pub fn options(&self) -> Options {
        Options {
            log_snapshot: self.log_snapshot.unwrap_or(true),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Human readable description of what this configuration validates
    pub fn summary(&self) -> Vec<String> {
        let context = self.context();
        let origin = if self.context.is_some() {
            "configured"
        } else {
            "detected"
        };
        let source = match &self.env_file {
            Some(path) => format!("dotenv file {}", path.display()),
            None => "process environment".to_string(),
        };
        let variables = context.schema().names().collect::<Vec<_>>().join(", ");

        vec![
            format!("context: {} ({})", context, origin),
            format!("source: {}", source),
            format!("variables: {}", variables),
            format!("log_snapshot: {}", self.options().log_snapshot),
            format!("log_level: {}", self.log_level()),
        ]
    }
}
