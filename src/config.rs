//! Configuration management for check-json
//!
//! Handles loading and validating the optional YAML configuration file and
//! merging it with command-line values into [`CheckSettings`].

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::cli::Cli;
use crate::transformer::DEFAULT_MAX_DEPTH;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where the JSON document comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// How flattened lines are selected
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// JSON endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// JSON endpoint URL
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Line selection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Report filter regex
    #[serde(default)]
    pub filter: String,

    /// Perf filter regex, perfdata is disabled when absent
    #[serde(default)]
    pub perfdata: Option<String>,

    /// Depth cap of the flattener
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Rewrite byte counters to mebibytes
    #[serde(default)]
    pub bytes_to_mbits: bool,
}

fn default_timeout() -> u64 {
    10_000
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            filter: String::new(),
            perfdata: None,
            max_depth: default_max_depth(),
            bytes_to_mbits: false,
        }
    }
}

/// Immutable, fully resolved settings of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSettings {
    pub url: Option<String>,
    pub timeout_ms: u64,
    pub filter: String,
    pub perfdata: Option<String>,
    pub max_depth: usize,
    pub bytes_to_mbits: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Config::default().into_settings()
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Load the file named on the command line, or start from defaults
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        match &cli.config {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line values on top of this configuration
    ///
    /// Environment variables are already folded into `cli` by clap.
    pub fn merge_cli(mut self, cli: &Cli) -> Result<CheckSettings, ConfigError> {
        if let Some(url) = &cli.url {
            self.source.url = Some(url.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.source.timeout_ms = timeout;
        }
        if let Some(filter) = &cli.filter {
            self.selection.filter = filter.clone();
        }
        if let Some(perfdata) = &cli.perfdata {
            self.selection.perfdata = Some(perfdata.clone());
        }
        if let Some(depth) = cli.max_depth {
            self.selection.max_depth = depth;
        }
        self.selection.bytes_to_mbits |= cli.bytes_to_mbits;

        self.validate()?;
        Ok(self.into_settings())
    }

    fn into_settings(self) -> CheckSettings {
        CheckSettings {
            url: self.source.url,
            timeout_ms: self.source.timeout_ms,
            filter: self.selection.filter,
            perfdata: self.selection.perfdata,
            max_depth: self.selection.max_depth,
            bytes_to_mbits: self.selection.bytes_to_mbits,
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.selection.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "Max depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
