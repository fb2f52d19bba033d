//! CLI argument parsing for check-json
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--url` / `-u`: JSON endpoint to fetch (env: CHECK_JSON_URL)
//! - `--filter` / `-f`: Report filter regex, empty selects everything (env: CHECK_JSON_FILTER)
//! - `--perfdata` / `-p`: Enable perfdata; optional regex choosing the perf entries,
//!   a bare `-p` selects every reported line (env: CHECK_JSON_PERFDATA)
//! - `--timeout` / `-t`: HTTP timeout in milliseconds (env: CHECK_JSON_TIMEOUT)
//! - `--max-depth`: Nesting levels flattened before values are printed as JSON (env: CHECK_JSON_MAX_DEPTH)
//! - `--bytes-to-mbits`: Rewrite `*bytes*` counters to mebibytes (env: CHECK_JSON_BYTES_TO_MBITS)
//! - `--config` / `-c`: Optional YAML configuration file (env: CHECK_JSON_CONFIG)
//! - `--log-level` / `-l`: Log level written to stderr (env: CHECK_JSON_LOG_LEVEL)
//!
//! # Precedence
//!
//! Values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Perf filter used when `-p` is given without a value
pub const PERFDATA_ALL: &str = ".";

/// check_json - JSON endpoint probe for Nagios-compatible supervisors
///
/// Fetches a JSON document, flattens it into `dotted.path: value` lines,
/// keeps the lines matching the filter and prints one status line.
#[derive(Parser, Debug)]
#[command(name = "check_json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON api url
    #[arg(short, long, value_name = "URL", env = "CHECK_JSON_URL")]
    pub url: Option<String>,

    /// Filter determined values, case-insensitive search. Ex.: "^tcp|^udp"
    #[arg(short, long, value_name = "REGEX", env = "CHECK_JSON_FILTER")]
    pub filter: Option<String>,

    /// Enable performance data, optionally restricted to lines matching REGEX
    #[arg(
        short,
        long,
        value_name = "REGEX",
        num_args = 0..=1,
        default_missing_value = PERFDATA_ALL,
        env = "CHECK_JSON_PERFDATA"
    )]
    pub perfdata: Option<String>,

    /// HTTP timeout in milliseconds (overrides config file)
    #[arg(short, long, value_name = "MS", env = "CHECK_JSON_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Nesting levels to flatten (overrides config file)
    #[arg(long, value_name = "LEVELS", env = "CHECK_JSON_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Convert values of keys containing "bytes" to mebibytes, renaming them "mbits"
    #[arg(long, env = "CHECK_JSON_BYTES_TO_MBITS")]
    pub bytes_to_mbits: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", env = "CHECK_JSON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "warn",
        env = "CHECK_JSON_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level - default
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
