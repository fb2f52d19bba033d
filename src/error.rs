//! Error types for check-json
//!
//! Every error is terminal for the invocation. None of them is retried and
//! each one is reported as a single UNKNOWN status line by the caller.

use thiserror::Error;

use crate::config::ConfigError;
use crate::status::Status;

/// Broad error category, used for logging and for the exit mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unusable command-line / config input
    Argument,
    /// DNS, connection, timeout or HTTP-level failure
    Transport,
    /// Response body is not JSON
    Decode,
    /// The report filter selected nothing
    Selection,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Argument => "argument",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Selection => "selection",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP fetch errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client could not be built
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// Non-2xx response
    #[error("Invalid Uri. HTTP {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    /// The value is the configured timeout in milliseconds, if known.
    #[error("Url request returning: request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// Connection refused, DNS failure, TLS failure
    #[error("Url request returning: connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent
    #[error("Url request returning: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// Body could not be read
    #[error("Url request returning: failed to read response body: {0}")]
    HttpResponse(#[source] reqwest::Error),
}

impl TransportError {
    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        TransportError::Timeout(Some(ms))
    }

    /// HTTP status code, when the server answered at all
    pub fn code(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest doesn't expose the configured duration here.
            // The client uses timeout_with_duration() when it knows it.
            TransportError::Timeout(None)
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::HttpResponse(err)
        } else {
            TransportError::HttpRequest(err)
        }
    }
}

/// Malformed JSON body; carries the parser message verbatim
#[derive(Error, Debug)]
#[error("{0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Application error type
#[derive(Error, Debug)]
pub enum CheckError {
    /// No URL on the command line, in the environment, or in the config file
    #[error("Missing command line arguments")]
    MissingUrl,

    /// The URL does not parse
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A filter regex does not compile
    #[error("Invalid filter expression '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Command line could not be parsed
    #[error("{0}")]
    Usage(String),

    /// Config file problem
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid JSON response. {0}")]
    Decode(#[from] DecodeError),

    /// The report filter matched no flattened line
    #[error("no value information with the filter specified")]
    NoMatch,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::MissingUrl
            | CheckError::InvalidUrl { .. }
            | CheckError::InvalidFilter { .. }
            | CheckError::Usage(_)
            | CheckError::Config(_) => ErrorKind::Argument,
            CheckError::Transport(_) => ErrorKind::Transport,
            CheckError::Decode(_) => ErrorKind::Decode,
            CheckError::NoMatch => ErrorKind::Selection,
        }
    }

    /// Every error kind maps to UNKNOWN.
    pub fn status(&self) -> Status {
        Status::Unknown
    }
}

/// Result type alias for pipeline errors
pub type CheckResult<T> = Result<T, CheckError>;
