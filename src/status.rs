//! Four-level monitoring status and the classifier
//!
//! WARNING and CRITICAL are part of the plugin protocol but no data-driven
//! threshold logic produces them; only OK and UNKNOWN are reachable.

use tracing::debug;

/// Monitoring plugin status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Name printed in the status line
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Process exit code understood by the supervisor
    pub fn exit_code(&self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the overall status of one document.
///
/// Nothing selected means UNKNOWN, anything selected means OK. Whether
/// perfdata was requested never changes the outcome.
pub fn classify(matched_lines: usize, perfdata_requested: bool) -> Status {
    let status = if matched_lines == 0 {
        Status::Unknown
    } else {
        Status::Ok
    };

    debug!(
        matched_lines,
        perfdata_requested,
        status = %status,
        "Classified document"
    );

    status
}
