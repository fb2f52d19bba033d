//! Status line output
//!
//! This module renders a [`Report`] into the single-line plugin format.
//!
//! # Format Specification
//!
//! ```text
//! JSON Status API <STATUS> - <line>, <line>, ...[ | <label>=<value>;; <label>=<value>...]
//! ```
//!
//! Message lines and perf entries are each sorted lexicographically, so the
//! output does not depend on the key order of the source document.

use crate::error::CheckError;
use crate::status::{classify, Status};

use super::selector::Selection;

/// Fixed prefix of every status line
pub const REPORT_PREFIX: &str = "JSON Status API";

const MESSAGE_SEPARATOR: &str = ", ";
const PERF_SEPARATOR: &str = ";; ";
const LINE_BREAKS: &[char] = &['\n', '\r'];
const CRLF: &str = "\r\n";

/// Final result of one evaluated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub message: String,
    /// Present only when perfdata was requested and something matched
    pub perfdata: Option<String>,
}

impl Report {
    /// Build a report from selected lines
    ///
    /// An empty selection becomes the UNKNOWN no-match report.
    pub fn from_selection(selection: Selection, perfdata_requested: bool) -> Self {
        let status = classify(selection.lines.len(), perfdata_requested);
        if status == Status::Unknown {
            return Self::from_error(&CheckError::NoMatch);
        }

        let Selection {
            mut lines,
            mut perf,
        } = selection;
        lines.sort();
        perf.sort();

        let perfdata =
            (perfdata_requested && !perf.is_empty()).then(|| perf.join(PERF_SEPARATOR));

        Self {
            status,
            message: lines.join(MESSAGE_SEPARATOR),
            perfdata,
        }
    }

    /// Build the report of a failed invocation
    pub fn from_error(err: &CheckError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
            perfdata: None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }

    /// Render the status line
    ///
    /// Each line break inside values or error messages becomes one space so
    /// the supervisor always receives exactly one line. Other whitespace is
    /// kept as is.
    pub fn render(&self) -> String {
        let mut line = format!("{} {} - {}", REPORT_PREFIX, self.status, self.message);

        if let Some(perfdata) = &self.perfdata {
            line.push_str(" | ");
            line.push_str(perfdata);
        }

        single_line(line)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn single_line(text: String) -> String {
    if !text.contains(LINE_BREAKS) {
        return text;
    }

    text.replace(CRLF, " ").replace(LINE_BREAKS, " ")
}
