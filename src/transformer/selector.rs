//! Regex-driven line selection
//!
//! Both filters are case-insensitive searches anywhere in the line, not full
//! matches. The perf filter only sees lines the report filter kept.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::error::{CheckError, CheckResult};

/// Divisor of the byte-counter conversion
const BYTES_PER_MEBIBYTE: i64 = 1024 * 1024;

/// Compiled report and perf filters
#[derive(Debug, Clone)]
pub struct Selector {
    report: Regex,
    perf: Option<Regex>,
    bytes_to_mbits: bool,
}

/// Lines kept by a [`Selector`], in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Lines matching the report filter
    pub lines: Vec<String>,
    /// Perf entries of the kept lines matching the perf filter
    pub perf: Vec<String>,
}

impl Selector {
    /// Compile the filters
    ///
    /// # Arguments
    /// * `filter` - Report filter; empty selects every line
    /// * `perfdata` - Perf filter; `None` disables perfdata
    ///
    /// # Errors
    /// Returns [`CheckError::InvalidFilter`] when a pattern does not compile
    pub fn new(filter: &str, perfdata: Option<&str>) -> CheckResult<Self> {
        let report = compile(filter)?;
        let perf = perfdata.map(compile).transpose()?;

        Ok(Self {
            report,
            perf,
            bytes_to_mbits: false,
        })
    }

    /// Enable the byte-counter rewrite of kept lines
    pub fn with_bytes_to_mbits(mut self, enabled: bool) -> Self {
        self.bytes_to_mbits = enabled;
        self
    }

    pub fn perfdata_requested(&self) -> bool {
        self.perf.is_some()
    }

    /// Apply the filters to flattened lines
    pub fn select<I>(&self, lines: I) -> Selection
    where
        I: IntoIterator<Item = String>,
    {
        let mut selection = Selection::default();

        for line in lines {
            if !self.report.is_match(&line) {
                continue;
            }

            let line = if self.bytes_to_mbits {
                bytes_to_mbits(line)
            } else {
                line
            };

            if let Some(perf) = &self.perf {
                if perf.is_match(&line) {
                    selection.perf.push(perf_entry(&line));
                }
            }

            selection.lines.push(line);
        }

        debug!(
            selected = selection.lines.len(),
            perf = selection.perf.len(),
            "Applied filters"
        );

        selection
    }
}

/// Perf entry of a line: the first `": "` becomes `"="`
pub fn perf_entry(line: &str) -> String {
    line.replacen(": ", "=", 1)
}

fn compile(pattern: &str) -> CheckResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CheckError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrite `key.bytes: N` into `key.mbits: N / 2^20`
///
/// Lines without `bytes`, or whose value is not an integer, are returned as is.
fn bytes_to_mbits(line: String) -> String {
    if !line.contains("bytes") {
        return line;
    }

    let Some((key, value)) = line.split_once(": ") else {
        return line;
    };

    match value.trim().parse::<i64>() {
        Ok(bytes) => format!(
            "{}: {}",
            key.replace("bytes", "mbits"),
            bytes.div_euclid(BYTES_PER_MEBIBYTE)
        ),
        Err(_) => {
            warn!(line = %line, "Value is not an integer byte count, left unchanged");
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tcp_lines() -> Vec<String> {
        lines(&[
            "tcp_sent.mbits: 132",
            "tcp_sent.packets: 96155",
            "udp_sent.mbits: 7",
            "tcp_rcvd.mbits: 5881",
            "tcp_rcvd.packets: 85115809",
        ])
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let selector = Selector::new("", None).unwrap();
        let selection = selector.select(tcp_lines());
        assert_eq!(selection.lines, tcp_lines());
        assert!(selection.perf.is_empty());
        assert!(!selector.perfdata_requested());
    }

    #[test]
    fn test_filter_is_a_search() {
        let selector = Selector::new("packets", None).unwrap();
        let selection = selector.select(tcp_lines());
        assert_eq!(
            selection.lines,
            lines(&["tcp_sent.packets: 96155", "tcp_rcvd.packets: 85115809"])
        );
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let selector = Selector::new("^TCP_SENT", None).unwrap();
        assert_eq!(selector.select(tcp_lines()).lines.len(), 2);
    }

    #[test]
    fn test_filter_matches_values_too() {
        let selector = Selector::new(": 7$", None).unwrap();
        assert_eq!(
            selector.select(tcp_lines()).lines,
            lines(&["udp_sent.mbits: 7"])
        );
    }

    #[test]
    fn test_perf_only_from_kept_lines() {
        let selector = Selector::new("^tcp", Some("mbits")).unwrap();
        let selection = selector.select(tcp_lines());
        assert_eq!(selection.lines.len(), 4);
        assert_eq!(
            selection.perf,
            lines(&["tcp_sent.mbits=132", "tcp_rcvd.mbits=5881"])
        );
        assert!(selector.perfdata_requested());
    }

    #[test]
    fn test_perf_dot_selects_every_kept_line() {
        let selector = Selector::new("^tcp", Some(".")).unwrap();
        let selection = selector.select(tcp_lines());
        assert_eq!(selection.perf.len(), selection.lines.len());
    }

    #[test]
    fn test_no_match_is_empty_selection() {
        let selector = Selector::new("^zzz", Some(".")).unwrap();
        let selection = selector.select(tcp_lines());
        assert!(selection.lines.is_empty());
        assert!(selection.perf.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Selector::new("(unclosed", None).unwrap_err();
        assert!(matches!(err, CheckError::InvalidFilter { ref pattern, .. } if pattern == "(unclosed"));

        assert!(Selector::new("", Some("[z-a]")).is_err());
    }

    #[test]
    fn test_perf_entry_replaces_first_separator_only() {
        assert_eq!(perf_entry("time: 12:54:43 AM"), "time=12:54:43 AM");
        assert_eq!(perf_entry("note: a: b"), "note=a: b");
        assert_eq!(perf_entry("no separator"), "no separator");
    }

    #[test]
    fn test_bytes_to_mbits_rewrite() {
        let selector = Selector::new("", Some(".")).unwrap().with_bytes_to_mbits(true);
        let selection = selector.select(lines(&[
            "tcp_sent.bytes: 138412032",
            "tcp_sent.packets: 96155",
            "label.bytes: unknown",
        ]));
        assert_eq!(
            selection.lines,
            lines(&[
                "tcp_sent.mbits: 132",
                "tcp_sent.packets: 96155",
                "label.bytes: unknown",
            ])
        );
        assert_eq!(selection.perf[0], "tcp_sent.mbits=132");
    }

    #[test]
    fn test_bytes_conversion_floors() {
        assert_eq!(bytes_to_mbits("a.bytes: 1048575".to_string()), "a.mbits: 0");
        assert_eq!(bytes_to_mbits("a.bytes: -1".to_string()), "a.mbits: -1");
    }

    #[test]
    fn test_bytes_conversion_off_by_default() {
        let selector = Selector::new("", None).unwrap();
        let selection = selector.select(lines(&["tcp_sent.bytes: 138412032"]));
        assert_eq!(selection.lines, lines(&["tcp_sent.bytes: 138412032"]));
    }

    #[test]
    fn test_report_filter_sees_unconverted_key() {
        let selector = Selector::new("bytes", None).unwrap().with_bytes_to_mbits(true);
        let selection = selector.select(lines(&["rx.bytes: 2097152"]));
        assert_eq!(selection.lines, lines(&["rx.mbits: 2"]));
    }
}
