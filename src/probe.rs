//! Probe pipeline
//!
//! One invocation runs Fetcher → Decoder → Flattener → Selector → Classifier
//! → Renderer exactly once. Errors travel back up as [`CheckError`] and are
//! turned into an UNKNOWN report here; only `main` exits the process.

use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use crate::collector::{decode, documents, JsonClient};
use crate::config::CheckSettings;
use crate::error::{CheckError, CheckResult};
use crate::status::Status;
use crate::transformer::{Flattener, Report, Selector};

/// Flattener and compiled filters shared by every document of a response
#[derive(Debug, Clone)]
pub struct Pipeline {
    flattener: Flattener,
    selector: Selector,
}

impl Pipeline {
    /// Compile the pipeline from resolved settings
    ///
    /// # Errors
    /// Returns [`CheckError::InvalidFilter`] for a pattern that does not compile
    pub fn new(settings: &CheckSettings) -> CheckResult<Self> {
        let selector = Selector::new(&settings.filter, settings.perfdata.as_deref())?
            .with_bytes_to_mbits(settings.bytes_to_mbits);

        Ok(Self {
            flattener: Flattener::new(settings.max_depth),
            selector,
        })
    }

    /// Evaluate one decoded document
    pub fn evaluate_document(&self, document: &Value) -> Report {
        let lines = self.flattener.flatten(document);
        let selection = self.selector.select(lines);
        Report::from_selection(selection, self.selector.perfdata_requested())
    }

    /// Decode a response body and evaluate each of its documents
    pub fn evaluate(&self, body: &[u8]) -> CheckResult<Vec<Report>> {
        let root = decode(body)?;
        Ok(documents(root)
            .iter()
            .map(|document| self.evaluate_document(document))
            .collect())
    }
}

/// Every report line of an invocation plus the exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    reports: Vec<Report>,
}

impl Outcome {
    pub fn from_reports(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    /// Outcome of an invocation that failed before any report was built
    pub fn from_error(err: CheckError) -> Self {
        warn!(kind = %err.kind(), error = %err, "Check failed");
        Self {
            reports: vec![Report::from_error(&err)],
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Highest exit code among the reports
    pub fn exit_code(&self) -> u8 {
        self.reports
            .iter()
            .map(Report::exit_code)
            .max()
            .unwrap_or_else(|| Status::Unknown.exit_code())
    }

    /// Rendered status lines, one per report
    pub fn lines(&self) -> Vec<String> {
        self.reports.iter().map(Report::render).collect()
    }
}

/// Evaluate an already fetched body
pub fn evaluate(settings: &CheckSettings, body: &[u8]) -> Outcome {
    match Pipeline::new(settings).and_then(|pipeline| pipeline.evaluate(body)) {
        Ok(reports) => Outcome::from_reports(reports),
        Err(err) => Outcome::from_error(err),
    }
}

/// Fetch the configured URL and evaluate the response
#[instrument(skip(settings), fields(url = settings.url.as_deref().unwrap_or_default()))]
pub async fn run(settings: &CheckSettings) -> Outcome {
    match try_run(settings).await {
        Ok(reports) => {
            let outcome = Outcome::from_reports(reports);
            info!(
                reports = outcome.reports().len(),
                exit_code = outcome.exit_code(),
                "Check finished"
            );
            outcome
        }
        Err(err) => Outcome::from_error(err),
    }
}

async fn try_run(settings: &CheckSettings) -> CheckResult<Vec<Report>> {
    let url = target_url(settings)?;
    let pipeline = Pipeline::new(settings)?;
    let client = JsonClient::new(settings.timeout_ms)?;

    let body = client.fetch(&url).await?;
    pipeline.evaluate(&body)
}

/// Parse the configured URL
///
/// # Errors
/// [`CheckError::MissingUrl`] when none is configured, [`CheckError::InvalidUrl`]
/// when it does not parse
pub fn target_url(settings: &CheckSettings) -> CheckResult<Url> {
    let raw = settings.url.as_deref().ok_or(CheckError::MissingUrl)?;
    Url::parse(raw).map_err(|source| CheckError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(filter: &str, perfdata: Option<&str>) -> CheckSettings {
        CheckSettings {
            url: Some("http://localhost/status".to_string()),
            filter: filter.to_string(),
            perfdata: perfdata.map(str::to_string),
            ..CheckSettings::default()
        }
    }

    const TIME_DOC: &[u8] = br#"{"date":"07-12-2014","milliseconds_since_epoch":1405126483908,"time":"12:54:43 AM"}"#;

    const TCP_DOC: &[u8] = br#"{"tcp_sent":{"mbits":132,"packets":96155},"tcp_rcvd":{"mbits":5881,"packets":85115809}}"#;

    #[test]
    fn test_flat_document_all_lines() {
        let outcome = evaluate(&settings("", None), TIME_DOC);
        assert_eq!(
            outcome.lines(),
            vec!["JSON Status API OK - date: 07-12-2014, milliseconds_since_epoch: 1405126483908, time: 12:54:43 AM"]
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_nested_document_with_perfdata() {
        let outcome = evaluate(&settings("^tcp", Some(".")), TCP_DOC);
        assert_eq!(
            outcome.lines(),
            vec![
                "JSON Status API OK - tcp_rcvd.mbits: 5881, tcp_rcvd.packets: 85115809, \
                 tcp_sent.mbits: 132, tcp_sent.packets: 96155 | tcp_rcvd.mbits=5881;; \
                 tcp_rcvd.packets=85115809;; tcp_sent.mbits=132;; tcp_sent.packets=96155"
            ]
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_filter_matching_nothing() {
        let outcome = evaluate(&settings("^zzz", Some(".")), TCP_DOC);
        assert_eq!(
            outcome.lines(),
            vec!["JSON Status API UNKNOWN - no value information with the filter specified"]
        );
        assert_eq!(outcome.exit_code(), 3);
    }

    #[test]
    fn test_malformed_body() {
        let outcome = evaluate(&settings("", None), b"{\"tcp_sent\": ");
        let line = &outcome.lines()[0];
        assert!(line.starts_with("JSON Status API UNKNOWN - Invalid JSON response. "));
        assert!(line.contains("EOF while parsing"));
        assert_eq!(outcome.exit_code(), 3);
    }

    #[test]
    fn test_array_root_yields_one_report_per_element() {
        let body = br#"[{"tcp_sent": {"mbits": 1}}, {"udp_sent": {"mbits": 2}, "tcp_x": 3}]"#;
        let outcome = evaluate(&settings("^tcp", None), body);
        assert_eq!(
            outcome.lines(),
            vec![
                "JSON Status API OK - tcp_sent.mbits: 1",
                "JSON Status API OK - tcp_x: 3",
            ]
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_array_root_exit_code_is_worst() {
        let body = br#"[{"tcp": 1}, {"udp": 2}]"#;
        let outcome = evaluate(&settings("^tcp", None), body);
        assert_eq!(outcome.reports()[0].status, Status::Ok);
        assert_eq!(outcome.reports()[1].status, Status::Unknown);
        assert_eq!(outcome.exit_code(), 3);
    }

    #[test]
    fn test_empty_array_root() {
        let outcome = evaluate(&settings("", None), b"[]");
        assert_eq!(outcome.reports().len(), 1);
        assert_eq!(outcome.exit_code(), 3);
    }

    #[test]
    fn test_invalid_filter_is_unknown() {
        let outcome = evaluate(&settings("(", None), TIME_DOC);
        assert_eq!(outcome.exit_code(), 3);
        let line = &outcome.lines()[0];
        assert!(line.starts_with("JSON Status API UNKNOWN - Invalid filter expression '('"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_same_input_same_output() {
        let settings = settings("mbits|date", Some("mbits"));
        for body in [TIME_DOC, TCP_DOC] {
            assert_eq!(evaluate(&settings, body), evaluate(&settings, body));
        }
    }

    #[test]
    fn test_output_is_sorted_regardless_of_key_order() {
        let a = evaluate(&settings("", Some(".")), br#"{"b": 1, "a": 2}"#);
        let b = evaluate(&settings("", Some(".")), br#"{"a": 2, "b": 1}"#);
        assert_eq!(a.lines(), b.lines());
        assert_eq!(a.lines()[0], "JSON Status API OK - a: 2, b: 1 | a=2;; b=1");
    }

    #[test]
    fn test_target_url() {
        let mut s = settings("", None);
        assert_eq!(target_url(&s).unwrap().as_str(), "http://localhost/status");

        s.url = None;
        assert!(matches!(target_url(&s), Err(CheckError::MissingUrl)));

        s.url = Some("not a url".to_string());
        assert!(matches!(target_url(&s), Err(CheckError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_run_without_url() {
        let outcome = run(&CheckSettings::default()).await;
        assert_eq!(
            outcome.lines(),
            vec!["JSON Status API UNKNOWN - Missing command line arguments"]
        );
        assert_eq!(outcome.exit_code(), 3);
    }
}
