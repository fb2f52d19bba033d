//! JSON endpoint HTTP client
//!
//! One GET per invocation, bounded by a request timeout.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::TransportError;

/// HTTP client for the probed JSON endpoint
#[derive(Clone)]
pub struct JsonClient {
    client: Client,
    timeout: Duration,
}

impl JsonClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `timeout_ms` - Whole-request timeout in milliseconds
    ///
    /// # Example
    /// ```ignore
    /// let client = JsonClient::new(10_000)?;
    /// ```
    pub fn new(timeout_ms: u64) -> Result<Self, TransportError> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("check_json/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::ClientInit)?;

        Ok(Self { client, timeout })
    }

    /// Fetch the raw response body
    ///
    /// Non-2xx responses are reported as [`TransportError::HttpStatus`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        debug!("Sending GET request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(bytes = body.len(), status = status.as_u16(), "Received response");

        Ok(body.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::timeout_with_duration(self.timeout.as_millis() as u64)
        } else {
            TransportError::from(err)
        }
    }
}
