//! Retrieval client: pulls the execution record set from the execdash API.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{decode_records, ExecutionRecord};

/// Anything that keeps the record set from reaching the dashboard.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("response body from {url} is not a JSON array: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything the dashboard can load a record set from.
#[async_trait::async_trait]
pub trait ExecutionSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ExecutionRecord>, FetchError>;
}

/// Reads `GET {base_url}/executions`.
///
/// No timeout and no retry: a hung request stays hung until the caller gives up.
pub struct HttpExecutionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpExecutionSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/executions", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ExecutionSource for HttpExecutionSource {
    async fn fetch(&self) -> Result<Vec<ExecutionRecord>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let values: Vec<Value> = response.json().await.map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })?;

        let (records, malformed) = decode_records(values);
        for err in &malformed {
            warn!(url = %self.url, error = %err, "skipping malformed execution record");
        }

        info!(url = %self.url, count = records.len(), "fetched executions");
        Ok(records)
    }
}

/// Progress of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<ExecutionRecord>),
    Failed(String),
}

impl LoadState {
    /// The loaded record set. Every state but `Loaded` reads as no data.
    pub fn records(&self) -> &[ExecutionRecord] {
        match self {
            LoadState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn test_url_joins_base() {
        assert_eq!(
            HttpExecutionSource::new("http://localhost:5004/").url(),
            "http://localhost:5004/executions"
        );
        assert_eq!(
            HttpExecutionSource::new("http://reports.local").url(),
            "http://reports.local/executions"
        );
    }

    #[test]
    fn test_non_loaded_states_have_no_records() {
        assert!(LoadState::Idle.records().is_empty());
        assert!(LoadState::Loading.records().is_empty());
        assert!(LoadState::Failed("down".into()).records().is_empty());
    }

    #[test]
    fn test_loaded_state_exposes_records() {
        let state = LoadState::Loaded(vec![ExecutionRecord::new(1, "a", Status::Passed)]);
        assert_eq!(state.records().len(), 1);
        assert!(state.error().is_none());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server.
        let source = HttpExecutionSource::new("http://127.0.0.1:9");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
