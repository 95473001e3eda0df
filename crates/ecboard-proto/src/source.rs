//! Data-source clients. Sources only do I/O; they hand back raw payloads and
//! the scheduler runs them through `transform`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::{SourceConfig, SourceMode};
use crate::error::FetchError;
use crate::protocol::CandidateRecord;
use crate::sheets::{RowReader, SheetsClient};
use crate::transform::{normalize_payload, transform, Cell};

/// What a source returned, before validation.
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// Sheet rows, straight from the spreadsheet.
    Rows(Vec<Vec<Cell>>),
    /// Candidate objects from a data endpoint.
    Candidates(Vec<Value>),
}

impl RawPayload {
    pub fn into_candidates(self) -> Vec<CandidateRecord> {
        match self {
            RawPayload::Rows(rows) => transform(&rows),
            RawPayload::Candidates(items) => normalize_payload(items),
        }
    }
}

#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch(&self) -> Result<RawPayload, FetchError>;

    /// Short human-readable origin, for logs.
    fn describe(&self) -> String;
}

pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ecboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Config(format!("failed to build http client: {}", e)))
}

/// `GET <data-endpoint>` returning a JSON array of candidate objects.
pub struct EndpointSource {
    client: Client,
    url: String,
}

impl EndpointSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for EndpointSource {
    async fn fetch(&self) -> Result<RawPayload, FetchError> {
        debug!("endpoint: GET {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::SourceUnavailable(e.to_string()))?;

        let status = resp.status();
        debug!("endpoint: response status {}", status);
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::SourceUnavailable(e.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::SourceError {
                status: status.as_u16(),
                body,
            });
        }

        let items: Vec<Value> = serde_json::from_str(&body)?;
        Ok(RawPayload::Candidates(items))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the spreadsheet directly.
pub struct SheetsSource<R> {
    reader: R,
}

impl<R: RowReader> SheetsSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: RowReader> CandidateSource for SheetsSource<R> {
    async fn fetch(&self) -> Result<RawPayload, FetchError> {
        let rows = self.reader.read_rows().await?;
        Ok(RawPayload::Rows(rows))
    }

    fn describe(&self) -> String {
        self.reader.describe()
    }
}

/// Stands in for a source whose configuration is unusable. Every fetch fails
/// with the configuration error, so the dashboard falls back and says why.
pub struct MisconfiguredSource {
    reason: String,
}

impl MisconfiguredSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for MisconfiguredSource {
    async fn fetch(&self) -> Result<RawPayload, FetchError> {
        Err(FetchError::Config(self.reason.clone()))
    }

    fn describe(&self) -> String {
        "misconfigured".into()
    }
}

/// Build the source selected by `config.mode`.
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn CandidateSource>, FetchError> {
    let client = http_client(config.request_timeout())?;
    let source: Arc<dyn CandidateSource> = match config.mode {
        SourceMode::Endpoint => Arc::new(EndpointSource::new(client, config.data_url())),
        SourceMode::Sheets => Arc::new(SheetsSource::new(SheetsClient::from_config(
            client, config,
        )?)),
    };
    Ok(source)
}
