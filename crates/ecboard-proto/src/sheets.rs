//! Google Sheets v4 `values.get` reader.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::transform::Cell;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[async_trait]
pub trait RowReader: Send + Sync {
    /// Raw rows of the configured range. An empty sheet is `Ok(vec![])`.
    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, FetchError>;

    fn describe(&self) -> String;
}

/// Response body of `spreadsheets.values.get`. `values` is omitted when the
/// range is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Cell>>,
}

pub struct SheetsClient {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(
        client: Client,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &SourceConfig) -> Result<Self, FetchError> {
        let id = config.spreadsheet_id().ok_or_else(|| {
            FetchError::Config(format!(
                "no spreadsheet id in url {:?}",
                config.spreadsheet_url
            ))
        })?;
        Ok(Self::new(client, id, config.range.clone(), config.api_key.clone()))
    }

    #[cfg(test)]
    fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn values_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| FetchError::Config(format!("bad sheets api base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Config("sheets api base cannot be a base".into()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&self.range);
        if !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

#[async_trait]
impl RowReader for SheetsClient {
    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, FetchError> {
        let url = self.values_url()?;
        debug!(
            "sheets: reading {} from spreadsheet {}",
            self.range, self.spreadsheet_id
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::SourceUnavailable(e.to_string()))?;
        let status = resp.status();
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

        let range: ValueRange = serde_json::from_str(&body)?;
        debug!("sheets: {} rows", range.values.len());
        Ok(range.values)
    }

    fn describe(&self) -> String {
        format!("sheets:{}/{}", self.spreadsheet_id, self.range)
    }
}
