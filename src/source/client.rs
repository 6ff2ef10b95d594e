use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{RowSource, SourceError};
use crate::io::input::scalar_to_string;

const DEFAULT_PAGE_SIZE: u32 = 100;

/// Configuration for the upstream tabular data provider.
#[derive(Debug, Clone)]
pub struct RowSourceConfig {
    pub base_url: String,
    pub api_token: String,
    pub page_size: u32,
}

impl RowSourceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ROW_SOURCE_URL")
            .context("ROW_SOURCE_URL environment variable not set")?;
        let api_token = std::env::var("ROW_SOURCE_TOKEN")
            .context("ROW_SOURCE_TOKEN environment variable not set")?;

        Ok(Self {
            base_url,
            api_token,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }
}

/// HTTP client for the paginated row provider.
pub struct HttpRowSource {
    client: Client,
    config: RowSourceConfig,
}

impl HttpRowSource {
    pub fn new(config: RowSourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct RowPage {
    records: Vec<RowEntry>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    fields: HashMap<String, serde_json::Value>,
}

#[async_trait]
impl RowSource for HttpRowSource {
    /// Fetch every row of `table`, following the provider's `offset`
    /// continuation token until the last page.
    async fn fetch_rows(&self, table: &str) -> Result<Vec<HashMap<String, String>>, SourceError> {
        let url = format!(
            "{}/tables/{}/records",
            self.config.base_url.trim_end_matches('/'),
            table
        );

        let mut rows = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.config.api_token)
                .query(&[("pageSize", self.config.page_size.to_string())]);
            if let Some(ref token) = offset {
                request = request.query(&[("offset", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(SourceError::Status(response.status().as_u16()));
            }

            let page: RowPage = response.json().await?;
            for entry in page.records {
                let mut row = HashMap::new();
                for (column, value) in &entry.fields {
                    if let Some(text) = scalar_to_string(value) {
                        row.insert(column.clone(), text);
                    }
                }
                rows.push(row);
            }

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_page_deserializes_with_and_without_offset() {
        let with_offset: RowPage = serde_json::from_str(
            r#"{"records": [{"fields": {"Customer": "Acme", "Position": 7}}], "offset": "rec42"}"#,
        )
        .unwrap();
        assert_eq!(with_offset.records.len(), 1);
        assert_eq!(with_offset.offset.as_deref(), Some("rec42"));

        let last_page: RowPage = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(last_page.offset.is_none());
    }
}
