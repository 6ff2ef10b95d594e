use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, ImageProvider};

const DEFAULT_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
const DEFAULT_SIZE: &str = "150x150";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the remote QR generator.
#[derive(Debug, Clone)]
pub struct QrServerConfig {
    pub base_url: String,
    /// Requested image dimensions, `WxH`.
    pub size: String,
    /// Cap on the whole fetch; expiry counts as a fetch failure.
    pub timeout_secs: u64,
}

impl Default for QrServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            size: DEFAULT_SIZE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl QrServerConfig {
    /// Create config from environment variables, falling back to the
    /// public qrserver.com endpoint.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("QR_PROVIDER_URL").unwrap_or(defaults.base_url),
            size: std::env::var("QR_IMAGE_SIZE").unwrap_or(defaults.size),
            timeout_secs: std::env::var("QR_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// HTTP client for the QR image provider.
pub struct QrServerClient {
    client: Client,
    config: QrServerConfig,
}

impl QrServerClient {
    pub fn new(config: QrServerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageProvider for QrServerClient {
    async fn fetch(&self, payload: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("size", self.config.size.as_str()), ("data", payload)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_at_qrserver() {
        let config = QrServerConfig::default();
        assert_eq!(config.base_url, "https://api.qrserver.com/v1/create-qr-code/");
        assert_eq!(config.size, "150x150");
        assert_eq!(config.timeout_secs, 5);
    }
}
