pub mod client;

pub use client::*;

use async_trait::async_trait;
use thiserror::Error;

/// Per-page image fetch failures. These never abort a batch: the page is
/// rendered without its QR glyph and rendering continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("image provider returned status {0}")]
    Status(u16),

    #[error("image fetch failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image fetching disabled")]
    Disabled,
}

/// Capability to turn a QR payload string into image bytes. Injected into
/// the renderer so tests can stub it and deployments can swap providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn fetch(&self, payload: &str) -> Result<Vec<u8>, FetchError>;
}

/// Provider that always declines; used by `--skip-qr` runs.
pub struct DisabledProvider;

#[async_trait]
impl ImageProvider for DisabledProvider {
    async fn fetch(&self, _payload: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Disabled)
    }
}
