use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail relay returned status {0}")]
    Status(u16),

    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Capability to deliver the finished document to a destination address.
/// Best-effort: callers fire it in the background and only log failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, document: &[u8], filename: &str) -> Result<(), NotifyError>;
}

/// Configuration for the HTTP mail relay.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub relay_url: String,
    pub sender: String,
    pub subject: String,
}

impl MailerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self> {
        let relay_url = std::env::var("MAIL_RELAY_URL")
            .context("MAIL_RELAY_URL environment variable not set")?;

        Ok(Self {
            relay_url,
            sender: std::env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "labels@example.com".to_string()),
            subject: std::env::var("MAIL_SUBJECT")
                .unwrap_or_else(|_| "Shipment labels".to_string()),
        })
    }
}

/// Mail transport over a JSON HTTP relay; the document travels as a
/// base64 attachment.
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, to: &str, document: &[u8], filename: &str) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "from": self.config.sender,
            "to": to,
            "subject": self.config.subject,
            "filename": filename,
            "content_base64": BASE64.encode(document),
            "sent_at": chrono::Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.config.relay_url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Fire-and-forget delivery: the caller returns to the client before the
/// send completes. Failures are logged, never surfaced, never retried.
pub fn spawn_notification(
    notifier: Arc<dyn Notifier>,
    to: String,
    document: Vec<u8>,
    filename: String,
) {
    tokio::spawn(async move {
        match notifier.send(&to, &document, &filename).await {
            Ok(()) => info!("notification sent to {to}"),
            Err(err) => warn!("notification to {to} failed: {err}"),
        }
    });
}
