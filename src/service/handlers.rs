use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::io::input::{RawEntries, parse_entries};
use crate::models::RenderedDocument;
use crate::notify::spawn_notification;
use crate::stages::{normalize, render};

const INDEX_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>labelsmith</title></head>\n<body>\n<h1>labelsmith</h1>\n<p>Pallet label PDF generation.</p>\n<ul>\n<li><code>POST /generate-label</code> &mdash; body <code>{\"entries\": [...]}</code> or a delimited text block</li>\n<li><code>GET /fetch-and-generate</code> &mdash; pull rows from the configured table and render</li>\n</ul>\n</body>\n</html>\n";

#[derive(Debug, Deserialize)]
pub struct GenerateLabelRequest {
    #[serde(default)]
    pub entries: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateLabelResponse {
    pub message: String,
    pub email: Option<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Render a batch posted directly in the request body.
pub async fn generate_label(
    State(state): State<AppState>,
    Json(request): Json<GenerateLabelRequest>,
) -> Result<Json<GenerateLabelResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "generate-label request");

    let raw = parse_entries(request.entries.as_ref())?;
    render_and_persist(&state, raw, request_id).await
}

/// Pull rows from the upstream table, map columns to label fields, and
/// render the result.
pub async fn fetch_and_generate(
    State(state): State<AppState>,
) -> Result<Json<GenerateLabelResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, table = %state.config.row_table, "fetch-and-generate request");

    let rows = state
        .rows
        .as_ref()
        .ok_or_else(|| ApiError::internal("row source not configured"))?
        .fetch_rows(&state.config.row_table)
        .await?;
    info!(%request_id, "fetched {} rows", rows.len());

    let mapped: Vec<HashMap<String, String>> = rows
        .iter()
        .map(|row| state.config.columns.apply(row))
        .collect();

    render_and_persist(&state, RawEntries::Structured(mapped), request_id).await
}

async fn render_and_persist(
    state: &AppState,
    raw: RawEntries,
    request_id: Uuid,
) -> Result<Json<GenerateLabelResponse>, ApiError> {
    let batch = normalize(raw, &state.config.normalize);
    let document = render(&batch, &state.config.render, state.provider.as_ref()).await?;
    document.write_to(&state.config.output_path)?;

    info!(
        %request_id,
        "wrote {} pages to {}",
        document.page_count,
        state.config.output_path.display()
    );

    notify_in_background(state, &document);

    let email = document.final_address().map(str::to_string);
    Ok(Json(GenerateLabelResponse {
        message: format!(
            "PDF created successfully at {}",
            state.config.output_path.display()
        ),
        email,
    }))
}

/// Kick off the best-effort notification without holding up the response.
fn notify_in_background(state: &AppState, document: &RenderedDocument) {
    let (Some(notifier), Some(address)) = (&state.notifier, document.final_address()) else {
        return;
    };
    let filename = state
        .config
        .output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "labels.pdf".to_string());

    spawn_notification(
        notifier.clone(),
        address.to_string(),
        document.bytes.clone(),
        filename,
    );
}
