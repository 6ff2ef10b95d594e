use std::path::PathBuf;
use std::sync::Arc;

use crate::models::FieldKey;
use crate::notify::Notifier;
use crate::qr::ImageProvider;
use crate::source::{ColumnMap, RowSource};
use crate::stages::{NormalizeOptions, RenderConfig};

/// Service-level settings: where the document lands and how batches are
/// normalized and rendered.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Single named output location for the rendered document.
    pub output_path: PathBuf,
    /// Opaque table identifier used by `/fetch-and-generate`.
    pub row_table: String,
    pub columns: ColumnMap,
    pub normalize: NormalizeOptions,
    pub render: RenderConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("shipment_label.pdf"),
            row_table: "pallet_labels".to_string(),
            columns: ColumnMap::default(),
            normalize: NormalizeOptions::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("LABEL_OUTPUT_PATH") {
            config.output_path = PathBuf::from(path);
        }
        if let Ok(table) = std::env::var("ROW_SOURCE_TABLE") {
            config.row_table = table;
        }
        if let Ok(key) = std::env::var("LABEL_SORT_BY") {
            config.normalize.sort_by = FieldKey::from_key(&key);
        }
        if let Ok(size) = std::env::var("LABEL_PAGE_SIZE") {
            if let Ok(parsed) = size.parse() {
                config.render.page_size = parsed;
            }
        }
        if let Ok(orientation) = std::env::var("LABEL_ORIENTATION") {
            if let Ok(parsed) = orientation.parse() {
                config.render.orientation = parsed;
            }
        }
        config
    }
}

/// Shared application state handed to every handler. Collaborators are
/// optional where the deployment may not configure them; the image
/// provider is always present.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub rows: Option<Arc<dyn RowSource>>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        notifier: Option<Arc<dyn Notifier>>,
        rows: Option<Arc<dyn RowSource>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            rows,
            config: Arc::new(config),
        }
    }
}
