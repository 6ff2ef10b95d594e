pub mod client;

pub use client::*;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::FieldKey;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("row source returned status {0}")]
    Status(u16),

    #[error("row source request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Capability to pull rows from an upstream tabular data provider. A row
/// is a mapping from opaque column id to cell value.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self, table: &str) -> Result<Vec<HashMap<String, String>>, SourceError>;
}

/// Fixed translation from the provider's column ids to label fields.
/// Columns without a mapping are dropped before normalization.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    entries: Vec<(String, FieldKey)>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        let entries = [
            ("Customer", FieldKey::Customer),
            ("Order_Ref", FieldKey::Order),
            ("Contents", FieldKey::Content),
            ("Owner", FieldKey::Owner),
            ("Created_By", FieldKey::Creator),
            ("Revision", FieldKey::Revision),
            ("Position", FieldKey::Position),
            ("Mail", FieldKey::Mail),
            ("QR_Data", FieldKey::QrData),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(column, key)| (column.to_string(), key))
                .collect(),
        }
    }
}

impl ColumnMap {
    /// Translate one raw row into a canonical field mapping.
    pub fn apply(&self, row: &HashMap<String, String>) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        for (column, key) in &self.entries {
            if let Some(value) = row.get(column) {
                fields.insert(key.as_str().to_string(), value.clone());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_map_translates_known_columns() {
        let mut row = HashMap::new();
        row.insert("Customer".to_string(), "Acme".to_string());
        row.insert("Created_By".to_string(), "jdoe".to_string());
        row.insert("Unmapped".to_string(), "ignored".to_string());

        let fields = ColumnMap::default().apply(&row);

        assert_eq!(fields["customer"], "Acme");
        assert_eq!(fields["creator"], "jdoe");
        assert_eq!(fields.len(), 2);
    }
}
