use crate::io::input::{RawEntries, parse_delimited};
use crate::models::{FieldDefaults, FieldKey, LabelBatch, LabelRecord};

/// Options for the normalization stage.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Values substituted for absent fields.
    pub defaults: FieldDefaults,
    /// When set, the batch is stably sorted ascending by this field
    /// before rendering.
    pub sort_by: Option<FieldKey>,
}

/// Normalize raw input into an ordered batch of resolved label records.
///
/// Both input shapes funnel into the same path: each raw field mapping
/// becomes one `LabelRecord` with defaults filled in, values trimmed, and
/// input order preserved (then optionally sorted). This is a pure
/// transform; shape validation already happened when the `RawEntries`
/// value was parsed.
pub fn normalize(raw: RawEntries, options: &NormalizeOptions) -> LabelBatch {
    let field_maps = match raw {
        RawEntries::Structured(maps) => maps,
        RawEntries::Delimited(text) => parse_delimited(&text),
    };

    let records: Vec<LabelRecord> = field_maps
        .iter()
        .map(|fields| LabelRecord::from_fields(fields, &options.defaults))
        .collect();

    let mut batch = LabelBatch::new(records);
    if let Some(key) = options.sort_by {
        batch.sort_by_field(key);
    }
    batch
}
