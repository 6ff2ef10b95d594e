use crate::models::{FieldKey, LabelRecord};

/// An ordered batch of label records. Order determines page order unless
/// an explicit sort is applied before rendering.
#[derive(Debug, Clone, Default)]
pub struct LabelBatch {
    records: Vec<LabelRecord>,
}

impl LabelBatch {
    pub fn new(records: Vec<LabelRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LabelRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelRecord> {
        self.records.iter()
    }

    /// Stable ascending sort by the string value of one field. Records
    /// with equal values keep their relative input order.
    pub fn sort_by_field(&mut self, key: FieldKey) {
        self.records.sort_by(|a, b| a.field(key).cmp(b.field(key)));
    }
}
