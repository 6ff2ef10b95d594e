use std::path::Path;

/// The finished document for one request: PDF bytes, one page per input
/// record, plus the destination mail addresses seen while rendering.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Mail address of each record, in page order.
    pub mail_addresses: Vec<String>,
}

impl RenderedDocument {
    /// The notification target. Policy: the address of the last record in
    /// the batch wins. Callers that want to notify every recipient can
    /// walk `mail_addresses` instead.
    pub fn final_address(&self) -> Option<&str> {
        self.mail_addresses.last().map(String::as_str)
    }

    /// Persist the document to its single named output location.
    pub fn write_to(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, &self.bytes)
    }
}
