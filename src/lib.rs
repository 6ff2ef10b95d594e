pub mod error;
pub mod io;
pub mod layout;
pub mod models;
pub mod notify;
pub mod qr;
pub mod service;
pub mod source;
pub mod stages;

pub use error::LabelError;
pub use io::input::{RawEntries, parse_entries, read_input_file};
pub use layout::{Geometry, Orientation, PageLayoutState, PageSize};
pub use models::{
    FieldDefaults, FieldKey, LabelBatch, LabelRecord, RenderedDocument,
};
pub use notify::{HttpMailer, MailerConfig, Notifier};
pub use qr::{DisabledProvider, ImageProvider, QrServerClient, QrServerConfig};
pub use service::{AppState, ServiceConfig, build_router};
pub use source::{ColumnMap, HttpRowSource, RowSource, RowSourceConfig};
pub use stages::{NormalizeOptions, RenderConfig, normalize, render};
