pub mod batch;
pub mod document;
pub mod record;

pub use batch::*;
pub use document::*;
pub use record::*;
