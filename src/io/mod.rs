pub mod input;
pub mod pdf;

pub use input::*;
pub use pdf::*;
