use thiserror::Error;

/// Failures that abort a whole label request.
///
/// Per-page problems (a QR fetch that times out, an image that will not
/// decode) are deliberately absent here: they are swallowed at the page
/// level and the batch keeps going. Only an unrecognized payload or a
/// document that cannot be produced at all surfaces as an error.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The request payload was absent or not a recognized shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The output document could not be produced.
    #[error("render failure: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
