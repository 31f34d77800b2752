//! `EngineError`: the aggregated error taxonomy, folding every sub-crate's
//! error into one enum the façade returns.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Null/invalid byte or stream arguments; a non-seekable or
    /// non-writable output.
    #[error("invalid argument: {0}")]
    ArgumentError(String),

    /// JSON parse failure or a null root value.
    #[error("invalid JSON input: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Render(#[from] dxt_render::RenderError),

    #[error(transparent)]
    Package(#[from] dxt_package::PackageError),
}
