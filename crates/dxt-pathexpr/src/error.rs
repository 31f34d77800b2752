use thiserror::Error;

/// The error taxonomy for path resolution and expression evaluation:
/// `InvalidPath`, `UnsupportedOperator`, `OpArg`.
#[derive(Error, Debug, Clone)]
pub enum PathError {
    #[error("invalid path '{0}': {1}")]
    InvalidPath(String, String),

    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("operator '{operator}' argument error: {message}")]
    OpArg { operator: String, message: String },
}
