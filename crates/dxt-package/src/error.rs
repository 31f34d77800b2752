//! `dxt-package`'s failure modes: reading a malformed/unsupported `.docx`
//! and the write-back step.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("not a valid .docx package: {0}")]
    InvalidPackage(String),

    #[error("failed to serialize the rendered document: {0}")]
    Write(String),
}

impl From<std::io::Error> for PackageError {
    fn from(e: std::io::Error) -> Self {
        PackageError::Write(e.to_string())
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(e: zip::result::ZipError) -> Self {
        PackageError::InvalidPackage(e.to_string())
    }
}
