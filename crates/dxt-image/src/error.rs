use thiserror::Error;

/// The image subsystem's slice of the error taxonomy:
/// `InvalidImageSource`, `UnknownImageFormat`, `InvalidImageSize`.
#[derive(Error, Debug, Clone)]
pub enum ImageError {
    #[error("image source '{0}' is neither a data URI, an existing file, nor valid base64")]
    InvalidImageSource(String),

    #[error("could not determine the image format for this source")]
    UnknownImageFormat,

    #[error("invalid image size: {0}")]
    InvalidImageSize(String),
}
