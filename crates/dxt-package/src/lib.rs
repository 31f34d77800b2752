//! The OOXML package adapter: opens a `.docx`'s ZIP archive into a
//! [`dxt_idf::Body`] `dxt-render`'s tree walker can mutate, and serializes
//! the rendered result back into `.docx` bytes, preserving every part of
//! the package (styles, theme, headers/footers, existing media) the
//! renderer never touches.
//!
//! `docx-templater`'s façade is the only consumer outside tests.

mod convert;
mod error;
mod package;
mod sink;
mod xml;

pub use error::PackageError;
pub use package::Template;
pub use sink::ImageRegistry;
