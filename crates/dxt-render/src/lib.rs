//! Control-marker classification, the tree-walking `TemplateRenderer`, and
//! inline image rendering — the core of the engine by weight.
//!
//! This crate knows the directive grammar's *structural* vocabulary
//! (control markers, image tags) and how to rewrite a `dxt_idf::Body` tree
//! accordingly; it delegates expression evaluation to `dxt-pathexpr` and
//! image byte/size resolution to `dxt-image`. `docx-templater`'s façade is
//! the only consumer outside tests.

mod error;
mod image_renderer;
mod inline;
mod marker;
mod walker;

pub use error::RenderError;
pub use image_renderer::ImagePartSink;
pub use marker::{classify, ControlMarker, MarkerCategory};
pub use walker::TemplateRenderer;
