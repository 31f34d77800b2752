//! The in-memory document tree the renderer walks and rewrites.
//!
//! The OOXML package itself is treated as an external collaborator: the
//! engine consumes an opened package exposing a mutable main document part
//! with a `Body` composite. This crate is that `Body` composite, modeled
//! independently of whichever crate actually parses and serializes the
//! `.docx` ZIP, so the renderer never has to know about ZIP entries or raw
//! XML. `dxt-package` is the only crate that knows how to convert to and
//! from a real OOXML package.

mod composite;
mod drawing;
mod paragraph;
mod table;

pub use composite::{BlockNode, Composite};
pub use drawing::Drawing;
pub use paragraph::{Jc, Paragraph, ParagraphProperties, Run, RunChild};
pub use table::{Cell, Row, Table};

/// The root composite of a main document part: an ordered list of top-level
/// blocks (paragraphs and tables).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub children: Vec<BlockNode>,
}

impl Body {
    pub fn new(children: Vec<BlockNode>) -> Self {
        Self { children }
    }
}
