//! Shared data types for the docx templating engine.
//!
//! This crate defines the dynamic value tree the engine operates on and the
//! scope-chain context that models lexical scoping across nested loop
//! iterations. Nothing here knows about OOXML, directive syntax, or images;
//! it is the foundation every other `dxt-*` crate builds on.

mod context;
mod value;

pub use context::TemplateContext;
pub use value::{deep_clone, is_truthy, to_text, value_kind, ValueKind};

/// The dynamic JSON value tree the engine merges templates against.
///
/// We reuse `serde_json::Value` directly rather than inventing a parallel
/// enum: the corpus this engine is styled on always treats the JSON data
/// source as `serde_json::Value`, and `Value` already gives us ordered,
/// insertion-preserving `Object` maps (via the `preserve_order` semantics of
/// `serde_json::Map`) and cheap structural cloning.
pub type Value = serde_json::Value;
