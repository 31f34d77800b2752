//! The directive lexer, path resolver, and pipe-chained expression
//! evaluator.
//!
//! `dxt-render`'s tree walker is the only consumer: it uses [`lexer`] to
//! find `{...}` tokens in run text, [`evaluate`] to turn a token's inner
//! text into a resolved [`dxt_types::Value`], and the `ast`/`error` types
//! when it needs to report a malformed expression.

pub mod ast;
pub mod error;
mod evaluator;
pub mod lexer;
mod operators;
mod parser;
mod resolver;

pub use error::PathError;
pub use evaluator::{evaluate, evaluate_pipeline};
pub use parser::{parse_expression, parse_path_head};
pub use resolver::{resolve, resolve_from, resolve_segments};
