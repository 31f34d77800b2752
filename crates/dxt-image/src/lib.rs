//! Image byte acquisition, magic-byte format sniffing, pixel-size inference,
//! and size-policy resolution for inline images.
//!
//! This crate knows nothing about OOXML or the directive grammar; it turns
//! a `dxt_types::Value` into zero or more ready-to-embed `ImagePayload`s.
//! `dxt-render`'s `ImageTemplateRenderer` is the only caller.

mod error;
mod inspector;
mod payload;
mod resolver;
mod size;

pub use error::ImageError;
pub use inspector::{intrinsic_size, sniff, ImageFormat};
pub use payload::ImagePayload;
pub use resolver::{resolve_many, resolve_one};
pub use size::{fit_into_box, resolve_size, SizeRequest};
