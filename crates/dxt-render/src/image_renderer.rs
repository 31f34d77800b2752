//! `ImageTemplateRenderer`: rewrites a paragraph holding a lone image
//! directive into one or more inline drawings.

use crate::error::RenderError;
use dxt_idf::{Drawing, Paragraph, Run};
use dxt_image::resolve_many;
use dxt_pathexpr::lexer::as_whole_paragraph_token;
use dxt_types::TemplateContext;

/// EMU per pixel at 96 DPI.
const EMU_PER_PX: i64 = 9525;

/// The seam into the OOXML package: registering image bytes as a new image
/// part and getting back the relationship id the package library assigned.
/// `dxt-package` is the only implementer.
pub trait ImagePartSink {
    fn register_image(&mut self, bytes: &[u8], mime: &str) -> String;
}

/// An image token's parsed shape: `{%expr}` or `{%%expr}`, the latter
/// requesting a centered paragraph.
fn parse_image_tag(text: &str) -> Option<(bool, &str)> {
    let token = as_whole_paragraph_token(text)?;
    if let Some(expr) = token.strip_prefix("%%") {
        Some((true, expr.trim()))
    } else if let Some(expr) = token.strip_prefix('%') {
        Some((false, expr.trim()))
    } else {
        None
    }
}

/// Attempts to render `paragraph` as an inline-image directive. Returns
/// `Ok(true)` if the paragraph was a pure image tag and was rewritten
/// (consumed); `Ok(false)` if it wasn't an image tag at all, in which case
/// the caller proceeds with ordinary inline substitution.
pub fn try_render(
    paragraph: &mut Paragraph,
    context: &TemplateContext,
    sink: &mut dyn ImagePartSink,
    next_image_id: &mut u32,
) -> Result<bool, RenderError> {
    let text = paragraph.concatenated_text();
    let Some((centered, expr)) = parse_image_tag(&text) else {
        return Ok(false);
    };

    let value = dxt_pathexpr::evaluate(expr, context)?;
    let payloads = resolve_many(&value)?;

    paragraph.clear_runs();
    if centered {
        paragraph.set_centered();
    }

    for payload in payloads {
        let rel_id = sink.register_image(&payload.bytes, payload.mime);
        let id = *next_image_id;
        *next_image_id += 1;
        let width_emu = payload.width_px as i64 * EMU_PER_PX;
        let height_emu = payload.height_px as i64 * EMU_PER_PX;
        paragraph.runs.push(Run::drawing(Drawing::new(rel_id, width_emu, height_emu, id)));
    }

    Ok(true)
}
