//! Inline `{...}` substitution within a paragraph's text, robust to Word
//! splitting one directive's braces across several adjacent text runs.

use crate::error::RenderError;
use dxt_idf::Paragraph;
use dxt_pathexpr::lexer::find_tokens;
use dxt_pathexpr::PathError;
use dxt_types::{to_text, TemplateContext};

/// Replaces every recognised `{...}` token in `text` under `context`.
/// Control tokens (`#`, `?`, `/`, `/?`) are deleted; image tokens (`%`,
/// `%%`) are left verbatim (images are rendered at the paragraph level, not
/// inline); anything else is evaluated and substituted with `ToText`. A
/// token the lexer matched but the path grammar rejects (`InvalidPath`) is
/// not a directive at all — it passes through verbatim rather than failing
/// the whole render; a genuinely recognised but unsupported directive
/// (`UnsupportedOperator`/`OpArg`) still errors.
pub fn replace_inline_string(text: &str, context: &TemplateContext) -> Result<String, RenderError> {
    let tokens = find_tokens(text);
    if tokens.is_empty() {
        return Ok(text.to_string());
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for token in tokens {
        out.push_str(&text[cursor..token.start]);
        if is_control_token(&token.raw) {
            // Control markers are only meaningful as whole-paragraph
            // directives; an inline occurrence is deleted outright.
        } else if is_image_token(&token.raw) {
            out.push_str(&text[token.start..token.end]);
        } else {
            match dxt_pathexpr::evaluate(&token.raw, context) {
                Ok(value) => out.push_str(&to_text(&value)),
                Err(PathError::InvalidPath(_, _)) => out.push_str(&text[token.start..token.end]),
                Err(e) => return Err(e.into()),
            }
        }
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

fn is_control_token(inner: &str) -> bool {
    inner.starts_with('#') || inner.starts_with('?') || inner.starts_with('/')
}

fn is_image_token(inner: &str) -> bool {
    inner.starts_with('%')
}

/// Rewrites every text node in `paragraph`: cheap per-node replacement
/// when safe, falling back to flattening into the first text node only
/// when a directive actually spanned multiple runs.
pub fn replace_inline_tags_in_paragraph(paragraph: &mut Paragraph, context: &TemplateContext) -> Result<(), RenderError> {
    let mut nodes = paragraph.text_nodes_mut();
    match nodes.len() {
        0 => Ok(()),
        1 => {
            let replaced = replace_inline_string(nodes[0], context)?;
            *nodes[0] = replaced;
            Ok(())
        }
        _ => replace_across_nodes(&mut nodes, context),
    }
}

fn replace_across_nodes(nodes: &mut [&mut String], context: &TemplateContext) -> Result<(), RenderError> {
    let combined: String = nodes.iter().map(|s| s.as_str()).collect();
    if !combined.contains('{') && !combined.contains('}') {
        for node in nodes.iter_mut() {
            let replaced = replace_inline_string(node, context)?;
            **node = replaced;
        }
        return Ok(());
    }

    let combined_replacement = replace_inline_string(&combined, context)?;

    let mut per_node_replacement = String::new();
    let mut per_node_results = Vec::with_capacity(nodes.len());
    for node in nodes.iter() {
        let replaced = replace_inline_string(node, context)?;
        per_node_replacement.push_str(&replaced);
        per_node_results.push(replaced);
    }

    if per_node_replacement == combined_replacement {
        for (node, replaced) in nodes.iter_mut().zip(per_node_results) {
            **node = replaced;
        }
    } else {
        // A directive spanned multiple runs: flatten into the first text
        // node, losing per-run styling for this paragraph's text only.
        *nodes[0] = combined_replacement;
        for node in nodes[1..].iter_mut() {
            node.clear();
        }
    }
    Ok(())
}
