//! `TemplateRenderer`: the tree walker that expands loops and
//! conditionals, performs inline substitution, and recurses into nested
//! composites. Evaluates the governing expression once, then re-enters the
//! same walk for each iteration's (or the single truthy) block under a
//! fresh scope.

use crate::error::RenderError;
use crate::image_renderer::{self, ImagePartSink};
use crate::marker::{classify, ControlMarker};
use dxt_idf::{Body, Composite, BlockNode, Paragraph, Row};
use dxt_types::{deep_clone, is_truthy, TemplateContext, Value};
use std::mem;

/// Owns the per-render state: a monotonically increasing image-id
/// counter, scoped to one render call, plus the seam into the package
/// library for registering image parts.
pub struct TemplateRenderer<'a> {
    sink: &'a mut dyn ImagePartSink,
    next_image_id: u32,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(sink: &'a mut dyn ImagePartSink) -> Self {
        Self { sink, next_image_id: 1 }
    }

    /// Renders an entire main document body in place — the entry point
    /// into the walker.
    pub fn render_body(&mut self, body: &mut Body, context: &TemplateContext) -> Result<(), RenderError> {
        self.render_composite(Composite::blocks(&mut body.children), context)
    }

    /// Renders any composite (body, table, cell, paragraph, row) by
    /// dispatching to the block-list or row-list walk.
    pub fn render_composite(&mut self, composite: Composite<'_>, context: &TemplateContext) -> Result<(), RenderError> {
        match composite {
            Composite::Blocks(children) => {
                let snapshot = mem::take(children);
                *children = self.render_blocks(snapshot, context)?;
            }
            Composite::Rows(rows) => {
                let snapshot = mem::take(rows);
                *rows = self.render_rows(snapshot, context)?;
            }
        }
        Ok(())
    }

    fn render_blocks(&mut self, children: Vec<BlockNode>, context: &TemplateContext) -> Result<Vec<BlockNode>, RenderError> {
        let mut out = Vec::with_capacity(children.len());
        let mut idx = 0;
        while idx < children.len() {
            match classify(&children[idx].marker_text()) {
                Some(marker) if marker.is_start() => {
                    let end_idx = find_matching_end(&children, idx, &marker, BlockNode::marker_text)?;
                    let block = &children[idx + 1..end_idx];
                    self.expand_block(&marker, block, context, &mut out, |renderer, items, ctx| renderer.render_blocks(items, ctx))?;
                    idx = end_idx + 1;
                }
                Some(_) => idx += 1, // a bare end marker with no opener: drop silently
                None => {
                    let mut node = children[idx].clone();
                    self.render_block(&mut node, context)?;
                    out.push(node);
                    idx += 1;
                }
            }
        }
        Ok(out)
    }

    fn render_rows(&mut self, rows: Vec<Row>, context: &TemplateContext) -> Result<Vec<Row>, RenderError> {
        let mut out = Vec::with_capacity(rows.len());
        let mut idx = 0;
        while idx < rows.len() {
            match classify(&rows[idx].marker_text()) {
                Some(marker) if marker.is_start() => {
                    let end_idx = find_matching_end(&rows, idx, &marker, Row::marker_text)?;
                    let block = &rows[idx + 1..end_idx];
                    self.expand_block(&marker, block, context, &mut out, |renderer, items, ctx| renderer.render_rows(items, ctx))?;
                    idx = end_idx + 1;
                }
                Some(_) => idx += 1,
                None => {
                    let mut row = rows[idx].clone();
                    self.render_row(&mut row, context)?;
                    out.push(row);
                    idx += 1;
                }
            }
        }
        Ok(out)
    }

    /// Shared loop/conditional expansion: evaluates the marker's
    /// expression once, then re-enters `render_rest` for each iteration's
    /// (or the single truthy) cloned block, appending the result to `out`.
    fn expand_block<T: Clone>(
        &mut self,
        marker: &ControlMarker,
        block: &[T],
        context: &TemplateContext,
        out: &mut Vec<T>,
        mut render_rest: impl FnMut(&mut Self, Vec<T>, &TemplateContext) -> Result<Vec<T>, RenderError>,
    ) -> Result<(), RenderError> {
        match marker {
            ControlMarker::LoopStart(expr) => {
                let value = dxt_pathexpr::evaluate(expr, context)?;
                for item in to_loop_items(&value) {
                    let child_ctx = context.child(item);
                    let cloned = block.to_vec();
                    out.extend(render_rest(self, cloned, &child_ctx)?);
                }
            }
            ControlMarker::IfStart(expr) => {
                let value = dxt_pathexpr::evaluate(expr, context)?;
                if is_truthy(&value) {
                    let cloned = block.to_vec();
                    out.extend(render_rest(self, cloned, context)?);
                }
            }
            ControlMarker::LoopEnd(_) | ControlMarker::IfEnd(_) => unreachable!("only called with a start marker"),
        }
        Ok(())
    }

    fn render_block(&mut self, node: &mut BlockNode, context: &TemplateContext) -> Result<(), RenderError> {
        match node {
            BlockNode::Paragraph(p) => self.render_paragraph(p, context),
            BlockNode::Table(t) => self.render_composite(Composite::rows(&mut t.rows), context),
        }
    }

    fn render_row(&mut self, row: &mut Row, context: &TemplateContext) -> Result<(), RenderError> {
        for cell in row.cells.iter_mut() {
            self.render_composite(Composite::blocks(&mut cell.children), context)?;
        }
        Ok(())
    }

    /// Paragraph handling: attempt the image directive first; if the
    /// paragraph wasn't consumed as a pure image tag, fall back to ordinary
    /// inline substitution.
    fn render_paragraph(&mut self, paragraph: &mut Paragraph, context: &TemplateContext) -> Result<(), RenderError> {
        let consumed = image_renderer::try_render(paragraph, context, self.sink, &mut self.next_image_id)?;
        if consumed {
            return Ok(());
        }
        crate::inline::replace_inline_tags_in_paragraph(paragraph, context)
    }
}

/// `ToLoopItems`: `Array` → its elements; other truthy value → a
/// single-item list; null/falsy → empty.
fn to_loop_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().map(deep_clone).collect(),
        other if is_truthy(other) => vec![deep_clone(other)],
        _ => Vec::new(),
    }
}

/// Scans forward from `start_idx` for the marker that brings the
/// same-category nesting depth back to zero, using a depth counter over
/// markers of the *same category*. The matching end's expression must
/// equal the opener's, byte for byte.
fn find_matching_end<T>(
    children: &[T],
    start_idx: usize,
    opener: &ControlMarker,
    marker_text: impl Fn(&T) -> String,
) -> Result<usize, RenderError> {
    let category = opener.category();
    let mut depth = 1i32;
    let mut idx = start_idx + 1;
    while idx < children.len() {
        if let Some(marker) = classify(&marker_text(&children[idx])) {
            if marker.category() == category {
                if marker.is_start() {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        if marker.expression() != opener.expression() {
                            return Err(RenderError::UnmatchedTag {
                                opening: opener.expression().to_string(),
                                closing: marker.expression().to_string(),
                            });
                        }
                        return Ok(idx);
                    }
                }
            }
        }
        idx += 1;
    }
    Err(RenderError::UnclosedTag(opener.expression().to_string()))
}
