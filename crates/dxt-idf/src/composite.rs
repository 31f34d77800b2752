//! `BlockNode` — the union of things that can sit directly under a `Body` or
//! a table `Cell` — and `Composite`, a small accessor enum the renderer uses
//! to get/replace a composite's child list uniformly across `Body`, `Cell`,
//! and `Table` without matching on each concrete type at every call site.

use crate::paragraph::Paragraph;
use crate::table::{Cell, Row, Table};

/// A direct child of a `Body` or table `Cell`: either a paragraph or a
/// nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockNode {
    Paragraph(Paragraph),
    Table(Table),
}

impl BlockNode {
    /// The text used for control-marker classification. Only a
    /// paragraph's concatenated text can match the whole-tag grammar; a
    /// table is never itself a control marker.
    pub fn marker_text(&self) -> String {
        match self {
            BlockNode::Paragraph(p) => p.concatenated_text(),
            BlockNode::Table(_) => String::new(),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockNode::Paragraph(p) => Some(p),
            BlockNode::Table(_) => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            BlockNode::Paragraph(p) => Some(p),
            BlockNode::Table(_) => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            BlockNode::Table(t) => Some(t),
            BlockNode::Paragraph(_) => None,
        }
    }
}

impl Row {
    /// A row's descendant text: its cells' block nodes concatenated in
    /// order, used the same way a paragraph's text is for whole-tag
    /// classification, so a loop/conditional can wrap whole table rows.
    pub fn marker_text(&self) -> String {
        self.cells
            .iter()
            .flat_map(|c| c.children.iter())
            .map(|b| b.marker_text())
            .collect()
    }
}

/// A uniform handle onto a composite's ordered children, used by the tree
/// walker's "snapshot, clear, rebuild" rewrite without needing a separate
/// code path per concrete composite type at the call site that owns the
/// borrow.
pub enum Composite<'a> {
    /// A `Body` or a `Cell`: both hold a plain `Vec<BlockNode>`.
    Blocks(&'a mut Vec<BlockNode>),
    /// A `Table`'s rows.
    Rows(&'a mut Vec<Row>),
}

impl<'a> Composite<'a> {
    pub fn blocks(children: &'a mut Vec<BlockNode>) -> Self {
        Composite::Blocks(children)
    }

    pub fn rows(rows: &'a mut Vec<Row>) -> Self {
        Composite::Rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_block_node_has_no_marker_text() {
        let node = BlockNode::Table(Table::default());
        assert_eq!(node.marker_text(), "");
    }

    #[test]
    fn row_marker_text_concatenates_cells() {
        let mut p = Paragraph::new();
        p.runs.push(crate::paragraph::Run::text("{#items}"));
        let row = Row::new(vec![Cell::new(vec![BlockNode::Paragraph(p)])]);
        assert_eq!(row.marker_text(), "{#items}");
    }
}
