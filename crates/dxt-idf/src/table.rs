//! `w:tbl` / `w:tr` / `w:tc` — tables, rows, and cells. A cell's children are
//! themselves `BlockNode`s, the same "holds ordered children" shape as a
//! body (body, table, row, cell, paragraph all qualify), so a cell can
//! hold nested tables as well as paragraphs.

use crate::composite::BlockNode;

/// `w:tbl`. `properties_xml` carries `w:tblPr`/`w:tblGrid` (borders, column
/// widths, ...) verbatim; this crate never interprets table formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub properties_xml: Option<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { properties_xml: None, rows }
    }
}

/// `w:tr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub properties_xml: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { properties_xml: None, cells }
    }
}

/// `w:tc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub properties_xml: Option<String>,
    pub children: Vec<BlockNode>,
}

impl Cell {
    pub fn new(children: Vec<BlockNode>) -> Self {
        Self { properties_xml: None, children }
    }
}
