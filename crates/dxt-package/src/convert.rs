//! `word/document.xml`'s `w:body` fragment in both directions: parsed into
//! a [`dxt_idf::Body`] on open, and rendered back out after the tree has
//! been rendered.
//!
//! Anything this module doesn't model (bookmarks, hyperlinks, pre-existing
//! inline images, smart-art, ...) is dropped on parse rather than carried
//! through as an opaque node — the directive language never appears inside
//! those constructs, so dropping them costs nothing for a template's
//! renderable content, though it does mean a literal template exercising
//! one of them won't round-trip byte-for-byte.

use crate::xml::{self, Element, Node};
use dxt_idf::{Body, Cell, Drawing, Jc, Paragraph, ParagraphProperties, Row, Run, RunChild, Table};

pub struct ParsedBody {
    pub body: Body,
    /// `w:sectPr`, verbatim — always the body's final child in a valid
    /// package and never itself renderable content.
    pub trailing_xml: String,
}

pub fn parse_body(body_inner_xml: &str) -> ParsedBody {
    let nodes = xml::parse_fragment(body_inner_xml);
    let mut children = Vec::new();
    let mut trailing_xml = String::new();
    for node in nodes {
        match node {
            Node::Element(e) if e.local_name() == "p" => {
                children.push(dxt_idf::BlockNode::Paragraph(parse_paragraph(&e)));
            }
            Node::Element(e) if e.local_name() == "tbl" => {
                children.push(dxt_idf::BlockNode::Table(parse_table(&e)));
            }
            Node::Element(e) if e.local_name() == "sectPr" => {
                trailing_xml = xml::render(&[Node::Element(e)]);
            }
            Node::Element(e) => {
                log::warn!("dropping unsupported top-level body element <{}>", e.name);
            }
            Node::Text(_) => {}
        }
    }
    ParsedBody { body: Body::new(children), trailing_xml }
}

pub fn render_body(body: &Body, trailing_xml: &str) -> String {
    let mut out = String::new();
    for block in &body.children {
        render_block(block, &mut out);
    }
    out.push_str(trailing_xml);
    out
}

fn render_block(block: &dxt_idf::BlockNode, out: &mut String) {
    match block {
        dxt_idf::BlockNode::Paragraph(p) => render_paragraph(p, out),
        dxt_idf::BlockNode::Table(t) => render_table(t, out),
    }
}

fn parse_paragraph(e: &Element) -> Paragraph {
    let mut properties = None;
    let mut runs = Vec::new();
    for child in &e.children {
        if let Node::Element(ce) = child {
            match ce.local_name() {
                "pPr" => properties = Some(parse_paragraph_properties(ce)),
                "r" => runs.push(parse_run(ce)),
                _ => {}
            }
        }
    }
    Paragraph { properties, runs }
}

fn parse_paragraph_properties(e: &Element) -> ParagraphProperties {
    let justification = e.find_child("jc").and_then(|jc| parse_jc(&jc.attrs));
    let other: Vec<Node> = e
        .children
        .iter()
        .filter(|n| !matches!(n, Node::Element(ce) if ce.local_name() == "jc"))
        .cloned()
        .collect();
    let other_xml = if other.is_empty() { None } else { Some(xml::render(&other)) };
    ParagraphProperties { justification, other_xml }
}

fn parse_jc(attrs: &str) -> Option<Jc> {
    let val = extract_attr(attrs, "w:val")?;
    Some(match val.as_str() {
        "center" => Jc::Center,
        "end" | "right" => Jc::End,
        "both" | "distribute" => Jc::Both,
        _ => Jc::Start,
    })
}

fn parse_run(e: &Element) -> Run {
    let properties_xml = e.find_child("rPr").map(|p| xml::render(&[Node::Element(p.clone())]));
    let mut children = Vec::new();
    for child in &e.children {
        if let Node::Element(ce) = child {
            match ce.local_name() {
                "t" => children.push(RunChild::Text(ce.text_content())),
                "tab" => children.push(RunChild::Text("\t".to_string())),
                "br" | "cr" => children.push(RunChild::Text("\n".to_string())),
                // Pre-existing inline images: out of scope (see module doc).
                _ => {}
            }
        }
    }
    Run { properties_xml, children }
}

fn parse_table(e: &Element) -> Table {
    let mut rows = Vec::new();
    let mut property_parts: Vec<Node> = Vec::new();
    for child in &e.children {
        if let Node::Element(ce) = child {
            match ce.local_name() {
                "tblPr" | "tblGrid" => property_parts.push(Node::Element(ce.clone())),
                "tr" => rows.push(parse_row(ce)),
                _ => {}
            }
        }
    }
    let properties_xml = if property_parts.is_empty() { None } else { Some(xml::render(&property_parts)) };
    Table { properties_xml, rows }
}

fn parse_row(e: &Element) -> Row {
    let properties_xml = e.find_child("trPr").map(|p| xml::render(&[Node::Element(p.clone())]));
    let cells = e
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Element(ce) if ce.local_name() == "tc" => Some(parse_cell(ce)),
            _ => None,
        })
        .collect();
    Row { properties_xml, cells }
}

fn parse_cell(e: &Element) -> Cell {
    let properties_xml = e.find_child("tcPr").map(|p| xml::render(&[Node::Element(p.clone())]));
    let mut children = Vec::new();
    for child in &e.children {
        if let Node::Element(ce) = child {
            match ce.local_name() {
                "p" => children.push(dxt_idf::BlockNode::Paragraph(parse_paragraph(ce))),
                "tbl" => children.push(dxt_idf::BlockNode::Table(parse_table(ce))),
                _ => {}
            }
        }
    }
    Cell { properties_xml, children }
}

fn extract_attr(attrs: &str, key: &str) -> Option<String> {
    let needle = format!("{key}=\"");
    let start = attrs.find(&needle)? + needle.len();
    let end_rel = attrs[start..].find('"')?;
    Some(xml::unescape(&attrs[start..start + end_rel]))
}

fn render_paragraph(p: &Paragraph, out: &mut String) {
    out.push_str("<w:p>");
    if let Some(props) = &p.properties {
        render_paragraph_properties(props, out);
    }
    for run in &p.runs {
        render_run(run, out);
    }
    out.push_str("</w:p>");
}

fn render_paragraph_properties(props: &ParagraphProperties, out: &mut String) {
    if props.justification.is_none() && props.other_xml.is_none() {
        return;
    }
    out.push_str("<w:pPr>");
    if let Some(other) = &props.other_xml {
        out.push_str(other);
    }
    if let Some(jc) = props.justification {
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc_value(jc)));
    }
    out.push_str("</w:pPr>");
}

fn jc_value(jc: Jc) -> &'static str {
    match jc {
        Jc::Start => "start",
        Jc::Center => "center",
        Jc::End => "end",
        Jc::Both => "both",
    }
}

fn render_run(run: &Run, out: &mut String) {
    out.push_str("<w:r>");
    if let Some(props) = &run.properties_xml {
        out.push_str(props);
    }
    for child in &run.children {
        match child {
            RunChild::Text(t) => {
                out.push_str(r#"<w:t xml:space="preserve">"#);
                out.push_str(&xml::escape(t));
                out.push_str("</w:t>");
            }
            RunChild::Drawing(d) => render_drawing(d, out),
        }
    }
    out.push_str("</w:r>");
}

fn render_drawing(d: &Drawing, out: &mut String) {
    out.push_str(&format!(
        r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{id}" name="{name}"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rel}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        cx = d.width_emu,
        cy = d.height_emu,
        id = d.non_visual_id,
        name = xml::escape(&d.name),
        rel = xml::escape(&d.rel_id),
    ));
}

fn render_table(t: &Table, out: &mut String) {
    out.push_str("<w:tbl>");
    if let Some(props) = &t.properties_xml {
        out.push_str(props);
    }
    for row in &t.rows {
        render_row(row, out);
    }
    out.push_str("</w:tbl>");
}

fn render_row(r: &Row, out: &mut String) {
    out.push_str("<w:tr>");
    if let Some(props) = &r.properties_xml {
        out.push_str(props);
    }
    for cell in &r.cells {
        render_cell(cell, out);
    }
    out.push_str("</w:tr>");
}

fn render_cell(c: &Cell, out: &mut String) {
    out.push_str("<w:tc>");
    if let Some(props) = &c.properties_xml {
        out.push_str(props);
    }
    for block in &c.children {
        render_block(block, out);
    }
    out.push_str("</w:tc>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_plain_paragraph() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">Hello</w:t></w:r></w:p>"#;
        let parsed = parse_body(xml);
        assert_eq!(parsed.body.children.len(), 1);
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }

    #[test]
    fn preserves_run_formatting_as_opaque_xml() {
        let xml = r#"<w:p><w:r><w:rPr><w:b/><w:i/></w:rPr><w:t xml:space="preserve">bold</w:t></w:r></w:p>"#;
        let parsed = parse_body(xml);
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }

    #[test]
    fn preserves_non_justification_paragraph_properties() {
        let xml = r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">Title</w:t></w:r></w:p>"#;
        let parsed = parse_body(xml);
        let p = parsed.body.children[0].as_paragraph().unwrap();
        assert_eq!(p.properties.as_ref().unwrap().justification, Some(Jc::Center));
        assert!(p.properties.as_ref().unwrap().other_xml.as_ref().unwrap().contains("Heading1"));
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }

    #[test]
    fn sect_pr_is_captured_as_trailing_xml_not_a_block() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">Body</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#;
        let parsed = parse_body(xml);
        assert_eq!(parsed.body.children.len(), 1);
        assert!(parsed.trailing_xml.contains("pgSz"));
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }

    #[test]
    fn parses_a_table_with_rows_and_cells() {
        let xml = r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t xml:space="preserve">A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t xml:space="preserve">B</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let parsed = parse_body(xml);
        assert!(matches!(parsed.body.children[0], dxt_idf::BlockNode::Table(_)));
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }

    #[test]
    fn escapes_special_characters_in_text() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">Tom &amp; Jerry</w:t></w:r></w:p>"#;
        let parsed = parse_body(xml);
        let p = parsed.body.children[0].as_paragraph().unwrap();
        assert_eq!(p.concatenated_text(), "Tom & Jerry");
        let rendered = render_body(&parsed.body, &parsed.trailing_xml);
        assert_eq!(rendered, xml);
    }
}
