//! A thin tree layer over `quick_xml`'s pull parser — just enough to walk
//! `word/document.xml`'s `w:body` and rebuild it after rendering. Nothing
//! here understands OOXML semantics; that lives in [`crate::convert`].
//!
//! Drives a `quick_xml::Reader` event loop (`Start`/`Empty`/`Text`/`End`)
//! but builds an owned [`Node`] tree rather than consuming events once,
//! left to right, since [`crate::convert`] needs to walk back into
//! already-parsed siblings (`find_child`, re-rendering a captured
//! subtree).

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Raw attribute text between the tag name and `>`/`/>`, preserved
    /// verbatim (namespace declarations, `w:val="..."`, ...).
    pub attrs: String,
    pub children: Vec<Node>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find_map(|n| match n {
            Node::Element(e) if e.local_name() == local_name => Some(e),
            _ => None,
        })
    }

    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .map(|n| match n {
                Node::Text(t) => t.clone(),
                Node::Element(e) => e.text_content(),
            })
            .collect()
    }
}

/// The raw `name attrs` content of a `BytesStart`/`Empty` event, split at
/// the tag name so attributes round-trip byte-for-byte rather than being
/// re-escaped through quick_xml's attribute builder.
fn name_and_attrs(e: &BytesStart) -> (String, String) {
    let whole = String::from_utf8_lossy(e.as_ref()).into_owned();
    let name_len = e.name().as_ref().len();
    let name = whole[..name_len].to_string();
    let attrs = whole[name_len..].trim_start().to_string();
    (name, attrs)
}

fn push_node(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Parses a fragment of XML (no single required root element) into a flat
/// list of top-level nodes. Malformed trailing input (an unterminated tag,
/// a dangling close) simply stops the walk at the point quick_xml can no
/// longer make progress; whatever was parsed up to there is returned.
pub fn parse_fragment(xml: &str) -> Vec<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf);
        buf.clear();
        match event {
            Ok(Event::Start(e)) => {
                let (name, attrs) = name_and_attrs(&e);
                stack.push(Element { name, attrs, children: Vec::new() });
            }
            Ok(Event::Empty(e)) => {
                let (name, attrs) = name_and_attrs(&e);
                push_node(&mut stack, &mut roots, Node::Element(Element { name, attrs, children: Vec::new() }));
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    push_node(&mut stack, &mut roots, Node::Element(element));
                } else {
                    break;
                }
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                if !raw.is_empty() {
                    push_node(&mut stack, &mut roots, Node::Text(unescape(&raw)));
                }
            }
            Ok(Event::CData(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                push_node(&mut stack, &mut roots, Node::Text(raw));
            }
            Ok(Event::Comment(_)) | Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(_) => break,
        }
    }

    // Any still-open elements (truncated input) are flushed as-is rather
    // than silently dropped.
    while let Some(element) = stack.pop() {
        push_node(&mut stack, &mut roots, Node::Element(element));
    }
    roots
}

pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_into(node, &mut out);
    }
    out
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&escape(t)),
        Node::Element(e) => {
            out.push('<');
            out.push_str(&e.name);
            if !e.attrs.is_empty() {
                out.push(' ');
                out.push_str(&e.attrs);
            }
            if e.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &e.children {
                    render_into(child, out);
                }
                out.push_str("</");
                out.push_str(&e.name);
                out.push('>');
            }
        }
    }
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let xml = r#"<w:p><w:r><w:t>hello</w:t></w:r></w:p>"#;
        let nodes = parse_fragment(xml);
        assert_eq!(nodes.len(), 1);
        let Node::Element(p) = &nodes[0] else { panic!() };
        assert_eq!(p.local_name(), "p");
        assert_eq!(p.text_content(), "hello");
    }

    #[test]
    fn self_closing_element_has_no_children() {
        let xml = r#"<w:jc w:val="center"/>"#;
        let nodes = parse_fragment(xml);
        let Node::Element(e) = &nodes[0] else { panic!() };
        assert!(e.children.is_empty());
        assert_eq!(e.attrs, r#"w:val="center""#);
    }

    #[test]
    fn round_trips_escaped_text() {
        let xml = r#"<w:t>Tom &amp; Jerry &lt;3</w:t>"#;
        let nodes = parse_fragment(xml);
        let Node::Element(e) = &nodes[0] else { panic!() };
        assert_eq!(e.text_content(), "Tom & Jerry <3");
        assert_eq!(render(&nodes), xml);
    }

    #[test]
    fn skips_comments_and_processing_instructions() {
        let xml = r#"<?mso-application progid="Word.Document"?><w:p><!-- note --><w:r/></w:p>"#;
        let nodes = parse_fragment(xml);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn find_child_locates_by_local_name() {
        let xml = r#"<w:pPr><w:jc w:val="center"/></w:pPr>"#;
        let nodes = parse_fragment(xml);
        let Node::Element(ppr) = &nodes[0] else { panic!() };
        assert!(ppr.find_child("jc").is_some());
        assert!(ppr.find_child("ind").is_none());
    }
}
