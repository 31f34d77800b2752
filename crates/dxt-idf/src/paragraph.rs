//! `w:p` / `w:r` / `w:t` — paragraphs, runs, and the text/drawing content a
//! run can carry.

use crate::drawing::Drawing;

/// `w:jc` — paragraph justification. Only the one value the image renderer
/// needs (centering a paragraph) is modeled; other values round-trip
/// through `dxt-package` without the renderer caring about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jc {
    Start,
    Center,
    End,
    Both,
}

/// `w:pPr` — paragraph properties. Created lazily: a paragraph with no
/// properties has `None` here until something (like centering an image)
/// needs to create one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    pub justification: Option<Jc>,
    /// Everything else `w:pPr` held in the source template (`w:pStyle`,
    /// `w:spacing`, `w:ind`, ...), kept as raw inner XML so `dxt-package`
    /// can splice it back out unexamined. `dxt-idf` only ever reasons
    /// about `justification`.
    pub other_xml: Option<String>,
}

/// `w:p`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub properties: Option<ParagraphProperties>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The paragraph's text nodes in document order, read-only — the shape
    /// `TagLexer`/inline substitution classify and rewrite.
    pub fn text_nodes(&self) -> Vec<&String> {
        self.runs
            .iter()
            .flat_map(|r| r.children.iter())
            .filter_map(|c| match c {
                RunChild::Text(t) => Some(t),
                RunChild::Drawing(_) => None,
            })
            .collect()
    }

    /// Mutable access to the paragraph's text nodes in document order, for
    /// writing substituted text back — either into each node in place, or
    /// flattened into the first text node when a directive spans runs.
    pub fn text_nodes_mut(&mut self) -> Vec<&mut String> {
        self.runs
            .iter_mut()
            .flat_map(|r| r.children.iter_mut())
            .filter_map(|c| match c {
                RunChild::Text(t) => Some(t),
                RunChild::Drawing(_) => None,
            })
            .collect()
    }

    /// The paragraph's concatenated visible text, used for control-marker
    /// and image-tag classification.
    pub fn concatenated_text(&self) -> String {
        self.text_nodes().into_iter().map(|s| s.as_str()).collect()
    }

    /// Sets `justification = Center`, creating `properties` if absent.
    pub fn set_centered(&mut self) {
        let props = self.properties.get_or_insert_with(ParagraphProperties::default);
        props.justification = Some(Jc::Center);
    }

    /// Removes every run, used before an image renderer re-populates the
    /// paragraph with drawing runs.
    pub fn clear_runs(&mut self) {
        self.runs.clear();
    }
}

/// `w:r`. A styled span; the engine never interprets `w:rPr` itself — it is
/// opaque formatting data `dxt-package` splices back out verbatim. Keeping
/// it as a raw XML blob rather than a typed struct keeps this crate free of
/// any OOXML-schema dependency, and makes cloning a run for a loop
/// iteration exact by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub properties_xml: Option<String>,
    pub children: Vec<RunChild>,
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            properties_xml: None,
            children: vec![RunChild::Text(text.into())],
        }
    }

    pub fn drawing(drawing: Drawing) -> Self {
        Self {
            properties_xml: None,
            children: vec![RunChild::Drawing(drawing)],
        }
    }
}

/// The two things a run can hold: `w:t` text or a `w:drawing`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunChild {
    Text(String),
    Drawing(Drawing),
}
