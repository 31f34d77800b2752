//! `docx-templater`: merges a Word (`.docx`) template with a JSON data tree
//! and produces a new `.docx` with every directive resolved.
//!
//! The crate is split leaf-first: [`dxt_types`] (the dynamic value tree and scope chain),
//! [`dxt_pathexpr`] (directive lexer, path resolver, pipe-operator
//! evaluator), [`dxt_idf`] (the in-memory OOXML-ish document tree),
//! [`dxt_image`] (magic-byte sniffing and size-policy resolution),
//! [`dxt_render`] (the tree-walking `TemplateRenderer`), and [`dxt_package`]
//! (the `.docx` ZIP/OOXML adapter). This crate is just the façade tying
//! them together: [`DocxTemplateEngine`], plus the aggregated
//! [`EngineError`].

mod error;
mod options;

pub use error::EngineError;
pub use options::RenderOptions;

use std::io::{Read, Seek, Write};

use dxt_package::Template;
use dxt_render::TemplateRenderer;
use dxt_types::TemplateContext;

/// The façade that orchestrates opening a template package, parsing the
/// JSON data, walking the renderer over the body, and serializing the
/// result back out.
///
/// Stateless between calls — each [`render`](Self::render) constructs its
/// own [`TemplateRenderer`], so the per-render `nextImageId` counter never
/// leaks across calls and two engines may render concurrently on distinct
/// instances.
#[derive(Debug, Clone, Default)]
pub struct DocxTemplateEngine {
    options: RenderOptions,
}

impl DocxTemplateEngine {
    /// An engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine configured with explicit [`RenderOptions`].
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `template_bytes` against `json_data`, returning the rendered
    /// `.docx` bytes — the byte-in/byte-out convenience path.
    pub fn render(&self, template_bytes: &[u8], json_data: &str) -> Result<Vec<u8>, EngineError> {
        if template_bytes.is_empty() {
            return Err(EngineError::ArgumentError(
                "template bytes must not be empty".to_string(),
            ));
        }

        let root: serde_json::Value = serde_json::from_str(json_data)
            .map_err(|e| EngineError::InvalidJson(e.to_string()))?;
        if root.is_null() {
            return Err(EngineError::InvalidJson(
                "root JSON value must not be null".to_string(),
            ));
        }

        log::debug!("opening template package ({} bytes)", template_bytes.len());
        let mut template = Template::open(template_bytes)?;
        let context = TemplateContext::root(root);

        let (body, sink) = template.parts_mut();
        let mut renderer = TemplateRenderer::new(sink);
        renderer.render_body(body, &context)?;

        log::debug!("render complete, serializing package");
        let rendered = template.write()?;
        Ok(rendered)
    }

    /// The streaming variant: reads the template fully from `template`,
    /// renders it, and writes the result into `output`, rewinding `output`
    /// to position 0 before returning.
    pub fn render_into<R, W>(
        &self,
        mut template: R,
        json_data: &str,
        mut output: W,
    ) -> Result<(), EngineError>
    where
        R: Read,
        W: Write + Seek,
    {
        let mut template_bytes = Vec::new();
        template
            .read_to_end(&mut template_bytes)
            .map_err(|e| EngineError::ArgumentError(format!("failed to read template: {e}")))?;

        let rendered = self.render(&template_bytes, json_data)?;

        output
            .write_all(&rendered)
            .map_err(|e| EngineError::ArgumentError(format!("failed to write output: {e}")))?;
        output
            .rewind()
            .map_err(|e| EngineError::ArgumentError(format!("failed to rewind output: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const DOC_XML_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Patient: {patient.name}</w:t></w:r></w:p></w:body></w:document>"#;

    fn minimal_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer
                .write_all(
                    br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
                )
                .unwrap();

            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();

            writer.start_file("word/_rels/document.xml.rels", options).unwrap();
            writer
                .write_all(
                    br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#,
                )
                .unwrap();

            writer.finish().unwrap();
        }
        buf
    }

    fn extract_document_xml(docx_bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(docx_bytes)).unwrap();
        let mut file = archive.by_name("word/document.xml").unwrap();
        let mut contents = String::new();
        std::io::Read::read_to_string(&mut file, &mut contents).unwrap();
        contents
    }

    #[test]
    fn renders_a_basic_path_directive() {
        let template = minimal_docx(DOC_XML_TEMPLATE);
        let engine = DocxTemplateEngine::new();
        let rendered = engine
            .render(&template, r#"{"patient": {"name": "Alice"}}"#)
            .unwrap();
        let document_xml = extract_document_xml(&rendered);
        assert!(document_xml.contains("Patient: Alice"));
    }

    #[test]
    fn empty_template_bytes_is_an_argument_error() {
        let engine = DocxTemplateEngine::new();
        assert!(matches!(
            engine.render(&[], "{}"),
            Err(EngineError::ArgumentError(_))
        ));
    }

    #[test]
    fn malformed_json_is_invalid_json_error() {
        let template = minimal_docx(DOC_XML_TEMPLATE);
        let engine = DocxTemplateEngine::new();
        assert!(matches!(
            engine.render(&template, "not json"),
            Err(EngineError::InvalidJson(_))
        ));
    }

    #[test]
    fn null_json_root_is_invalid_json_error() {
        let template = minimal_docx(DOC_XML_TEMPLATE);
        let engine = DocxTemplateEngine::new();
        assert!(matches!(
            engine.render(&template, "null"),
            Err(EngineError::InvalidJson(_))
        ));
    }

    #[test]
    fn render_into_rewinds_output_stream_to_zero() {
        let template = minimal_docx(DOC_XML_TEMPLATE);
        let engine = DocxTemplateEngine::new();
        let mut output = Cursor::new(Vec::new());
        engine
            .render_into(
                Cursor::new(template),
                r#"{"patient": {"name": "Bob"}}"#,
                &mut output,
            )
            .unwrap();
        assert_eq!(output.position(), 0);
        let document_xml = extract_document_xml(output.get_ref());
        assert!(document_xml.contains("Patient: Bob"));
    }

    #[test]
    fn idempotent_on_literal_templates_with_no_directives() {
        let literal = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Plain text, no directives.</w:t></w:r></w:p></w:body></w:document>"#;
        let template = minimal_docx(literal);
        let engine = DocxTemplateEngine::new();
        let rendered = engine.render(&template, "{}").unwrap();
        let document_xml = extract_document_xml(&rendered);
        assert_eq!(document_xml, literal);
    }
}
