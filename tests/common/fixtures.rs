//! Small builders for `.docx` fixtures, so integration tests exercise the
//! real façade (`DocxTemplateEngine::render`) without needing a `.docx`
//! file checked into the repo.

use std::io::Write as _;

const NAMESPACES: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

/// Wraps a `w:body` inner fragment into a full `word/document.xml`.
pub fn document_xml(body_inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NAMESPACES}><w:body>{body_inner}</w:body></w:document>"#
    )
}

/// One `w:p` holding a single run with `text` verbatim (directives and
/// all) — the common case for a template paragraph.
pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, escape(text))
}

/// Joins several paragraph texts into one `w:body` fragment, in order.
pub fn paragraphs(texts: &[&str]) -> String {
    texts.iter().map(|t| paragraph(t)).collect()
}

/// A single-cell, single-row table whose cell paragraph is split across
/// `runs`, as Word does when autocomplete/spellcheck splits a directive
/// mid-token.
pub fn table_with_split_run_cell(runs: &[&str]) -> String {
    let run_xml: String = runs
        .iter()
        .map(|r| format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, escape(r)))
        .collect();
    format!(r#"<w:tbl><w:tr><w:tc><w:p>{run_xml}</w:p></w:tc></w:tr></w:tbl>"#)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Packs `document_xml` as the sole content of a minimal `.docx` ZIP, with
/// the bare-minimum parts `dxt-package` needs to open it.
pub fn minimal_docx(document_xml: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

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

/// Extracts `word/document.xml`'s text from a rendered `.docx`'s bytes.
pub fn rendered_document_xml(docx_bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(docx_bytes)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut contents = String::new();
    std::io::Read::read_to_string(&mut file, &mut contents).unwrap();
    contents
}
