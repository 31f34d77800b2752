//! [`Template`]: opens a `.docx`'s ZIP package into a [`dxt_idf::Body`] the
//! renderer can mutate in place, then serializes the rendered tree back
//! into a new `.docx`, carrying over every other part of the package
//! (styles, theme, headers/footers, media already embedded) untouched.

use std::io::{Cursor, Read, Write};

use crate::convert;
use crate::error::PackageError;
use crate::sink::{ImageRegistry, RegisteredImage};

/// A template opened from a `.docx` package: a renderable [`dxt_idf::Body`]
/// plus everything needed to splice it back into the original archive.
pub struct Template {
    body: dxt_idf::Body,
    header: String,
    footer: String,
    trailing_xml: String,
    original_bytes: Vec<u8>,
    images: ImageRegistry,
}

impl Template {
    pub fn open(bytes: &[u8]) -> Result<Self, PackageError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let document_xml = read_entry(&mut archive, "word/document.xml")?;
        let document_xml =
            String::from_utf8(document_xml).map_err(|e| PackageError::InvalidPackage(e.to_string()))?;

        let body_tag_start = document_xml
            .find("<w:body")
            .ok_or_else(|| PackageError::InvalidPackage("word/document.xml has no <w:body>".to_string()))?;
        let body_tag_open_end = document_xml[body_tag_start..]
            .find('>')
            .map(|rel| body_tag_start + rel + 1)
            .ok_or_else(|| PackageError::InvalidPackage("unterminated <w:body> tag".to_string()))?;
        let body_close_start = document_xml
            .rfind("</w:body>")
            .ok_or_else(|| PackageError::InvalidPackage("word/document.xml has no </w:body>".to_string()))?;

        let header = document_xml[..body_tag_open_end].to_string();
        let footer = document_xml[body_close_start..].to_string();
        let parsed = convert::parse_body(&document_xml[body_tag_open_end..body_close_start]);

        Ok(Self {
            body: parsed.body,
            header,
            footer,
            trailing_xml: parsed.trailing_xml,
            original_bytes: bytes.to_vec(),
            images: ImageRegistry::default(),
        })
    }

    pub fn body(&self) -> &dxt_idf::Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut dxt_idf::Body {
        &mut self.body
    }

    /// The image sink to hand to a `TemplateRenderer`: every image the
    /// renderer registers here becomes a new `word/media/*` part,
    /// relationship, and content-type entry in [`write`](Self::write).
    pub fn image_sink(&mut self) -> &mut ImageRegistry {
        &mut self.images
    }

    /// Borrows the renderable body and the image sink simultaneously, for
    /// the one call site (`TemplateRenderer::render_body`) that needs both
    /// at once.
    pub fn parts_mut(&mut self) -> (&mut dxt_idf::Body, &mut ImageRegistry) {
        (&mut self.body, &mut self.images)
    }

    /// Serializes the (presumably already-rendered) tree back into `.docx`
    /// bytes, preserving every other part of the original package.
    pub fn write(self) -> Result<Vec<u8>, PackageError> {
        let inner = convert::render_body(&self.body, &self.trailing_xml);
        let new_document_xml = format!("{}{}{}", self.header, inner, self.footer);

        let mut archive = zip::ZipArchive::new(Cursor::new(&self.original_bytes))?;
        let mut output = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut output));
            let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for i in 0..archive.len() {
                let mut entry = archive.by_index(i)?;
                let name = entry.name().to_string();
                if name.ends_with('/') {
                    continue;
                }
                let mut contents = Vec::new();
                entry.read_to_end(&mut contents)?;

                let contents = if name == "word/document.xml" {
                    new_document_xml.clone().into_bytes()
                } else if name == "word/_rels/document.xml.rels" {
                    add_image_relationships(&contents, self.images.images())?
                } else if name == "[Content_Types].xml" {
                    add_content_types(&contents, self.images.images())?
                } else {
                    contents
                };

                writer.start_file(&name, options)?;
                writer.write_all(&contents)?;
            }

            let image_options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for image in self.images.images() {
                writer.start_file(&image.media_path, image_options)?;
                writer.write_all(&image.bytes)?;
            }

            writer.finish()?;
        }
        Ok(output)
    }
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> Result<Vec<u8>, PackageError> {
    let mut file = archive
        .by_name(name)
        .map_err(|_| PackageError::InvalidPackage(format!("missing {name} in package")))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

fn add_image_relationships(rels_xml: &[u8], images: &[RegisteredImage]) -> Result<Vec<u8>, PackageError> {
    if images.is_empty() {
        return Ok(rels_xml.to_vec());
    }
    let xml_str = String::from_utf8_lossy(rels_xml);
    let close = xml_str
        .rfind("</Relationships>")
        .ok_or_else(|| PackageError::InvalidPackage("document.xml.rels has no </Relationships>".to_string()))?;

    let mut result = String::with_capacity(xml_str.len() + images.len() * 160);
    result.push_str(&xml_str[..close]);
    for image in images {
        let target = image.media_path.trim_start_matches("word/");
        result.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
            image.rel_id, target,
        ));
    }
    result.push_str("</Relationships>");
    Ok(result.into_bytes())
}

fn add_content_types(content_types_xml: &[u8], images: &[RegisteredImage]) -> Result<Vec<u8>, PackageError> {
    if images.is_empty() {
        return Ok(content_types_xml.to_vec());
    }
    let xml_str = String::from_utf8_lossy(content_types_xml);
    let close = xml_str
        .rfind("</Types>")
        .ok_or_else(|| PackageError::InvalidPackage("[Content_Types].xml has no </Types>".to_string()))?;

    let mut extensions: Vec<(&str, &str)> = Vec::new();
    for image in images {
        let ext = image.media_path.rsplit('.').next().unwrap_or("bin");
        if !extensions.iter().any(|(e, _)| *e == ext) {
            extensions.push((ext, image.content_type.as_str()));
        }
    }

    let mut result = String::with_capacity(xml_str.len() + extensions.len() * 96);
    result.push_str(&xml_str[..close]);
    for (ext, content_type) in extensions {
        let marker = format!(r#"Extension="{ext}""#);
        if !xml_str.contains(&marker) {
            result.push_str(&format!(r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#));
        }
    }
    result.push_str("</Types>");
    Ok(result.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxt_render::ImagePartSink as _;

    fn minimal_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

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

    const DOC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Hello {name}</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#;

    #[test]
    fn opens_a_minimal_package_and_parses_its_body() {
        let bytes = minimal_docx(DOC_XML);
        let template = Template::open(&bytes).unwrap();
        assert_eq!(template.body().children.len(), 1);
        let text = template.body().children[0].as_paragraph().unwrap().concatenated_text();
        assert_eq!(text, "Hello {name}");
    }

    #[test]
    fn write_preserves_sect_pr_and_other_parts() {
        let bytes = minimal_docx(DOC_XML);
        let template = Template::open(&bytes).unwrap();
        let out = template.write().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(&out)).unwrap();
        let document_xml = read_entry(&mut archive, "word/document.xml").unwrap();
        let document_xml = String::from_utf8(document_xml).unwrap();
        assert!(document_xml.contains("Hello {name}"));
        assert!(document_xml.contains("w:sectPr"));
        assert!(document_xml.contains("pgSz"));
    }

    #[test]
    fn write_registers_new_image_parts_and_relationships() {
        let bytes = minimal_docx(DOC_XML);
        let mut template = Template::open(&bytes).unwrap();
        let rel_id = template.image_sink().register_image(b"fake-png-bytes", "image/png");
        assert!(rel_id.starts_with("rId"));

        let out = template.write().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(&out)).unwrap();
        assert!(archive.by_name("word/media/image1.png").is_ok());
        let rels = read_entry(&mut archive, "word/_rels/document.xml.rels").unwrap();
        let rels = String::from_utf8(rels).unwrap();
        assert!(rels.contains(&rel_id));
        let content_types = read_entry(&mut archive, "[Content_Types].xml").unwrap();
        let content_types = String::from_utf8(content_types).unwrap();
        assert!(content_types.contains("image/png"));
    }
}
