//! The [`dxt_render::ImagePartSink`] implementation: accumulates rendered
//! image bytes so [`crate::package::Template::write`] can add them as new
//! `word/media/*` parts, relationships, and content types.

use dxt_render::ImagePartSink;

/// Relationship ids are assigned starting here to stay clear of whatever a
/// real template's `document.xml.rels` already uses (mirrors the same
/// "start high to avoid conflicts" approach an exporter working on an
/// existing template's rels file needs).
const FIRST_REL_ID: u32 = 1000;

pub(crate) struct RegisteredImage {
    pub rel_id: String,
    pub media_path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct ImageRegistry {
    images: Vec<RegisteredImage>,
}

impl ImageRegistry {
    pub(crate) fn images(&self) -> &[RegisteredImage] {
        &self.images
    }
}

impl ImagePartSink for ImageRegistry {
    fn register_image(&mut self, bytes: &[u8], mime: &str) -> String {
        let rel_id = format!("rId{}", FIRST_REL_ID + self.images.len() as u32);
        let ext = extension_for_mime(mime);
        let media_path = format!("word/media/image{}.{ext}", self.images.len() + 1);
        self.images.push(RegisteredImage {
            rel_id: rel_id.clone(),
            media_path,
            bytes: bytes.to_vec(),
            content_type: mime.to_string(),
        });
        rel_id
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpeg",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_distinct_relationship_ids_per_image() {
        let mut registry = ImageRegistry::default();
        let first = registry.register_image(b"a", "image/png");
        let second = registry.register_image(b"b", "image/jpeg");
        assert_ne!(first, second);
        assert_eq!(registry.images().len(), 2);
        assert_eq!(registry.images()[0].media_path, "word/media/image1.png");
        assert_eq!(registry.images()[1].media_path, "word/media/image2.jpeg");
    }
}
