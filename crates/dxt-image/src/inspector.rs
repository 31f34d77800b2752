//! `ImageBinaryInspector`: magic-byte format sniffing and intrinsic
//! pixel-size extraction for the supported formats.

/// The image container formats the inspector recognises. `Bmp`/`Tiff` carry
/// no size-inference support; callers must supply
/// explicit `width`/`height` for those or accept the 120x120 default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// The MIME type / OOXML image part content-type this format maps to.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
        }
    }

    /// Parses a MIME type or bare extension hint, case-insensitively.
    pub fn from_hint(hint: &str) -> Option<ImageFormat> {
        let h = hint.trim().to_lowercase();
        let h = h.strip_prefix("image/").unwrap_or(&h);
        match h {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const BMP_MAGIC: [u8; 2] = [0x42, 0x4D];

/// Sniffs `bytes`' magic header (order is the caller's to apply: MIME hint
/// first, then this sniff, then extension).
pub fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&PNG_MAGIC) {
        return Some(ImageFormat::Png);
    }
    if bytes.starts_with(&JPEG_MAGIC) {
        return Some(ImageFormat::Jpeg);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if bytes.starts_with(&BMP_MAGIC) {
        return Some(ImageFormat::Bmp);
    }
    if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        return Some(ImageFormat::Tiff);
    }
    None
}

/// Reads intrinsic `(width, height)` in pixels, when the format supports
/// inference (PNG, GIF, JPEG). BMP/TIFF return `None`.
pub fn intrinsic_size(format: ImageFormat, bytes: &[u8]) -> Option<(u32, u32)> {
    match format {
        ImageFormat::Png => png_size(bytes),
        ImageFormat::Gif => gif_size(bytes),
        ImageFormat::Jpeg => jpeg_size(bytes),
        ImageFormat::Bmp | ImageFormat::Tiff => None,
    }
}

/// PNG: IHDR's width/height are big-endian `u32` at byte offsets 16 and 20.
fn png_size(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// GIF: the logical screen descriptor's width/height are little-endian
/// `u16` at byte offsets 6 and 8.
fn gif_size(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 10 {
        return None;
    }
    let width = u16::from_le_bytes(bytes[6..8].try_into().ok()?) as u32;
    let height = u16::from_le_bytes(bytes[8..10].try_into().ok()?) as u32;
    Some((width, height))
}

/// JPEG: walk segments from offset 2, skipping `FF` fill bytes, reading each
/// segment's big-endian length, until a Start-of-Frame marker (`C0..CF`,
/// excluding the DHT/JPG markers `C4`/`C8`/`CC`) is found; height/width sit
/// at offsets +3/+4 and +5/+6 within that segment, big-endian `u16`.
fn jpeg_size(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2usize;
    while pos + 1 < bytes.len() {
        if bytes[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let mut marker_pos = pos + 1;
        while marker_pos < bytes.len() && bytes[marker_pos] == 0xFF {
            marker_pos += 1;
        }
        if marker_pos >= bytes.len() {
            return None;
        }
        let marker = bytes[marker_pos];
        let segment_start = marker_pos + 1;
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            pos = segment_start;
            continue;
        }
        if segment_start + 1 >= bytes.len() {
            return None;
        }
        let length = u16::from_be_bytes(bytes[segment_start..segment_start + 2].try_into().ok()?) as usize;
        let is_sof = (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC;
        if is_sof {
            if segment_start + 7 > bytes.len() {
                return None;
            }
            let height = u16::from_be_bytes(bytes[segment_start + 3..segment_start + 5].try_into().ok()?) as u32;
            let width = u16::from_be_bytes(bytes[segment_start + 5..segment_start + 7].try_into().ok()?) as u32;
            return Some((width, height));
        }
        pos = segment_start + length;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut b = PNG_MAGIC.to_vec();
        b.extend_from_slice(b"\0\0\0\x0DIHDR");
        b.extend_from_slice(&width.to_be_bytes());
        b.extend_from_slice(&height.to_be_bytes());
        b.extend_from_slice(&[0u8; 5]);
        b
    }

    #[test]
    fn sniffs_png_magic() {
        let bytes = png_bytes(100, 50);
        assert_eq!(sniff(&bytes), Some(ImageFormat::Png));
        assert_eq!(intrinsic_size(ImageFormat::Png, &bytes), Some((100, 50)));
    }

    #[test]
    fn sniffs_jpeg_magic() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(sniff(&bytes), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn sniffs_gif_magic() {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&200u16.to_le_bytes());
        bytes.extend_from_slice(&150u16.to_le_bytes());
        assert_eq!(sniff(&bytes), Some(ImageFormat::Gif));
        assert_eq!(intrinsic_size(ImageFormat::Gif, &bytes), Some((200, 150)));
    }

    #[test]
    fn sniffs_bmp_and_tiff_with_no_size_inference() {
        assert_eq!(sniff(&[0x42, 0x4D, 0, 0]), Some(ImageFormat::Bmp));
        assert_eq!(sniff(b"II*\0rest"), Some(ImageFormat::Tiff));
        assert_eq!(intrinsic_size(ImageFormat::Bmp, &[0x42, 0x4D]), None);
    }

    #[test]
    fn unrecognised_bytes_sniff_to_none() {
        assert_eq!(sniff(b"not an image"), None);
    }

    #[test]
    fn jpeg_size_walks_segments_to_sof0() {
        // SOI, APP0 (skip), SOF0 with height=120 width=240.
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        bytes.extend_from_slice(&[0u8; 14]);
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&120u16.to_be_bytes());
        bytes.extend_from_slice(&240u16.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 6]);
        assert_eq!(jpeg_size(&bytes), Some((240, 120)));
    }
}
