//! `w:drawing` — an inline image, as the renderer needs it: enough to
//! compute the `wp:extent`/`wp:docPr`/`pic:cNvPr` fields, without modeling
//! the rest of the DrawingML schema.

/// One inline drawing inserted by `ImageTemplateRenderer`. `dxt-package` is
/// responsible for expanding this into the full `wp:inline`/`a:graphic`
/// OOXML and for actually registering the image part and obtaining
/// `rel_id` from the package library — relationship IDs are assigned there,
/// not by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// The relationship id linking this drawing to its registered image
    /// part (assigned by the package library at registration time).
    pub rel_id: String,
    /// `wp:extent/@cx` and `pic:spPr/a:xfrm/a:ext/@cx`, in EMU.
    pub width_emu: i64,
    /// `wp:extent/@cy` and `pic:spPr/a:xfrm/a:ext/@cy`, in EMU.
    pub height_emu: i64,
    /// `wp:docPr/@id` and `pic:cNvPr/@id` — the engine's monotone
    /// `nextImageId` counter value for this drawing.
    pub non_visual_id: u32,
    /// A human-readable name for `wp:docPr/@name`/`pic:cNvPr/@name`.
    pub name: String,
}

impl Drawing {
    pub fn new(rel_id: String, width_emu: i64, height_emu: i64, non_visual_id: u32) -> Self {
        Self {
            rel_id,
            width_emu,
            height_emu,
            non_visual_id,
            name: format!("image{non_visual_id}"),
        }
    }
}
