/// `ImagePayload`: the fully-resolved bytes plus target pixel size
/// for one inline image. One of these exists per rendered image and lives
/// only for the duration of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub width_px: u32,
    pub height_px: u32,
}
