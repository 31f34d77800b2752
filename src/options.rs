//! `RenderOptions`: the engine's one configuration surface.

/// Render-time knobs. `strict` is inert today — reserved for promoting an
/// unrecognised-but-well-formed-looking directive from "pass through as
/// literal text" to a hard error, without changing the façade signature
/// once that policy is wired up.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub strict: bool,
}
