//! Size resolution policy: `width/height/maxWidth/maxHeight/
//! scale/preserveAspectRatio` plus an optional intrinsic size, composed into
//! a single target `(W, H)` in pixels.

use crate::error::ImageError;

/// The size-affecting fields read off an image directive's data object;
/// everything is optional except that any field that *is* given must be
/// positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub scale: Option<f64>,
    pub preserve_aspect_ratio: Option<bool>,
}

const FALLBACK_DIMENSION: u32 = 120;

/// Resolves `request` (plus `intrinsic` pixel size, when known) into a
/// final `(width, height)`, via a base-target / scale / max-box pipeline. Returns `InvalidImageSize` if any explicit dimension is
/// non-positive, or if the resolved size ends up non-positive.
pub fn resolve_size(request: &SizeRequest, intrinsic: Option<(u32, u32)>) -> Result<(u32, u32), ImageError> {
    for (label, v) in [("width", request.width), ("height", request.height), ("maxWidth", request.max_width), ("maxHeight", request.max_height)] {
        if let Some(0) = v {
            return Err(ImageError::InvalidImageSize(format!("{label} must be > 0")));
        }
    }
    if let Some(s) = request.scale {
        if s <= 0.0 {
            return Err(ImageError::InvalidImageSize("scale must be > 0".to_string()));
        }
    }

    let keep_aspect = request.preserve_aspect_ratio.unwrap_or_else(|| {
        request.scale.is_some()
            || request.max_width.is_some()
            || request.max_height.is_some()
            || (request.width.is_some() ^ request.height.is_some())
    });

    let (mut w, mut h) = base_target(request, intrinsic, keep_aspect);

    if let Some(scale) = request.scale {
        w = round_half_away_from_zero(w as f64 * scale).max(1);
        h = round_half_away_from_zero(h as f64 * scale).max(1);
    }

    if request.max_width.is_some() || request.max_height.is_some() {
        if keep_aspect {
            let mut ratio = 1.0f64;
            if let Some(mw) = request.max_width {
                ratio = ratio.min(mw as f64 / w as f64);
            }
            if let Some(mh) = request.max_height {
                ratio = ratio.min(mh as f64 / h as f64);
            }
            ratio = ratio.min(1.0);
            w = round_half_away_from_zero(w as f64 * ratio).max(1);
            h = round_half_away_from_zero(h as f64 * ratio).max(1);
        } else {
            if let Some(mw) = request.max_width {
                w = w.min(mw);
            }
            if let Some(mh) = request.max_height {
                h = h.min(mh);
            }
        }
    }

    if w == 0 || h == 0 {
        return Err(ImageError::InvalidImageSize("resolved size must be positive".to_string()));
    }
    Ok((w, h))
}

fn base_target(request: &SizeRequest, intrinsic: Option<(u32, u32)>, keep_aspect: bool) -> (u32, u32) {
    match (request.width, request.height) {
        (Some(w), Some(h)) => {
            if keep_aspect {
                if let Some((ow, oh)) = intrinsic {
                    return fit_into_box((ow, oh), (w, h), true);
                }
            }
            (w, h)
        }
        (Some(w), None) => {
            let h = if keep_aspect {
                intrinsic
                    .map(|(ow, oh)| round_half_away_from_zero(oh as f64 * w as f64 / ow as f64).max(1))
                    .unwrap_or(FALLBACK_DIMENSION)
            } else {
                intrinsic.map(|(_, oh)| oh).unwrap_or(FALLBACK_DIMENSION)
            };
            (w, h)
        }
        (None, Some(h)) => {
            let w = if keep_aspect {
                intrinsic
                    .map(|(ow, oh)| round_half_away_from_zero(ow as f64 * h as f64 / oh as f64).max(1))
                    .unwrap_or(FALLBACK_DIMENSION)
            } else {
                intrinsic.map(|(ow, _)| ow).unwrap_or(FALLBACK_DIMENSION)
            };
            (w, h)
        }
        (None, None) => intrinsic.unwrap_or((FALLBACK_DIMENSION, FALLBACK_DIMENSION)),
    }
}

/// Fits `src` into `bounds`, optionally allowing upscale:
/// `r = min(bounds.w/src.w, bounds.h/src.h)`, clamped to
/// `<=1` unless upscaling is allowed; each output dimension floored to 1.
pub fn fit_into_box(src: (u32, u32), bounds: (u32, u32), allow_upscale: bool) -> (u32, u32) {
    let mut ratio = (bounds.0 as f64 / src.0 as f64).min(bounds.1 as f64 / src.1 as f64);
    if !allow_upscale {
        ratio = ratio.min(1.0);
    }
    (
        round_half_away_from_zero(src.0 as f64 * ratio).max(1),
        round_half_away_from_zero(src.1 as f64 * ratio).max(1),
    )
}

fn round_half_away_from_zero(x: f64) -> u32 {
    if x <= 0.0 {
        0
    } else {
        x.round() as u32
    }
}
