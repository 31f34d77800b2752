use thiserror::Error;

/// The tree-walker's slice of the error taxonomy: `UnmatchedTag`,
/// `UnclosedTag`, plus the sub-crate errors it surfaces as-is.
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("closing tag '{closing}' does not match opening tag '{opening}'")]
    UnmatchedTag { opening: String, closing: String },

    #[error("start marker '{0}' has no matching end marker")]
    UnclosedTag(String),

    #[error(transparent)]
    Path(#[from] dxt_pathexpr::PathError),

    #[error(transparent)]
    Image(#[from] dxt_image::ImageError),
}
