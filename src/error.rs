use thiserror::Error;

/// Errors surfaced by the editor to its host.
///
/// Tool-state violations (drawing while cropping, switching tools mid-gesture)
/// are not represented here: the state machine ignores them instead.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("crop rectangle {width}x{height} is below the 10x10 minimum")]
    InvalidCrop { width: f32, height: f32 },

    #[error("no image loaded")]
    NoImage,

    #[error("an inpaint request needs a prompt")]
    EmptyPrompt,

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("image load was cancelled")]
    LoadCancelled,
}

impl EditorError {
    /// Decode failures come out of `image` too, but they are load errors,
    /// not export errors.
    pub(crate) fn decode(err: image::ImageError) -> Self {
        Self::ImageLoad(err.to_string())
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
