use image::RgbaImage;

use crate::error::{EditorError, EditorResult};

/// Decoded source pixels of the image being edited.
///
/// Never modified in place: transforms produce new images, and a crop commit
/// replaces the whole canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Decodes any format `image` understands.
    pub fn from_bytes(bytes: &[u8]) -> EditorResult<Self> {
        let decoded = image::load_from_memory(bytes).map_err(EditorError::decode)?;
        log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
        Self::from_image(decoded.to_rgba8())
    }

    pub fn from_image(pixels: RgbaImage) -> EditorResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(EditorError::ImageLoad("image has no pixels".to_owned()));
        }
        Ok(Self { pixels })
    }

    pub fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
