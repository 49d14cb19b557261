//! Encoded outputs and the collaborators that receive them.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};

pub const PNG_MIME: &str = "image/png";

/// An encoded image ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRaster {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl EncodedRaster {
    /// Decodes the bytes again; mostly useful to inspect an export.
    pub fn decode(&self) -> EditorResult<DynamicImage> {
        image::load_from_memory(&self.bytes).map_err(EditorError::decode)
    }
}

/// 8-bit grayscale PNG.
pub fn encode_mask(mask: GrayImage) -> EditorResult<EncodedRaster> {
    encode_png(DynamicImage::ImageLuma8(mask))
}

/// RGBA PNG.
pub fn encode_rgba(image: RgbaImage) -> EditorResult<EncodedRaster> {
    encode_png(DynamicImage::ImageRgba8(image))
}

fn encode_png(image: DynamicImage) -> EditorResult<EncodedRaster> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    log::debug!("Encoded {}x{} PNG ({} bytes)", image.width(), image.height(), bytes.len());
    Ok(EncodedRaster {
        width: image.width(),
        height: image.height(),
        mime: PNG_MIME.to_owned(),
        bytes,
    })
}

/// Everything an inpainting backend needs for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InpaintRequest {
    pub id: Uuid,
    pub prompt: String,
    pub mask: EncodedRaster,
    pub composite: EncodedRaster,
}

impl InpaintRequest {
    /// Fails with [`EditorError::EmptyPrompt`] when the prompt is blank.
    pub fn new(prompt: &str, mask: EncodedRaster, composite: EncodedRaster) -> EditorResult<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(EditorError::EmptyPrompt);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            prompt: prompt.to_owned(),
            mask,
            composite,
        })
    }
}

/// Receives inpaint jobs. Fire-and-forget: the editor does not wait for or
/// observe the outcome.
pub trait InpaintSink {
    fn submit(&self, request: InpaintRequest);
}

/// Receives composites the user chose to save.
pub trait SaveSink {
    fn save(&self, raster: EncodedRaster);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn test_mask_png_is_grayscale() {
        let encoded = encode_mask(GrayImage::from_pixel(8, 4, Luma([255]))).unwrap();
        assert_eq!((encoded.width, encoded.height), (8, 4));
        assert_eq!(encoded.mime, PNG_MIME);
        assert_eq!(&encoded.bytes[1..4], b"PNG");

        let decoded = encoded.decode().unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
        assert_eq!(decoded.to_luma8().get_pixel(3, 3), &Luma([255]));
    }

    #[test]
    fn test_rgba_png_keeps_alpha() {
        let encoded = encode_rgba(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]))).unwrap();
        let decoded = encoded.decode().unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_inpaint_request_needs_prompt() {
        let mask = encode_mask(GrayImage::new(1, 1)).unwrap();
        let composite = encode_rgba(RgbaImage::new(1, 1)).unwrap();
        let empty = InpaintRequest::new("   ", mask.clone(), composite.clone());
        assert!(matches!(empty, Err(EditorError::EmptyPrompt)));

        let first = InpaintRequest::new(" a red hat ", mask.clone(), composite.clone()).unwrap();
        let second = InpaintRequest::new("a red hat", mask, composite).unwrap();
        assert_eq!(first.prompt, "a red hat");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_request_manifest_omits_bytes() {
        let mask = encode_mask(GrayImage::new(3, 2)).unwrap();
        let composite = encode_rgba(RgbaImage::new(3, 2)).unwrap();
        let request = InpaintRequest::new("sky", mask, composite).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "sky");
        assert_eq!(json["mask"]["width"], 3);
        assert!(json["mask"].get("bytes").is_none());
    }
}
