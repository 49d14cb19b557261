//! Source image → displayed/exported image.

use image::{Rgba, RgbaImage};

use crate::filters;
use crate::render::{RasterRenderer, Renderer};
use crate::transform::{GeometricTransform, TransformState};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Resamples `source` through a resolved geometric transform. Output pixels
/// not covered by the source (corners of an arbitrary rotation) stay
/// transparent.
pub fn apply_geometry(source: &RgbaImage, geometry: &GeometricTransform) -> RgbaImage {
    if geometry.is_identity() && geometry.output_size == [source.width(), source.height()] {
        return source.clone();
    }
    let [width, height] = geometry.output_size;
    let mut renderer = RasterRenderer::new(width, height, TRANSPARENT, TRANSPARENT);
    renderer.draw_image(source, &geometry.to_output);
    renderer.into_image()
}

/// Full pipeline: flip, rotate, crop (when `include_crop`), then colour.
pub fn render(source: &RgbaImage, transform: &TransformState, include_crop: bool, blur_sigma: f32) -> RgbaImage {
    let geometry = transform.geometry([source.width(), source.height()], include_crop);
    let shaped = apply_geometry(source, &geometry);
    filters::apply_color(shaped, transform, blur_sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::CropRect;
    use crate::transform::FilterPreset;
    use egui::{Rect, pos2};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_untouched_transform_is_a_copy() {
        let source = gradient(16, 8);
        assert_eq!(render(&source, &TransformState::default(), true, 2.0), source);
    }

    #[test]
    fn test_quarter_turn_moves_pixels() {
        let source = gradient(4, 2);
        let mut transform = TransformState::default();
        transform.rotate_right();
        let output = render(&source, &transform, true, 2.0);
        assert_eq!(output.dimensions(), (2, 4));
        // source (0,0) lands top-right, source (0,1) top-left
        assert_eq!(output.get_pixel(1, 0), source.get_pixel(0, 0));
        assert_eq!(output.get_pixel(0, 0), source.get_pixel(0, 1));
        assert_eq!(output.get_pixel(0, 3), source.get_pixel(3, 1));
    }

    #[test]
    fn test_flip_x_mirrors_rows() {
        let source = gradient(5, 3);
        let mut transform = TransformState::default();
        transform.flip_x();
        let output = render(&source, &transform, true, 2.0);
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(output.get_pixel(x, y), source.get_pixel(4 - x, y));
            }
        }
    }

    #[test]
    fn test_half_turn_matches_double_flip() {
        let source = gradient(7, 5);
        let mut rotated = TransformState::default();
        rotated.set_rotation(180);
        let mut flipped = TransformState::default();
        flipped.flip_x();
        flipped.flip_y();
        assert_eq!(render(&source, &rotated, true, 2.0), render(&source, &flipped, true, 2.0));
    }

    #[test]
    fn test_crop_extracts_region() {
        let source = gradient(40, 40);
        let mut transform = TransformState::default();
        let crop = CropRect::new(Rect::from_min_max(pos2(5.0, 10.0), pos2(25.0, 30.0))).unwrap();
        transform.set_crop(Some(crop));

        let output = render(&source, &transform, true, 2.0);
        assert_eq!(output.dimensions(), (20, 20));
        assert_eq!(output.get_pixel(0, 0), source.get_pixel(5, 10));
        assert_eq!(output.get_pixel(19, 19), source.get_pixel(24, 29));

        assert_eq!(render(&source, &transform, false, 2.0).dimensions(), (40, 40));
    }

    #[test]
    fn test_arbitrary_rotation_has_transparent_corners() {
        let source = RgbaImage::from_pixel(20, 20, Rgba([200, 10, 10, 255]));
        let mut transform = TransformState::default();
        transform.set_rotation(45);
        let output = render(&source, &transform, true, 2.0);
        assert_eq!(output.dimensions(), (29, 29));
        assert_eq!(output.get_pixel(0, 0), &TRANSPARENT);
        assert_eq!(output.get_pixel(14, 14), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_color_runs_after_geometry() {
        let source = gradient(4, 4);
        let mut transform = TransformState::default();
        transform.flip_x();
        transform.set_filter(FilterPreset::Invert);
        let output = render(&source, &transform, true, 2.0);
        let expected = source.get_pixel(3, 0).0;
        assert_eq!(output.get_pixel(0, 0).0, [255 - expected[0], 255 - expected[1], 255, 255]);
    }
}
