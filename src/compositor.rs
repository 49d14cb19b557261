//! Replays a [`MaskDocument`] into bitmaps.
//!
//! The mask is white (preserve) with black (regenerate) paint; the overlay is
//! the coloured, semi-transparent version shown on top of the image.

use image::{GrayImage, Luma, Rgba, RgbaImage, imageops};

use crate::document::MaskDocument;
use crate::render::{BlendMode, RasterRenderer, Renderer};
use crate::stroke::Stroke;

pub const MASK_PRESERVE: Luma<u8> = Luma([255]);
pub const MASK_REGENERATE: Luma<u8> = Luma([0]);

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Black-on-white mask of the document at the given size.
pub fn render_mask(size: [u32; 2], document: &MaskDocument) -> GrayImage {
    let mut renderer = RasterRenderer::new(size[0], size[1], MASK_PRESERVE, MASK_PRESERVE);
    replay(&mut renderer, document, |_| MASK_REGENERATE, MASK_REGENERATE);
    renderer.into_image()
}

/// Transparent overlay: brush strokes in their own colour, the selection in
/// `selection_tint`.
pub fn render_overlay(size: [u32; 2], document: &MaskDocument, selection_tint: [u8; 4]) -> RgbaImage {
    let mut renderer = RasterRenderer::new(size[0], size[1], TRANSPARENT, TRANSPARENT);
    replay(
        &mut renderer,
        document,
        |stroke| Rgba(stroke.color().to_srgba_unmultiplied()),
        Rgba(selection_tint),
    );
    renderer.into_image()
}

/// Blends `overlay` over `base` in place. Both must share a size.
pub fn composite(base: &mut RgbaImage, overlay: &RgbaImage) {
    imageops::overlay(base, overlay, 0, 0);
}

/// Strokes committed before the selection, the selection fill, then the
/// strokes committed after it.
fn replay<R, F>(renderer: &mut R, document: &MaskDocument, stroke_pixel: F, selection_pixel: R::Pixel)
where
    R: Renderer,
    F: Fn(&Stroke) -> R::Pixel,
{
    let (before, after) = document.strokes_around_selection();
    for stroke in before {
        draw_stroke(renderer, stroke, &stroke_pixel);
    }
    if let Some(selection) = document.selection() {
        renderer.fill_rect(selection.normalized(), BlendMode::Paint(selection_pixel));
    }
    for stroke in after {
        draw_stroke(renderer, stroke, &stroke_pixel);
    }
}

fn draw_stroke<R, F>(renderer: &mut R, stroke: &Stroke, stroke_pixel: &F)
where
    R: Renderer,
    F: Fn(&Stroke) -> R::Pixel,
{
    let mode = if stroke.is_eraser() {
        BlendMode::Clear
    } else {
        BlendMode::Paint(stroke_pixel(stroke))
    };
    renderer.draw_polyline(stroke.points(), stroke.brush_size() as f32, mode);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionRect;
    use crate::stroke::StrokeKind;
    use egui::{Color32, Pos2, pos2};

    fn brush(points: &[Pos2], size: u32) -> Stroke {
        Stroke::new(StrokeKind::Brush, size, Color32::RED, points.to_vec())
    }

    fn eraser(points: &[Pos2], size: u32) -> Stroke {
        Stroke::new(StrokeKind::Eraser, size, Color32::WHITE, points.to_vec())
    }

    fn count(mask: &GrayImage, value: Luma<u8>) -> usize {
        mask.pixels().filter(|p| **p == value).count()
    }

    #[test]
    fn test_empty_document_is_all_white() {
        let mask = render_mask([64, 32], &MaskDocument::new());
        assert_eq!(mask.dimensions(), (64, 32));
        assert_eq!(count(&mask, MASK_PRESERVE), 64 * 32);
    }

    #[test]
    fn test_eraser_after_brush_cuts_corridor() {
        let mut document = MaskDocument::new();
        document.add_stroke(brush(&[pos2(0.0, 32.0), pos2(64.0, 32.0)], 20));
        document.add_stroke(eraser(&[pos2(32.0, 0.0), pos2(32.0, 64.0)], 6));
        let mask = render_mask([64, 64], &document);

        assert_eq!(mask.get_pixel(10, 32), &MASK_REGENERATE);
        assert_eq!(mask.get_pixel(32, 32), &MASK_PRESERVE);
        assert_eq!(mask.get_pixel(10, 5), &MASK_PRESERVE);
    }

    #[test]
    fn test_stroke_order_matters() {
        let line = [pos2(0.0, 16.0), pos2(32.0, 16.0)];

        let mut brush_last = MaskDocument::new();
        brush_last.add_stroke(eraser(&line, 8));
        brush_last.add_stroke(brush(&line, 8));

        let mut eraser_last = MaskDocument::new();
        eraser_last.add_stroke(brush(&line, 8));
        eraser_last.add_stroke(eraser(&line, 8));

        let painted = render_mask([32, 32], &brush_last);
        let erased = render_mask([32, 32], &eraser_last);
        assert_eq!(painted.get_pixel(16, 16), &MASK_REGENERATE);
        assert_eq!(erased.get_pixel(16, 16), &MASK_PRESERVE);
    }

    #[test]
    fn test_selection_covers_earlier_erasers() {
        let mut document = MaskDocument::new();
        document.add_stroke(eraser(&[pos2(20.0, 0.0), pos2(20.0, 40.0)], 10));
        let placed = document.place_selection(SelectionRect::from_drag(pos2(30.0, 30.0), pos2(10.0, 10.0)));
        document.set_selection(Some(placed));
        let mask = render_mask([40, 40], &document);

        assert_eq!(count(&mask, MASK_REGENERATE), 20 * 20);
        assert_eq!(mask.get_pixel(20, 20), &MASK_REGENERATE);
    }

    #[test]
    fn test_later_eraser_cuts_selection() {
        let mut document = MaskDocument::new();
        let placed = document.place_selection(SelectionRect::from_drag(pos2(0.0, 0.0), pos2(40.0, 40.0)));
        document.set_selection(Some(placed));
        document.add_stroke(eraser(&[pos2(20.0, 0.0), pos2(20.0, 40.0)], 4));
        let mask = render_mask([40, 40], &document);

        assert_eq!(mask.get_pixel(20, 20), &MASK_PRESERVE);
        assert_eq!(mask.get_pixel(5, 20), &MASK_REGENERATE);
        assert_eq!(mask.get_pixel(35, 20), &MASK_REGENERATE);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut document = MaskDocument::new();
        document.add_stroke(brush(&[pos2(3.3, 4.7), pos2(50.1, 20.9), pos2(12.0, 60.0)], 13));
        document.add_stroke(eraser(&[pos2(0.0, 0.0), pos2(64.0, 64.0)], 7));
        assert_eq!(render_mask([64, 64], &document), render_mask([64, 64], &document));
    }

    #[test]
    fn test_overlay_uses_stroke_colour_and_tint() {
        let mut document = MaskDocument::new();
        document.add_stroke(brush(&[pos2(5.0, 5.0)], 4));
        let placed = document.place_selection(SelectionRect::from_drag(pos2(20.0, 20.0), pos2(30.0, 30.0)));
        document.set_selection(Some(placed));
        let overlay = render_overlay([32, 32], &document, [0, 0, 0, 128]);

        assert_eq!(overlay.get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
        assert_eq!(overlay.get_pixel(25, 25), &Rgba([0, 0, 0, 128]));
        assert_eq!(overlay.get_pixel(15, 15), &TRANSPARENT);
    }

    #[test]
    fn test_composite_blends_overlay() {
        let mut base = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let mut overlay = RgbaImage::from_pixel(2, 1, TRANSPARENT);
        overlay.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        composite(&mut base, &overlay);
        assert_eq!(base.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(base.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
    }
}
