use std::ops::Range;

use egui::{Pos2, Rect, pos2};
use image::{ImageBuffer, Pixel};

use super::{BlendMode, Buffer, Renderer};
use crate::geometry::{self, Affine};

/// Software renderer writing straight into an `image` buffer.
///
/// Coverage is binary (no anti-aliasing), so rendering the same primitives
/// always produces bit-identical output.
pub struct RasterRenderer<P: Pixel> {
    target: Buffer<P>,
    cleared: P,
}

impl<P: Pixel> RasterRenderer<P> {
    /// A `width`×`height` target filled with `background`. `cleared` is the
    /// value written by [`BlendMode::Clear`].
    pub fn new(width: u32, height: u32, background: P, cleared: P) -> Self {
        Self {
            target: ImageBuffer::from_pixel(width, height, background),
            cleared,
        }
    }

    pub fn image(&self) -> &Buffer<P> {
        &self.target
    }

    pub fn into_image(self) -> Buffer<P> {
        self.target
    }

    fn resolve(&self, mode: BlendMode<P>) -> P {
        match mode {
            BlendMode::Paint(pixel) => pixel,
            BlendMode::Clear => self.cleared,
        }
    }

    fn draw_capsule(&mut self, a: Pos2, b: Pos2, radius: f32, pixel: P) {
        let bounds = geometry::calculate_bounds(&[a, b], radius);
        let xs = candidate_span(bounds.min.x, bounds.max.x, self.target.width());
        let ys = candidate_span(bounds.min.y, bounds.max.y, self.target.height());
        for y in ys {
            for x in xs.clone() {
                let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
                if geometry::distance_to_line_segment(center, a, b) <= radius {
                    self.target.put_pixel(x, y, pixel);
                }
            }
        }
    }
}

impl<P: Pixel> Renderer for RasterRenderer<P> {
    type Pixel = P;

    fn draw_polyline(&mut self, points: &[Pos2], width: f32, mode: BlendMode<P>) {
        let pixel = self.resolve(mode);
        let radius = width / 2.0;
        match points {
            [] => {}
            [single] => self.draw_capsule(*single, *single, radius, pixel),
            _ => {
                // Every segment is a capsule; their union gives round joins.
                for segment in points.windows(2) {
                    self.draw_capsule(segment[0], segment[1], radius, pixel);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, mode: BlendMode<P>) {
        let pixel = self.resolve(mode);
        let xs = center_span(rect.min.x, rect.max.x, self.target.width());
        let ys = center_span(rect.min.y, rect.max.y, self.target.height());
        for y in ys {
            for x in xs.clone() {
                self.target.put_pixel(x, y, pixel);
            }
        }
    }

    fn draw_image(&mut self, image: &Buffer<P>, transform: &Affine) {
        let Some(inverse) = transform.inverse() else {
            log::warn!("Skipping draw_image with a degenerate transform");
            return;
        };
        let source_rect = Rect::from_min_max(
            Pos2::ZERO,
            pos2(image.width() as f32, image.height() as f32),
        );
        let bounds = transform.map_rect_bounds(source_rect);
        let xs = candidate_span(bounds.min.x, bounds.max.x, self.target.width());
        let ys = candidate_span(bounds.min.y, bounds.max.y, self.target.height());

        for y in ys {
            for x in xs.clone() {
                // Nearest neighbour: sample the source pixel under this centre
                let src = inverse.apply(pos2(x as f32 + 0.5, y as f32 + 0.5));
                let (sx, sy) = (src.x.floor(), src.y.floor());
                if sx < 0.0 || sy < 0.0 || sx >= image.width() as f32 || sy >= image.height() as f32 {
                    continue;
                }
                self.target.put_pixel(x, y, *image.get_pixel(sx as u32, sy as u32));
            }
        }
    }
}

/// Pixel indices that might have their centre within `[min, max]`.
fn candidate_span(min: f32, max: f32, limit: u32) -> Range<u32> {
    if !min.is_finite() || !max.is_finite() {
        return 0..0;
    }
    let lo = (min.floor() as i64).clamp(0, limit as i64);
    let hi = (max.ceil() as i64 + 1).clamp(0, limit as i64);
    lo as u32..hi as u32
}

/// Pixel indices whose centre lies in `[min, max)`.
fn center_span(min: f32, max: f32, limit: u32) -> Range<u32> {
    let lo = ((min - 0.5).ceil() as i64).clamp(0, limit as i64);
    let hi = ((max - 0.5).ceil() as i64).clamp(0, limit as i64);
    lo as u32..hi.max(lo) as u32
}
