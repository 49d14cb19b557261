//! Backend-neutral drawing interface used by the compositor and pipeline.

use egui::{Pos2, Rect};
use image::{ImageBuffer, Pixel};

use crate::geometry::Affine;

mod raster;

pub use raster::RasterRenderer;

/// Pixel buffer type drawn into by renderers.
pub type Buffer<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// How a primitive combines with what is already in the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendMode<P> {
    /// Replace covered pixels with this value.
    Paint(P),
    /// Remove whatever was painted, restoring the target's cleared value
    /// (white for a mask, transparent for an overlay).
    Clear,
}

/// Minimal 2-D drawing surface.
pub trait Renderer {
    type Pixel: Pixel;

    /// Round-capped, round-joined polyline of the given width. A single point
    /// draws a dot.
    fn draw_polyline(&mut self, points: &[Pos2], width: f32, mode: BlendMode<Self::Pixel>);

    /// Fills a rectangle; pixels whose centres fall inside are covered.
    fn fill_rect(&mut self, rect: Rect, mode: BlendMode<Self::Pixel>);

    /// Draws `image` after mapping its pixel space through `transform`.
    /// Target pixels not covered by the mapped image are left untouched.
    fn draw_image(&mut self, image: &Buffer<Self::Pixel>, transform: &Affine);
}
