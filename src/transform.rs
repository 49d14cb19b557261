//! Non-destructive image transforms: flip, rotate, crop and colour settings.
//!
//! [`TransformState`] only records what the user asked for. The geometric
//! part is turned into an [`Affine`] map by [`TransformState::geometry`]; the
//! pipeline applies it to the source on demand.

use egui::{Rect, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::Affine;
use crate::selection::CropRect;

pub const ADJUSTMENT_RANGE: std::ops::RangeInclusive<i32> = -100..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterPreset {
    #[default]
    None,
    Grayscale,
    Sepia,
    Blur,
    Invert,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 5] = [
        FilterPreset::None,
        FilterPreset::Grayscale,
        FilterPreset::Sepia,
        FilterPreset::Blur,
        FilterPreset::Invert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterPreset::None => "None",
            FilterPreset::Grayscale => "Grayscale",
            FilterPreset::Sepia => "Sepia",
            FilterPreset::Blur => "Blur",
            FilterPreset::Invert => "Invert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformState {
    rotation_degrees: i32,
    flipped_x: bool,
    flipped_y: bool,
    filter: FilterPreset,
    brightness: i32,
    contrast: i32,
    saturation: i32,
    crop: Option<CropRect>,
}

/// The geometric part of a [`TransformState`] resolved for one source size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricTransform {
    /// Source pixel space to output pixel space.
    pub to_output: Affine,
    /// Output pixel space back to source pixel space.
    pub from_output: Affine,
    pub output_size: [u32; 2],
}

impl GeometricTransform {
    pub fn identity(size: [u32; 2]) -> Self {
        Self {
            to_output: Affine::IDENTITY,
            from_output: Affine::IDENTITY,
            output_size: size,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.to_output == Affine::IDENTITY
    }
}

impl TransformState {
    pub fn rotation_degrees(&self) -> i32 {
        self.rotation_degrees
    }

    pub fn flipped_x(&self) -> bool {
        self.flipped_x
    }

    pub fn flipped_y(&self) -> bool {
        self.flipped_y
    }

    pub fn filter(&self) -> FilterPreset {
        self.filter
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    pub fn saturation(&self) -> i32 {
        self.saturation
    }

    pub fn crop(&self) -> Option<&CropRect> {
        self.crop.as_ref()
    }

    pub fn rotate_right(&mut self) {
        self.set_rotation(self.rotation_degrees + 90);
    }

    pub fn rotate_left(&mut self) {
        self.set_rotation(self.rotation_degrees - 90);
    }

    /// Sets an absolute clockwise rotation; any integer is normalized to
    /// `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation_degrees = degrees.rem_euclid(360);
    }

    pub fn flip_x(&mut self) {
        self.flipped_x = !self.flipped_x;
    }

    pub fn flip_y(&mut self) {
        self.flipped_y = !self.flipped_y;
    }

    pub fn set_filter(&mut self, filter: FilterPreset) {
        self.filter = filter;
    }

    pub fn set_brightness(&mut self, value: i32) {
        self.brightness = clamp_adjustment(value);
    }

    pub fn set_contrast(&mut self, value: i32) {
        self.contrast = clamp_adjustment(value);
    }

    pub fn set_saturation(&mut self, value: i32) {
        self.saturation = clamp_adjustment(value);
    }

    pub fn set_crop(&mut self, crop: Option<CropRect>) {
        self.crop = crop;
    }

    /// Back to an untouched image.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drops flips, rotation and crop, keeping colour settings. Used once the
    /// geometry has been baked into a new source.
    pub fn reset_geometry(&mut self) {
        self.rotation_degrees = 0;
        self.flipped_x = false;
        self.flipped_y = false;
        self.crop = None;
    }

    pub fn has_geometry(&self) -> bool {
        self.rotation_degrees != 0 || self.flipped_x || self.flipped_y || self.crop.is_some()
    }

    pub fn has_color(&self) -> bool {
        self.filter != FilterPreset::None
            || self.brightness != 0
            || self.contrast != 0
            || self.saturation != 0
    }

    /// Size of the image after flip and rotation, before any crop.
    pub fn rotated_size(&self, source_size: [u32; 2]) -> [u32; 2] {
        let (sin, cos) = sin_cos(self.rotation_degrees);
        rotated_bounds(source_size, sin, cos)
    }

    /// Resolves flip, rotation and (optionally) crop for a source of the
    /// given size.
    ///
    /// Order: flip about the image, rotate clockwise about the centre into
    /// the rotated bounding box, then crop.
    pub fn geometry(&self, source_size: [u32; 2], include_crop: bool) -> GeometricTransform {
        let (w, h) = (source_size[0] as f32, source_size[1] as f32);
        let (sin, cos) = sin_cos(self.rotation_degrees);
        let rotated = rotated_bounds(source_size, sin, cos);

        let flip = Affine::new(
            if self.flipped_x { -1.0 } else { 1.0 },
            0.0,
            0.0,
            if self.flipped_y { -1.0 } else { 1.0 },
            if self.flipped_x { w } else { 0.0 },
            if self.flipped_y { h } else { 0.0 },
        );
        let mut to_output = flip
            .then(Affine::translation(vec2(-w / 2.0, -h / 2.0)))
            .then(Affine::rotation(sin, cos))
            .then(Affine::translation(vec2(rotated[0] as f32 / 2.0, rotated[1] as f32 / 2.0)));
        let mut output_size = rotated;

        let crop = self.crop.as_ref().filter(|_| include_crop);
        if let Some(crop) = crop {
            match crop.clipped_to(rotated) {
                Ok(clipped) => {
                    to_output = to_output.then(Affine::translation(-clipped.min().to_vec2()));
                    output_size = clipped.pixel_size();
                }
                Err(err) => log::warn!("Ignoring crop outside the rotated image: {err}"),
            }
        }

        GeometricTransform {
            to_output,
            from_output: to_output.inverse().unwrap_or_default(),
            output_size,
        }
    }
}

fn clamp_adjustment(value: i32) -> i32 {
    value.clamp(*ADJUSTMENT_RANGE.start(), *ADJUSTMENT_RANGE.end())
}

/// Exact values for quarter turns so they stay pixel-perfect.
fn sin_cos(degrees: i32) -> (f32, f32) {
    match degrees.rem_euclid(360) {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        other => (other as f32).to_radians().sin_cos(),
    }
}

fn rotated_bounds(size: [u32; 2], sin: f32, cos: f32) -> [u32; 2] {
    let corners = Rect::from_min_max(pos2(0.0, 0.0), pos2(size[0] as f32, size[1] as f32));
    let bounds = Affine::rotation(sin, cos).map_rect_bounds(corners);
    // Shave float noise before rounding up so exact fits don't grow a pixel
    let width = (bounds.width() - 1e-3).ceil().max(1.0);
    let height = (bounds.height() - 1e-3).ceil().max(1.0);
    [width as u32, height as u32]
}
