use egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::geometry::Affine;

/// Smallest crop, in pixels, along either axis.
pub const MIN_CROP_SIZE: f32 = 10.0;

/// A rectangle dragged out by the select tool, in image space.
///
/// Width and height keep the drag direction (they may be negative) and are
/// only normalized when the rectangle is rendered or exported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SelectionRect {
    /// Rectangle spanned by a fixed drag start and the live end point.
    pub fn from_drag(start: Pos2, end: Pos2) -> Self {
        Self {
            x: start.x,
            y: start.y,
            width: end.x - start.x,
            height: end.y - start.y,
        }
    }

    pub fn normalized(&self) -> Rect {
        Rect::from_two_pos(pos2(self.x, self.y), pos2(self.x + self.width, self.y + self.height))
    }

    pub fn has_area(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }

    /// Maps the rectangle into another image space. Exact for flips and
    /// quarter turns; for other angles the result is the bounding box.
    pub fn transformed(&self, map: &Affine) -> Self {
        let bounds = map.map_rect_bounds(self.normalized());
        if !map.preserves_axes() {
            log::warn!("Selection re-mapped through a non-axis-aligned transform; using its bounding box");
        }
        Self::from_rect(bounds)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

/// A crop box in display space (after flip and rotation, before crop).
///
/// Always whole pixels and at least [`MIN_CROP_SIZE`] on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl CropRect {
    /// Builds a crop from any two corners, snapped to whole pixels.
    pub fn new(rect: Rect) -> EditorResult<Self> {
        let min = rect.min.round();
        let max = rect.max.round();
        let candidate = Self {
            x: min.x.min(max.x),
            y: min.y.min(max.y),
            width: (max.x - min.x).abs(),
            height: (max.y - min.y).abs(),
        };
        candidate.validated()
    }

    /// The whole of an image of the given size.
    pub fn full(size: [u32; 2]) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size[0] as f32,
            height: size[1] as f32,
        }
    }

    /// Intersects the crop with an image of the given size, rejecting what
    /// is left if it falls below the minimum.
    pub fn clipped_to(&self, size: [u32; 2]) -> EditorResult<Self> {
        let bounds = Rect::from_min_size(Pos2::ZERO, vec2(size[0] as f32, size[1] as f32));
        let clipped = self.rect().intersect(bounds);
        Self {
            x: clipped.min.x,
            y: clipped.min.y,
            width: clipped.width().max(0.0),
            height: clipped.height().max(0.0),
        }
        .validated()
    }

    fn validated(self) -> EditorResult<Self> {
        if self.width < MIN_CROP_SIZE || self.height < MIN_CROP_SIZE {
            return Err(EditorError::InvalidCrop {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn min(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.min(), self.size())
    }

    /// Output size in whole pixels.
    pub fn pixel_size(&self) -> [u32; 2] {
        [self.width as u32, self.height as u32]
    }
}
