use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Affine};

/// Whether a stroke adds to the mask or removes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeKind {
    Brush,
    Eraser,
}

// Immutable stroke, committed to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    kind: StrokeKind,
    points: Vec<Pos2>,
    brush_size: u32,
    color: Color32,
}

// Mutable stroke for the gesture in progress
#[derive(Debug, Clone, PartialEq)]
pub struct MutableStroke {
    kind: StrokeKind,
    points: Vec<Pos2>,
    brush_size: u32,
    color: Color32,
}

impl Stroke {
    pub fn new(kind: StrokeKind, brush_size: u32, color: Color32, points: Vec<Pos2>) -> Self {
        Self {
            kind,
            points,
            brush_size: brush_size.max(1),
            color,
        }
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Paint colour; meaningless for eraser strokes.
    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn is_eraser(&self) -> bool {
        self.kind == StrokeKind::Eraser
    }

    /// Area touched by the stroke, including the round caps.
    pub fn bounds(&self) -> Rect {
        geometry::calculate_bounds(&self.points, self.brush_size as f32 / 2.0)
    }

    /// Re-expresses the stroke in another image space. Only valid for
    /// isometries (flip, rotate, translate), which keep the width meaningful.
    pub fn transformed(&self, map: &Affine) -> Stroke {
        Stroke {
            points: self.points.iter().map(|p| map.apply(*p)).collect(),
            ..self.clone()
        }
    }
}

impl MutableStroke {
    pub fn new(kind: StrokeKind, brush_size: u32, color: Color32) -> Self {
        Self {
            kind,
            points: Vec::new(),
            brush_size: brush_size.max(1),
            color,
        }
    }

    // Amortized O(1): only the new point is touched
    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// The segment added by the latest point, for incremental redraw.
    pub fn last_segment(&self) -> Option<[Pos2; 2]> {
        match self.points.as_slice() {
            [.., a, b] => Some([*a, *b]),
            [a] => Some([*a, *a]),
            [] => None,
        }
    }

    pub fn into_stroke(self) -> Stroke {
        Stroke::new(self.kind, self.brush_size, self.color, self.points)
    }
}
