use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::stroke::StrokeKind;

pub const BRUSH_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// The active editing tool. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Brush,
    Eraser,
    Select,
    Crop,
}

impl ToolMode {
    pub const ALL: [ToolMode; 4] = [ToolMode::Brush, ToolMode::Eraser, ToolMode::Select, ToolMode::Crop];

    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Brush => "Brush",
            ToolMode::Eraser => "Eraser",
            ToolMode::Select => "Select",
            ToolMode::Crop => "Crop",
        }
    }

    /// Stroke kind recorded by this tool, if it paints at all.
    pub fn stroke_kind(&self) -> Option<StrokeKind> {
        match self {
            ToolMode::Brush => Some(StrokeKind::Brush),
            ToolMode::Eraser => Some(StrokeKind::Eraser),
            ToolMode::Select | ToolMode::Crop => None,
        }
    }
}

/// Brush settings shared by the brush and eraser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    brush_size: u32,
    color: Color32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            brush_size: 20,
            color: Color32::BLACK,
        }
    }
}

impl ToolSettings {
    pub fn with_brush_size(brush_size: u32) -> Self {
        let mut settings = Self::default();
        settings.set_brush_size(brush_size);
        settings
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(*BRUSH_SIZE_RANGE.start(), *BRUSH_SIZE_RANGE.end());
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }
}

/// Which layers are shown and included in the composite export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub image: bool,
    pub mask: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self { image: true, mask: true }
    }
}
