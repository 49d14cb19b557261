use log::warn;
use serde::{Deserialize, Serialize};

use crate::tool::BRUSH_SIZE_RANGE;

/// Hard bounds of the view scale; configs may narrow them but never widen them.
pub const SCALE_LIMITS: std::ops::RangeInclusive<f32> = 0.1..=5.0;

/// Tunables for one editor instance.
///
/// The host app persists this alongside its tool settings; missing fields
/// fall back to the defaults when older state is restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Multiplier applied per discrete zoom input.
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Brush size used when a session starts, in image pixels.
    pub default_brush_size: u32,
    /// Maximum number of undoable commands kept per session.
    pub history_limit: usize,
    /// RGBA tint of the selection in the composite overlay.
    pub selection_tint: [u8; 4],
    /// Gaussian sigma used by the blur filter preset.
    pub blur_sigma: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            min_scale: 0.1,
            max_scale: 5.0,
            default_brush_size: 20,
            history_limit: 100,
            selection_tint: [0, 0, 0, 128],
            blur_sigma: 2.0,
        }
    }
}

impl EditorConfig {
    /// Replaces values that would break the viewport or history invariants.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let (lower, upper) = (*SCALE_LIMITS.start(), *SCALE_LIMITS.end());
        let bound = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.clamp(lower, upper)
            } else {
                fallback
            }
        };

        let mut min_scale = bound(self.min_scale, defaults.min_scale);
        let mut max_scale = bound(self.max_scale, defaults.max_scale);
        if min_scale > max_scale {
            std::mem::swap(&mut min_scale, &mut max_scale);
        }

        let zoom_step = if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
            self.zoom_step
        } else {
            defaults.zoom_step
        };
        let blur_sigma = if self.blur_sigma.is_finite() && self.blur_sigma > 0.0 {
            self.blur_sigma
        } else {
            defaults.blur_sigma
        };

        let sanitized = Self {
            zoom_step,
            min_scale,
            max_scale,
            default_brush_size: self
                .default_brush_size
                .clamp(*BRUSH_SIZE_RANGE.start(), *BRUSH_SIZE_RANGE.end()),
            history_limit: self.history_limit.max(1),
            selection_tint: self.selection_tint,
            blur_sigma,
        };
        if sanitized != self {
            warn!("Adjusted editor config {self:?} to {sanitized:?}");
        }
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"zoom_step": 1.25}"#).unwrap();
        assert_eq!(config.zoom_step, 1.25);
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.default_brush_size, 20);
    }

    #[test]
    fn test_defaults_survive_sanitizing() {
        assert_eq!(EditorConfig::default().sanitized(), EditorConfig::default());
    }

    #[test]
    fn test_inverted_scale_bounds_are_reordered() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"min_scale": 4.0, "max_scale": 0.5}"#).unwrap();
        let config = config.sanitized();
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 4.0);
    }

    #[test]
    fn test_hostile_values_fall_back() {
        let config = EditorConfig {
            zoom_step: 0.5,
            min_scale: 0.01,
            max_scale: 50.0,
            default_brush_size: 0,
            history_limit: 0,
            blur_sigma: f32::NAN,
            ..EditorConfig::default()
        }
        .sanitized();

        assert_eq!(config.zoom_step, 1.1);
        assert_eq!(config.min_scale, 0.1);
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.default_brush_size, 1);
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.blur_sigma, 2.0);

        let config = EditorConfig {
            zoom_step: f32::INFINITY,
            min_scale: f32::NAN,
            ..EditorConfig::default()
        }
        .sanitized();
        assert_eq!(config.zoom_step, 1.1);
        assert_eq!(config.min_scale, 0.1);
    }
}
