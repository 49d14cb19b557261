//! Screen ⇄ image coordinate mapping for the editor canvas.
//!
//! `image = (screen - offset) / scale` and `screen = image * scale + offset`.
//! Until an image size is known every mapping is the identity and every
//! mutation is a no-op.

use egui::{Pos2, Vec2, pos2, vec2};
use log::debug;

use crate::config::EditorConfig;

/// Direction of one discrete zoom input (one wheel notch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
    container: Vec2,
    image_size: Option<Vec2>,
    min_scale: f32,
    max_scale: f32,
    zoom_step: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Viewport {
    pub fn new(config: &EditorConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            container: Vec2::ZERO,
            image_size: None,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_step: config.zoom_step,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn container_size(&self) -> Vec2 {
        self.container
    }

    pub fn image_size(&self) -> Option<Vec2> {
        self.image_size
    }

    /// Records the size of the widget the image is shown in. Does not refit.
    pub fn set_container_size(&mut self, size: Vec2) {
        self.container = size;
    }

    /// Shows a newly loaded (or re-shaped) image: fit without upscaling and
    /// centre it in the container.
    pub fn load(&mut self, image_size: Vec2) {
        self.image_size = Some(image_size);
        self.fit_to_container();
    }

    /// Forgets the image; the viewport becomes the identity again.
    pub fn unload(&mut self) {
        self.image_size = None;
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }

    pub fn fit_to_container(&mut self) {
        let Some(image) = self.image_size else {
            return;
        };
        if self.container.x <= 0.0 || self.container.y <= 0.0 || image.x <= 0.0 || image.y <= 0.0 {
            self.scale = 1.0;
            self.offset = Vec2::ZERO;
            return;
        }

        let fit = (self.container.x / image.x)
            .min(self.container.y / image.y)
            .min(1.0);
        self.scale = self.clamp_scale(fit);
        self.offset = (self.container - image * self.scale) / 2.0;
        debug!("Viewport fit: scale={:.3}, offset={:?}", self.scale, self.offset);
    }

    pub fn screen_to_image(&self, screen: Pos2) -> Pos2 {
        if self.image_size.is_none() {
            return screen;
        }
        ((screen.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub fn image_to_screen(&self, image: Pos2) -> Pos2 {
        if self.image_size.is_none() {
            return image;
        }
        (image.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// One zoom step centred on `pointer`: the image point under the pointer
    /// stays under the pointer.
    pub fn zoom_at(&mut self, pointer: Pos2, direction: ZoomDirection) {
        if self.image_size.is_none() {
            return;
        }
        let anchor = self.screen_to_image(pointer);
        let new_scale = match direction {
            ZoomDirection::In => self.scale * self.zoom_step,
            ZoomDirection::Out => self.scale / self.zoom_step,
        };
        self.scale = self.clamp_scale(new_scale);
        self.offset = pointer.to_vec2() - anchor.to_vec2() * self.scale;
    }

    /// Moves the image by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        if self.image_size.is_none() {
            return;
        }
        self.offset += delta;
    }

    /// Screen-space origin and extent of the image.
    pub fn image_screen_rect(&self) -> Option<egui::Rect> {
        let size = self.image_size?;
        Some(egui::Rect::from_min_max(
            self.image_to_screen(Pos2::ZERO),
            self.image_to_screen(pos2(size.x, size.y)),
        ))
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Size of an image in pixels as a vector.
pub(crate) fn size_vec(size: [u32; 2]) -> Vec2 {
    vec2(size[0] as f32, size[1] as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(container: Vec2, image: Vec2) -> Viewport {
        let mut viewport = Viewport::default();
        viewport.set_container_size(container);
        viewport.load(image);
        viewport
    }

    #[test]
    fn test_fit_downscales_and_centers() {
        let viewport = loaded(vec2(256.0, 256.0), vec2(512.0, 512.0));
        assert_eq!(viewport.scale(), 0.5);
        assert_eq!(viewport.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_fit_never_upscales() {
        let viewport = loaded(vec2(800.0, 600.0), vec2(200.0, 100.0));
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.offset(), vec2(300.0, 250.0));
    }

    #[test]
    fn test_round_trip_for_many_states() {
        let mut viewport = loaded(vec2(640.0, 480.0), vec2(1024.0, 768.0));
        let points = [pos2(0.0, 0.0), pos2(17.5, 403.25), pos2(639.0, 1.0)];
        for step in 0..12 {
            let direction = if step % 3 == 0 { ZoomDirection::Out } else { ZoomDirection::In };
            viewport.zoom_at(pos2(100.0 + step as f32 * 7.0, 50.0), direction);
            viewport.pan_by(vec2(-3.0, 11.0));
            for p in points {
                let back = viewport.screen_to_image(viewport.image_to_screen(p));
                assert!((back - p).length() < 1e-3, "{back:?} != {p:?}");
            }
        }
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = loaded(vec2(256.0, 256.0), vec2(512.0, 512.0));
        for _ in 0..100 {
            viewport.zoom_at(pos2(10.0, 10.0), ZoomDirection::In);
        }
        assert_eq!(viewport.scale(), 5.0);
        for _ in 0..200 {
            viewport.zoom_at(pos2(10.0, 10.0), ZoomDirection::Out);
            assert!(viewport.scale() >= 0.1 && viewport.scale() <= 5.0);
        }
        assert_eq!(viewport.scale(), 0.1);
    }

    #[test]
    fn test_zoom_keeps_point_under_pointer() {
        let mut viewport = loaded(vec2(256.0, 256.0), vec2(512.0, 512.0));
        let pointer = pos2(100.0, 100.0);
        let before = viewport.screen_to_image(pointer);
        viewport.zoom_at(pointer, ZoomDirection::In);
        let after = viewport.screen_to_image(pointer);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn test_zoom_in_then_out_restores_view() {
        let mut viewport = loaded(vec2(256.0, 256.0), vec2(512.0, 512.0));
        let (scale, offset) = (viewport.scale(), viewport.offset());
        viewport.zoom_at(pos2(100.0, 100.0), ZoomDirection::In);
        viewport.zoom_at(pos2(100.0, 100.0), ZoomDirection::Out);
        assert!((viewport.scale() - scale).abs() < 1e-5);
        assert!((viewport.offset() - offset).length() < 1e-3);
    }

    #[test]
    fn test_identity_without_image() {
        let mut viewport = Viewport::default();
        viewport.set_container_size(vec2(300.0, 300.0));
        viewport.zoom_at(pos2(10.0, 10.0), ZoomDirection::In);
        viewport.pan_by(vec2(5.0, 5.0));
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.screen_to_image(pos2(42.0, 7.0)), pos2(42.0, 7.0));
        assert_eq!(viewport.image_to_screen(pos2(42.0, 7.0)), pos2(42.0, 7.0));
        assert!(viewport.image_screen_rect().is_none());
    }

    #[test]
    fn test_restored_config_cannot_widen_scale_bounds() {
        let configs = [
            r#"{"min_scale": 6.0}"#,
            r#"{"min_scale": 0.01, "max_scale": 50.0}"#,
            r#"{"min_scale": 3.0, "max_scale": 0.2, "zoom_step": 0.5}"#,
        ];
        for json in configs {
            let config: EditorConfig = serde_json::from_str(json).unwrap();
            let mut viewport = Viewport::new(&config);
            viewport.set_container_size(vec2(256.0, 256.0));
            viewport.load(vec2(64.0, 64.0));

            for _ in 0..100 {
                viewport.zoom_at(pos2(10.0, 10.0), ZoomDirection::In);
                assert!(viewport.scale() >= 0.1 && viewport.scale() <= 5.0, "{json}");
            }
            for _ in 0..100 {
                viewport.zoom_at(pos2(10.0, 10.0), ZoomDirection::Out);
                assert!(viewport.scale() >= 0.1 && viewport.scale() <= 5.0, "{json}");
            }
        }
    }
}
