use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("nothing to show yet")]
    Unavailable,
    #[error("invalid texture dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// The images the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// The pipeline output
    Image,
    /// Committed strokes and selection
    Overlay,
}

impl TextureSlot {
    fn name(&self) -> &'static str {
        match self {
            TextureSlot::Image => "image",
            TextureSlot::Overlay => "overlay",
        }
    }
}

type CacheKey = (TextureSlot, u64);

/// Caches uploaded textures by (slot, revision), evicting the least
/// recently used ones.
pub struct TextureManager {
    texture_cache: HashMap<CacheKey, TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<CacheKey, u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    max_cache_size: usize,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(8)
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Returns the texture for `slot` at `revision`, running `generator` only
    /// on a cache miss.
    pub fn get_or_create_texture<F>(
        &mut self,
        slot: TextureSlot,
        revision: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (slot, revision);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        let image = generator()?;
        let name = format!("{}_r{}", slot.name(), revision);
        let handle = ctx.load_texture(&name, image, TextureOptions::NEAREST);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);
        self.prune_cache_if_needed();

        Ok(handle.id())
    }

    /// Drops every cached revision of `slot`.
    pub fn invalidate_slot(&mut self, slot: TextureSlot) {
        self.texture_cache.retain(|(cached, _), _| *cached != slot);
        self.last_used.retain(|(cached, _), _| *cached != slot);
    }

    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        // Oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn get_texture(&self, slot: TextureSlot, revision: u64) -> Option<&TextureHandle> {
        self.texture_cache.get(&(slot, revision))
    }
}

/// Converts an `image` buffer into something egui can upload.
pub fn to_color_image(image: &RgbaImage) -> Result<ColorImage, TextureGenerationError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions(width, height));
    }
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        image.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_texture_generator() -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        let first = manager
            .get_or_create_texture(TextureSlot::Image, 1, mock_texture_generator, &ctx)
            .unwrap();
        let second = manager
            .get_or_create_texture(TextureSlot::Image, 1, || Err(TextureGenerationError::Unavailable), &ctx)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_invalidation() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        manager.get_or_create_texture(TextureSlot::Image, 1, mock_texture_generator, &ctx).unwrap();
        manager.get_or_create_texture(TextureSlot::Overlay, 1, mock_texture_generator, &ctx).unwrap();

        manager.invalidate_slot(TextureSlot::Image);

        assert_eq!(manager.cache_size(), 1);
        assert!(manager.get_texture(TextureSlot::Overlay, 1).is_some());
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);

        manager.get_or_create_texture(TextureSlot::Image, 1, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(TextureSlot::Image, 2, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(TextureSlot::Overlay, 1, mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(manager.get_texture(TextureSlot::Image, 1).is_none());
        assert!(manager.get_texture(TextureSlot::Image, 2).is_some());
        assert!(manager.get_texture(TextureSlot::Overlay, 1).is_some());
    }

    #[test]
    fn test_generator_errors_are_not_cached() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        let result = manager.get_or_create_texture(
            TextureSlot::Overlay,
            3,
            || Err(TextureGenerationError::Unavailable),
            &ctx,
        );
        assert!(result.is_err());
        assert_eq!(manager.cache_size(), 0);
    }

    #[test]
    fn test_color_image_conversion() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let color = to_color_image(&image).unwrap();
        assert_eq!(color.size, [3, 2]);
        assert!(to_color_image(&RgbaImage::new(0, 0)).is_err());
    }
}
