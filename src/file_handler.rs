use std::path::Path;

use egui::{Align2, Color32, Id, LayerId, Order};

use crate::loader::{BlobSupplier, ImageRequest};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turns files dropped onto the window into image requests.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns a request for the first image dropped this frame. Files that
    /// arrive with their bytes (always on the web) are parked in `blobs`;
    /// native drops are read from their path.
    pub fn take_dropped_image(&self, ctx: &egui::Context, blobs: &mut BlobSupplier) -> Option<ImageRequest> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let file_name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "unknown".to_owned()
            };

            if !is_image_file(&file.mime, file.path.as_deref().or(Some(Path::new(&file.name)))) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            let request = if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                ImageRequest::new(blobs.insert(bytes.to_vec()))
            } else if let Some(path) = &file.path {
                log::info!("Processing image from path: {}", path.display());
                ImageRequest::new(path.display().to_string())
            } else {
                log::warn!("Dropped file has no accessible data: {}", file_name);
                continue;
            };

            return Some(request);
        }
        None
    }

    /// Shades the window while files are dragged over it.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to edit:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Checks the MIME type, falling back to the file extension.
fn is_image_file(mime: &str, path: Option<&Path>) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    path.and_then(Path::extension)
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_wins_over_extension() {
        assert!(is_image_file("image/png", Some(Path::new("notes.txt"))));
        assert!(!is_image_file("text/plain", Some(Path::new("photo.png"))));
    }

    #[test]
    fn test_extension_fallback() {
        assert!(is_image_file("", Some(Path::new("/tmp/Photo.JPG"))));
        assert!(!is_image_file("", Some(Path::new("/tmp/archive.zip"))));
        assert!(!is_image_file("", Some(Path::new("no_extension"))));
        assert!(!is_image_file("", None));
    }
}
