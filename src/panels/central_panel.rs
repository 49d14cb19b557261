use egui::{Align2, Color32, FontId, PointerButton, Pos2, Rect, Response, Sense, Shape, Stroke, pos2};

use crate::MaskEditorApp;
use crate::selection::CropRect;
use crate::state::EditorState;
use crate::stroke::StrokeKind;
use crate::texture_manager::{TextureGenerationError, TextureManager, TextureSlot, to_color_image};
use crate::viewport::ZoomDirection;
use crate::widgets::CropHandles;

const CANVAS_BACKGROUND: Color32 = Color32::from_gray(24);
const ERASER_PREVIEW: Color32 = Color32::from_rgba_premultiplied(110, 110, 110, 110);
const SELECTION_PREVIEW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 96);
const CROP_HANDLE_SIZE: f32 = 10.0;

pub fn central_panel(app: &mut MaskEditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (editor, textures) = app.canvas_parts();

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        editor.set_container_size(rect.size());
        painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

        if !editor.has_image() {
            let text = if editor.is_loading() {
                "Loading image…"
            } else {
                "Drop an image here or open one from the side panel"
            };
            painter.text(rect.center(), Align2::CENTER_CENTER, text, FontId::proportional(16.0), Color32::GRAY);
            return;
        }

        handle_input(editor, ui, &response);
        paint_layers(editor, textures, &painter, rect.min, ctx);
        paint_gesture_preview(editor, &painter, rect.min);
        if editor.interaction().is_cropping() {
            show_crop_handles(editor, ui, rect.min);
        }
    });
}

/// Editor coordinates are relative to the canvas widget.
fn to_local(origin: Pos2, pos: Pos2) -> Pos2 {
    (pos - origin).to_pos2()
}

fn to_widget(origin: Pos2, pos: Pos2) -> Pos2 {
    origin + pos.to_vec2()
}

fn handle_input(editor: &mut EditorState, ui: &egui::Ui, response: &Response) {
    let origin = response.rect.min;

    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let direction = if scroll > 0.0 { ZoomDirection::In } else { ZoomDirection::Out };
            editor.zoom_at(to_local(origin, hover), direction);
        }
    }

    if response.dragged_by(PointerButton::Middle) {
        editor.pan_by(response.drag_delta());
        return;
    }

    let latest = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.latest_pos()));

    if response.clicked() {
        if let Some(pos) = latest {
            let pos = to_local(origin, pos);
            editor.pointer_down(pos);
            editor.pointer_up(pos);
        }
        return;
    }

    if response.drag_started_by(PointerButton::Primary) {
        let start = ui.input(|i| i.pointer.press_origin()).or(latest);
        if let Some(start) = start {
            editor.pointer_down(to_local(origin, start));
        }
    }
    if response.dragged_by(PointerButton::Primary) {
        if let Some(pos) = latest {
            editor.pointer_move(to_local(origin, pos));
        }
    }
    if response.drag_stopped_by(PointerButton::Primary) {
        if let Some(pos) = latest {
            editor.pointer_up(to_local(origin, pos));
        }
    }
}

fn paint_layers(
    editor: &EditorState,
    textures: &mut TextureManager,
    painter: &egui::Painter,
    origin: Pos2,
    ctx: &egui::Context,
) {
    let Some(image_rect) = editor.viewport().image_screen_rect() else {
        return;
    };
    let screen_rect = image_rect.translate(origin.to_vec2());
    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    let layers = editor.layers();

    if layers.image {
        let texture = textures.get_or_create_texture(
            TextureSlot::Image,
            editor.image_revision(),
            || {
                let image = editor.display_image().ok_or(TextureGenerationError::Unavailable)?;
                to_color_image(&image)
            },
            ctx,
        );
        match texture {
            Ok(id) => {
                painter.image(id, screen_rect, uv, Color32::WHITE);
            }
            Err(err) => log::warn!("Cannot show image: {err}"),
        }
    }

    if layers.mask {
        let texture = textures.get_or_create_texture(
            TextureSlot::Overlay,
            editor.overlay_revision(),
            || {
                let overlay = editor.overlay_image().ok_or(TextureGenerationError::Unavailable)?;
                to_color_image(&overlay)
            },
            ctx,
        );
        match texture {
            Ok(id) => {
                painter.image(id, screen_rect, uv, Color32::WHITE);
            }
            Err(err) => log::warn!("Cannot show mask: {err}"),
        }
    }
}

/// Draws what the pointer is doing before it is committed.
fn paint_gesture_preview(editor: &EditorState, painter: &egui::Painter, origin: Pos2) {
    if let Some(stroke) = editor.active_stroke() {
        let points: Vec<Pos2> = stroke
            .points()
            .iter()
            .filter_map(|point| editor.source_to_screen(*point))
            .map(|point| to_widget(origin, point))
            .collect();
        let width = stroke.brush_size() as f32 * editor.viewport().scale();
        let color = match stroke.kind() {
            StrokeKind::Brush => stroke.color(),
            StrokeKind::Eraser => ERASER_PREVIEW,
        };

        if let [first, .., last] = points.as_slice() {
            painter.circle_filled(*first, width / 2.0, color);
            painter.circle_filled(*last, width / 2.0, color);
            painter.add(Shape::line(points.clone(), Stroke::new(width, color)));
        } else if let [only] = points.as_slice() {
            painter.circle_filled(*only, width / 2.0, color);
        }
    }

    if let Some(selection) = editor.live_selection_screen_rect() {
        let selection = selection.translate(origin.to_vec2());
        painter.rect_filled(selection, 0.0, SELECTION_PREVIEW);
        painter.rect_stroke(selection, 0.0, Stroke::new(1.0, Color32::WHITE));
    }
}

fn show_crop_handles(editor: &mut EditorState, ui: &mut egui::Ui, origin: Pos2) {
    let Some(image_rect) = editor.viewport().image_screen_rect() else {
        return;
    };
    let Some(display_size) = editor.display_size() else {
        return;
    };
    let viewport = editor.viewport();
    let crop = editor
        .crop_rect()
        .copied()
        .unwrap_or_else(|| CropRect::full(display_size))
        .rect();
    let crop = Rect::from_min_max(viewport.image_to_screen(crop.min), viewport.image_to_screen(crop.max));

    let handles = CropHandles::new(
        crop.translate(origin.to_vec2()),
        image_rect.translate(origin.to_vec2()),
        CROP_HANDLE_SIZE,
    );
    let Some(dragged) = handles.show(ui) else {
        return;
    };

    let display = Rect::from_two_pos(
        viewport.screen_to_image(to_local(origin, dragged.min)),
        viewport.screen_to_image(to_local(origin, dragged.max)),
    );
    // Too small boxes are rejected and the previous one stays
    if let Err(err) = editor.set_crop_rect(display) {
        log::debug!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{LayerId, RawInput, vec2};
    use image::{Rgba, RgbaImage};

    fn paint_once(editor: &EditorState, textures: &mut TextureManager) -> usize {
        let ctx = egui::Context::default();
        let output = ctx.run(RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(LayerId::background());
            paint_layers(editor, textures, &painter, Pos2::ZERO, ctx);
        });
        output.shapes.len()
    }

    #[test]
    fn test_paint_layers_uploads_visible_layers() {
        let mut editor = EditorState::default();
        editor
            .load_image(RgbaImage::from_pixel(16, 8, Rgba([10, 20, 30, 255])))
            .unwrap();
        editor.set_container_size(vec2(64.0, 64.0));
        let mut textures = TextureManager::default();

        assert_eq!(paint_once(&editor, &mut textures), 2);
        assert_eq!(textures.cache_size(), 2);

        editor.set_mask_visible(false);
        assert_eq!(paint_once(&editor, &mut textures), 1);
    }

    #[test]
    fn test_paint_layers_without_image_draws_nothing() {
        let editor = EditorState::default();
        let mut textures = TextureManager::default();

        assert_eq!(paint_once(&editor, &mut textures), 0);
        assert_eq!(textures.cache_size(), 0);
    }
}
