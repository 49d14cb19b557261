use egui::{Color32, CursorIcon, Id, Rect, Sense, Stroke, Ui, Vec2};

/// A corner of the crop box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft | Corner::BottomRight => CursorIcon::ResizeNwSe,
            Corner::TopRight | Corner::BottomLeft => CursorIcon::ResizeNeSw,
        }
    }

    pub fn position(&self, rect: Rect) -> egui::Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }

    /// Moves this corner by `delta`, keeping the opposite one fixed.
    pub fn drag(&self, rect: Rect, delta: Vec2) -> Rect {
        let moved = self.position(rect) + delta;
        let fixed = match self {
            Corner::TopLeft => rect.right_bottom(),
            Corner::TopRight => rect.left_bottom(),
            Corner::BottomLeft => rect.right_top(),
            Corner::BottomRight => rect.left_top(),
        };
        Rect::from_two_pos(moved, fixed)
    }
}

const HANDLE_COLOR: Color32 = Color32::from_rgb(30, 120, 255);

/// Crop box editor drawn over the canvas, in screen space.
pub struct CropHandles {
    rect: Rect,
    bounds: Rect,
    handle_size: f32,
}

impl CropHandles {
    /// `rect` is the current crop box, `bounds` the visible image.
    pub fn new(rect: Rect, bounds: Rect, handle_size: f32) -> Self {
        Self {
            rect,
            bounds,
            handle_size,
        }
    }

    /// Draws the box and returns the new box if the user dragged it.
    pub fn show(&self, ui: &mut Ui) -> Option<Rect> {
        self.shade_outside(ui);
        ui.painter().rect_stroke(self.rect, 0.0, Stroke::new(1.5, Color32::WHITE));

        let mut updated = self.rect;

        let body = ui
            .interact(self.rect.shrink(self.handle_size), Id::new("crop_body"), Sense::drag())
            .on_hover_cursor(CursorIcon::Move);
        if body.dragged() {
            updated = updated.translate(body.drag_delta());
        }

        for corner in Corner::ALL {
            let handle = Rect::from_center_size(corner.position(self.rect), Vec2::splat(self.handle_size));
            let response = ui
                .interact(handle, Id::new(("crop_handle", corner.as_str())), Sense::drag())
                .on_hover_cursor(corner.cursor_icon());

            ui.painter().rect_filled(handle, 2.0, HANDLE_COLOR);
            ui.painter().rect_stroke(handle, 2.0, Stroke::new(1.0, Color32::WHITE));

            if response.dragged() {
                updated = corner.drag(updated, response.drag_delta());
            }
        }

        (updated != self.rect).then_some(updated)
    }

    fn shade_outside(&self, ui: &Ui) {
        let shade = Color32::from_black_alpha(140);
        let (outer, inner) = (self.bounds, self.rect.intersect(self.bounds));
        let bands = [
            Rect::from_min_max(outer.min, egui::pos2(outer.max.x, inner.min.y)),
            Rect::from_min_max(egui::pos2(outer.min.x, inner.max.y), outer.max),
            Rect::from_min_max(egui::pos2(outer.min.x, inner.min.y), egui::pos2(inner.min.x, inner.max.y)),
            Rect::from_min_max(egui::pos2(inner.max.x, inner.min.y), egui::pos2(outer.max.x, inner.max.y)),
        ];
        for band in bands.into_iter().filter(|band| band.is_positive()) {
            ui.painter().rect_filled(band, 0.0, shade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_corner_drag_keeps_opposite_corner() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 40.0));
        let dragged = Corner::TopLeft.drag(rect, vec2(5.0, -5.0));
        assert_eq!(dragged, Rect::from_min_max(pos2(15.0, 5.0), pos2(50.0, 40.0)));

        let dragged = Corner::BottomRight.drag(rect, vec2(-10.0, 20.0));
        assert_eq!(dragged.max, pos2(40.0, 60.0));
        assert_eq!(dragged.min, rect.min);
    }

    #[test]
    fn test_dragging_past_opposite_corner_normalizes() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 40.0));
        let dragged = Corner::TopRight.drag(rect, vec2(-60.0, 0.0));
        assert_eq!(dragged, Rect::from_min_max(pos2(-10.0, 10.0), pos2(10.0, 40.0)));
    }
}
