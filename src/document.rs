use serde::{Deserialize, Serialize};

use crate::geometry::Affine;
use crate::selection::SelectionRect;
use crate::stroke::Stroke;

/// The selection together with its position in the stroke sequence.
///
/// `order` is the number of strokes that existed when the selection was
/// placed: strokes before it are painted under the selection fill, strokes
/// after it are painted on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedSelection {
    pub rect: SelectionRect,
    pub order: usize,
}

/// Everything that ends up in the exported mask, in image space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskDocument {
    strokes: Vec<Stroke>,
    selection: Option<PlacedSelection>,
}

impl MaskDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn remove_last_stroke(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn selection(&self) -> Option<&SelectionRect> {
        self.selection.as_ref().map(|placed| &placed.rect)
    }

    pub fn placed_selection(&self) -> Option<PlacedSelection> {
        self.selection
    }

    /// Places a selection after all current strokes.
    pub fn place_selection(&self, rect: SelectionRect) -> PlacedSelection {
        PlacedSelection {
            rect,
            order: self.strokes.len(),
        }
    }

    pub fn set_selection(&mut self, selection: Option<PlacedSelection>) {
        self.selection = selection;
    }

    /// Strokes split around the selection: painted before and after its fill.
    pub fn strokes_around_selection(&self) -> (&[Stroke], &[Stroke]) {
        let split = self
            .selection
            .map_or(self.strokes.len(), |placed| placed.order.min(self.strokes.len()));
        self.strokes.split_at(split)
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.selection.is_none()
    }

    /// Removes strokes and selection in one step, handing them back.
    pub fn take_all(&mut self) -> (Vec<Stroke>, Option<PlacedSelection>) {
        (std::mem::take(&mut self.strokes), self.selection.take())
    }

    pub fn restore(&mut self, strokes: Vec<Stroke>, selection: Option<PlacedSelection>) {
        self.strokes = strokes;
        self.selection = selection;
    }

    /// Re-expresses every stroke and the selection through `map`.
    pub fn transform(&mut self, map: &Affine) {
        for stroke in &mut self.strokes {
            *stroke = stroke.transformed(map);
        }
        if let Some(placed) = &mut self.selection {
            placed.rect = placed.rect.transformed(map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeKind;
    use egui::{Color32, pos2};

    fn stroke(x: f32) -> Stroke {
        Stroke::new(StrokeKind::Brush, 4, Color32::BLACK, vec![pos2(x, x)])
    }

    #[test]
    fn test_selection_splits_strokes() {
        let mut document = MaskDocument::new();
        document.add_stroke(stroke(1.0));
        let placed = document.place_selection(SelectionRect::from_drag(pos2(0.0, 0.0), pos2(5.0, 5.0)));
        document.set_selection(Some(placed));
        document.add_stroke(stroke(2.0));

        let (before, after) = document.strokes_around_selection();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_split_survives_undone_strokes() {
        let mut document = MaskDocument::new();
        document.add_stroke(stroke(1.0));
        document.add_stroke(stroke(2.0));
        let placed = document.place_selection(SelectionRect::from_drag(pos2(0.0, 0.0), pos2(5.0, 5.0)));
        document.set_selection(Some(placed));
        document.remove_last_stroke();
        document.remove_last_stroke();

        let (before, after) = document.strokes_around_selection();
        assert!(before.is_empty() && after.is_empty());
    }

    #[test]
    fn test_take_all_and_restore() {
        let mut document = MaskDocument::new();
        document.add_stroke(stroke(1.0));
        let (strokes, selection) = document.take_all();
        assert!(document.is_empty());
        document.restore(strokes, selection);
        assert_eq!(document.strokes().len(), 1);
    }
}
