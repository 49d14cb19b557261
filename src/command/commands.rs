use super::{CommandContext, CommandError, CommandResult};
use crate::document::{MaskDocument, PlacedSelection};
use crate::stroke::Stroke;
use crate::transform::TransformState;

/// Which transform control produced a [`Command::SetTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformChange {
    Rotate,
    FlipX,
    FlipY,
    Filter,
    Brightness,
    Contrast,
    Saturation,
    Reset,
}

impl TransformChange {
    /// Slider-driven changes arrive as a burst of small steps.
    fn is_continuous(&self) -> bool {
        matches!(
            self,
            TransformChange::Brightness | TransformChange::Contrast | TransformChange::Saturation
        )
    }
}

/// Undoable edits of the mask document and transform settings
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a committed stroke
    AddStroke(Stroke),

    /// Replace (or clear) the selection
    SetSelection {
        old: Option<PlacedSelection>,
        new: Option<PlacedSelection>,
    },

    /// Drop every stroke and the selection at once
    ClearMask {
        strokes: Vec<Stroke>,
        selection: Option<PlacedSelection>,
    },

    /// Replace the transform settings
    SetTransform {
        change: TransformChange,
        old: TransformState,
        new: TransformState,
    },
}

impl Command {
    /// Captures the current document so clearing it can be undone.
    pub fn clear_mask(document: &MaskDocument) -> Self {
        Command::ClearMask {
            strokes: document.strokes().to_vec(),
            selection: document.placed_selection(),
        }
    }

    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddStroke(stroke) => {
                ctx.document.add_stroke(stroke.clone());
                Ok(())
            }

            Command::SetSelection { new, .. } => {
                ctx.document.set_selection(*new);
                Ok(())
            }

            Command::ClearMask { .. } => {
                ctx.document.take_all();
                Ok(())
            }

            Command::SetTransform { new, .. } => {
                replace_keeping_crop(ctx.transform, new);
                Ok(())
            }
        }
    }

    pub fn undo(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddStroke(stroke) => match ctx.document.remove_last_stroke() {
                Some(last) if last == *stroke => Ok(()),
                Some(last) => {
                    ctx.document.add_stroke(last);
                    Err(CommandError::InvalidState(
                        "last stroke differs from the one being undone".to_owned(),
                    ))
                }
                None => Err(CommandError::InvalidState("no stroke to remove".to_owned())),
            },

            Command::SetSelection { old, .. } => {
                ctx.document.set_selection(*old);
                Ok(())
            }

            Command::ClearMask { strokes, selection } => {
                if !ctx.document.is_empty() {
                    return Err(CommandError::InvalidState(
                        "mask was edited after it was cleared".to_owned(),
                    ));
                }
                ctx.document.restore(strokes.clone(), *selection);
                Ok(())
            }

            Command::SetTransform { old, .. } => {
                replace_keeping_crop(ctx.transform, old);
                Ok(())
            }
        }
    }

    /// Folds `next` into `self` when both are steps of the same slider drag.
    /// Returns `false` (leaving `self` untouched) otherwise.
    pub fn merge(&mut self, next: &Command) -> bool {
        match (self, next) {
            (
                Command::SetTransform { change, new, .. },
                Command::SetTransform {
                    change: next_change,
                    old: next_old,
                    new: next_new,
                },
            ) if *change == *next_change && change.is_continuous() && *new == *next_old => {
                *new = *next_new;
                true
            }
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddStroke(_) => "AddStroke",
            Command::SetSelection { .. } => "SetSelection",
            Command::ClearMask { .. } => "ClearMask",
            Command::SetTransform { .. } => "SetTransform",
        }
    }
}

/// The pending crop is edited outside the history, so it is never rolled
/// back or forward with the other settings.
fn replace_keeping_crop(current: &mut TransformState, recorded: &TransformState) {
    let crop = current.crop().copied();
    *current = *recorded;
    current.set_crop(crop);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{CropRect, SelectionRect};
    use crate::stroke::StrokeKind;
    use egui::{Color32, Rect, pos2};

    fn stroke() -> Stroke {
        Stroke::new(StrokeKind::Brush, 5, Color32::BLACK, vec![pos2(1.0, 1.0), pos2(4.0, 4.0)])
    }

    #[test]
    fn test_clear_mask_undo_restores_everything() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        document.add_stroke(stroke());
        let placed = document.place_selection(SelectionRect::from_drag(pos2(0.0, 0.0), pos2(3.0, 3.0)));
        document.set_selection(Some(placed));
        let before = document.clone();

        let command = Command::clear_mask(&document);
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        command.execute(&mut ctx).unwrap();
        assert!(ctx.document.is_empty());
        command.undo(&mut ctx).unwrap();
        assert_eq!(*ctx.document, before);
    }

    #[test]
    fn test_add_stroke_undo_checks_document() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        let command = Command::AddStroke(stroke());
        assert!(matches!(command.undo(&mut ctx), Err(CommandError::InvalidState(_))));
        command.execute(&mut ctx).unwrap();
        command.undo(&mut ctx).unwrap();
        assert!(ctx.document.strokes().is_empty());
    }

    #[test]
    fn test_slider_steps_merge() {
        let base = TransformState::default();
        let mut step1 = base;
        step1.set_brightness(10);
        let mut step2 = step1;
        step2.set_brightness(20);

        let mut first = Command::SetTransform { change: TransformChange::Brightness, old: base, new: step1 };
        let second = Command::SetTransform { change: TransformChange::Brightness, old: step1, new: step2 };
        assert!(first.merge(&second));
        assert_eq!(first, Command::SetTransform { change: TransformChange::Brightness, old: base, new: step2 });

        let mut rotated = step2;
        rotated.rotate_right();
        let rotate = Command::SetTransform { change: TransformChange::Rotate, old: step2, new: rotated };
        assert!(!first.merge(&rotate));
        let mut rotate_copy = rotate.clone();
        assert!(!rotate_copy.merge(&rotate));
    }

    #[test]
    fn test_transform_undo_keeps_pending_crop() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        let old = transform;
        let mut new = old;
        new.set_saturation(-50);

        let crop = CropRect::new(Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 20.0))).unwrap();
        transform.set_crop(Some(crop));
        let command = Command::SetTransform { change: TransformChange::Saturation, old, new };
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        command.execute(&mut ctx).unwrap();
        assert_eq!(ctx.transform.saturation(), -50);
        assert_eq!(ctx.transform.crop(), Some(&crop));
        command.undo(&mut ctx).unwrap();
        assert_eq!(ctx.transform.saturation(), 0);
        assert_eq!(ctx.transform.crop(), Some(&crop));
    }
}
