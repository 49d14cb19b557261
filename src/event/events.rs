use egui::Vec2;
use uuid::Uuid;

use crate::selection::SelectionRect;
use crate::state::InteractionPhase;
use crate::stroke::StrokeKind;
use crate::tool::ToolMode;
use crate::transform::TransformState;

/// Changes reported by the editor to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: ToolMode,
        new: ToolMode,
    },
    InteractionChanged {
        old: InteractionPhase,
        new: InteractionPhase,
    },
    StrokeCommitted {
        kind: StrokeKind,
        points: usize,
    },
    SelectionChanged(Option<SelectionRect>),
    MaskCleared,
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    TransformChanged(TransformState),
    CropCommitted {
        width: u32,
        height: u32,
    },
    ViewChanged {
        scale: f32,
        offset: Vec2,
    },
    LoadStarted {
        url: String,
    },
    ImageLoaded {
        width: u32,
        height: u32,
    },
    ImageFailed(String),
    InpaintRequested {
        id: Uuid,
    },
    SaveRequested {
        width: u32,
        height: u32,
    },
}
