//! The pointer-interaction state machine.
//!
//! ```text
//!            pointer down (brush/eraser)
//!   ┌──────┐ ─────────────────────────► ┌───────────┐
//!   │      │ ◄───────────────────────── │  Drawing  │
//!   │      │          pointer up        └───────────┘
//!   │      │   pointer down (select)    ┌───────────┐
//!   │ Idle │ ─────────────────────────► │ Selecting │
//!   │      │ ◄───────────────────────── └───────────┘
//!   │      │     crop tool selected     ┌───────────┐
//!   │      │ ─────────────────────────► │ Cropping  │
//!   └──────┘ ◄───────────────────────── └───────────┘
//!             other tool / cancel crop
//! ```

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::stroke::MutableStroke;

/// The phase of an [`InteractionState`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionPhase {
    Idle,
    Drawing,
    Selecting,
    Cropping,
}

impl InteractionPhase {
    /// Every transition goes through `Idle`.
    pub fn can_transition_to(self, next: InteractionPhase) -> bool {
        use InteractionPhase::*;
        matches!(
            (self, next),
            (Idle, Drawing | Selecting | Cropping) | (Drawing | Selecting | Cropping, Idle)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A brush or eraser stroke is being recorded (source space)
    Drawing { stroke: MutableStroke },
    /// A selection is being dragged out (display space)
    Selecting { start: Pos2, current: Pos2 },
    /// The crop tool is active; pointer input is ignored
    Cropping,
}

impl InteractionState {
    pub fn phase(&self) -> InteractionPhase {
        match self {
            InteractionState::Idle => InteractionPhase::Idle,
            InteractionState::Drawing { .. } => InteractionPhase::Drawing,
            InteractionState::Selecting { .. } => InteractionPhase::Selecting,
            InteractionState::Cropping => InteractionPhase::Cropping,
        }
    }

    pub fn can_transition_to(&self, next: &InteractionState) -> bool {
        self.phase().can_transition_to(next.phase())
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_cropping(&self) -> bool {
        matches!(self, InteractionState::Cropping)
    }

    /// True while the pointer button is held for a stroke or selection.
    pub fn in_gesture(&self) -> bool {
        matches!(self, InteractionState::Drawing { .. } | InteractionState::Selecting { .. })
    }
}
