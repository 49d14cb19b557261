use std::collections::VecDeque;

use super::EditorEvent;

/// Outgoing editor events, drained by the host once per frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<EditorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: EditorEvent) {
        log::trace!("Editor event: {:?}", event);
        self.pending.push_back(event);
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
