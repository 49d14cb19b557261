mod editor_state;
mod interaction;

pub use editor_state::EditorState;
pub use interaction::{InteractionPhase, InteractionState};
