mod events;
mod queue;

pub use events::EditorEvent;
pub use queue::EventQueue;
