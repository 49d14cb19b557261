mod commands;
mod history;

use thiserror::Error;

use crate::document::MaskDocument;
use crate::transform::TransformState;

pub use commands::{Command, TransformChange};
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    /// The document no longer matches what the command recorded
    #[error("invalid document state: {0}")]
    InvalidState(String),
}

/// What commands are allowed to touch.
pub struct CommandContext<'a> {
    pub document: &'a mut MaskDocument,
    pub transform: &'a mut TransformState,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut MaskDocument, transform: &'a mut TransformState) -> Self {
        Self { document, transform }
    }
}
