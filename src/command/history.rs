use std::collections::VecDeque;

use super::{Command, CommandContext, CommandError, CommandResult};

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug)]
pub struct CommandHistory {
    /// Commands that can be undone, oldest first
    undo_stack: VecDeque<Command>,
    /// Commands that can be redone
    redo_stack: Vec<Command>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl CommandHistory {
    /// A history keeping at most `limit` undoable commands.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, command: Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        command.execute(ctx)?;
        log::debug!("Executed {}", command.name());

        self.redo_stack.clear();
        if let Some(last) = self.undo_stack.back_mut() {
            if last.merge(&command) {
                return Ok(());
            }
        }
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        Ok(())
    }

    /// Undo the last executed command
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self.undo_stack.pop_back().ok_or(CommandError::NothingToUndo)?;
        if let Err(err) = command.undo(ctx) {
            self.undo_stack.push_back(command);
            return Err(err);
        }
        log::debug!("Undid {}", command.name());
        self.redo_stack.push(command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        if let Err(err) = command.execute(ctx) {
            self.redo_stack.push(command);
            return Err(err);
        }
        log::debug!("Redid {}", command.name());
        self.undo_stack.push_back(command);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MaskDocument;
    use crate::stroke::{Stroke, StrokeKind};
    use crate::transform::TransformState;
    use egui::{Color32, pos2};

    fn stroke(x: f32) -> Command {
        Command::AddStroke(Stroke::new(StrokeKind::Brush, 3, Color32::BLACK, vec![pos2(x, 0.0)]))
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        let mut history = CommandHistory::new(10);

        history.execute(stroke(1.0), &mut ctx).unwrap();
        history.execute(stroke(2.0), &mut ctx).unwrap();
        history.undo(&mut ctx).unwrap();
        assert_eq!(ctx.document.strokes().len(), 1);
        assert!(history.can_redo());

        history.redo(&mut ctx).unwrap();
        assert_eq!(ctx.document.strokes().len(), 2);
        assert_eq!(history.redo(&mut ctx), Err(CommandError::NothingToRedo));
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        let mut history = CommandHistory::new(10);

        history.execute(stroke(1.0), &mut ctx).unwrap();
        history.undo(&mut ctx).unwrap();
        history.execute(stroke(2.0), &mut ctx).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.undo(&mut ctx), Ok(()));
        assert_eq!(history.undo(&mut ctx), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut document = MaskDocument::new();
        let mut transform = TransformState::default();
        let mut ctx = CommandContext::new(&mut document, &mut transform);
        let mut history = CommandHistory::new(3);

        for i in 0..5 {
            history.execute(stroke(i as f32), &mut ctx).unwrap();
        }
        assert_eq!(history.undo_len(), 3);
        while history.undo(&mut ctx).is_ok() {}
        // the two oldest strokes can no longer be undone
        assert_eq!(ctx.document.strokes().len(), 2);
    }
}
