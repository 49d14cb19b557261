#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod components;
pub mod compositor;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod filters;
pub mod geometry;
pub mod loader;
pub mod outbox;
pub mod panels;
pub mod pipeline;
pub mod render;
pub mod selection;
pub mod state;
pub mod stroke;
pub mod texture_manager;
pub mod tool;
pub mod transform;
pub mod viewport;
pub mod widgets;

pub use app::MaskEditorApp;
pub use command::{Command, CommandHistory};
pub use config::EditorConfig;
pub use document::MaskDocument;
pub use error::{EditorError, EditorResult};
pub use event::EditorEvent;
pub use export::{EncodedRaster, InpaintRequest, InpaintSink, SaveSink};
pub use loader::{ImageRequest, ImageSupplier};
pub use outbox::Outbox;
pub use state::EditorState;
pub use stroke::{Stroke, StrokeKind};
pub use tool::ToolMode;
pub use transform::{FilterPreset, TransformState};
