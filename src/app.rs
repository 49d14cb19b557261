use crate::config::EditorConfig;
use crate::event::EditorEvent;
use crate::file_handler::FileHandler;
use crate::loader::{BLOB_SCHEME, ImageRequest, ImageSources};
use crate::outbox::Outbox;
use crate::panels::{central_panel, tools_panel};
use crate::state::EditorState;
use crate::texture_manager::TextureManager;
use crate::tool::ToolSettings;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct MaskEditorApp {
    config: EditorConfig,
    settings: ToolSettings,
    /// Path or URL typed into the side panel
    source_input: String,
    #[serde(skip)]
    editor: EditorState,
    #[serde(skip)]
    textures: TextureManager,
    #[serde(skip)]
    sources: ImageSources,
    #[serde(skip)]
    outbox: Outbox,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    current_url: Option<String>,
    /// Last thing worth telling the user, shown under the canvas controls
    #[serde(skip)]
    status: Option<String>,
}

impl Default for MaskEditorApp {
    fn default() -> Self {
        let config = EditorConfig::default();
        let editor = EditorState::new(config.clone());
        Self {
            settings: *editor.settings(),
            config,
            source_input: String::new(),
            editor,
            textures: TextureManager::default(),
            sources: ImageSources::new(),
            outbox: Outbox::new(),
            file_handler: FileHandler::new(),
            current_url: None,
            status: None,
        }
    }
}

impl MaskEditorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let restored: Option<Self> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));
        let mut app = restored.unwrap_or_default();

        app.config = app.config.sanitized();
        app.editor = EditorState::new(app.config.clone());
        app.editor.set_settings(app.settings);
        log::info!("Editor session {} started", app.editor.session_id());
        app
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    /// The editor together with the texture cache, for painting the canvas.
    pub fn canvas_parts(&mut self) -> (&mut EditorState, &mut TextureManager) {
        (&mut self.editor, &mut self.textures)
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn source_input_mut(&mut self) -> &mut String {
        &mut self.source_input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Loads whatever path or URL is in the side panel's text box.
    pub fn open_source_input(&mut self) {
        let source = self.source_input.trim().to_owned();
        if source.is_empty() {
            return;
        }
        self.open(ImageRequest::new(source));
    }

    pub fn open(&mut self, request: ImageRequest) {
        if let Some(previous) = self.current_url.take() {
            if previous.starts_with(BLOB_SCHEME) && previous != request.url {
                self.sources.blobs_mut().remove(&previous);
            }
        }
        self.current_url = Some(request.url.clone());
        self.status = None;
        self.editor.begin_load(request, &self.sources);
    }

    pub fn request_inpaint(&mut self) {
        self.status = Some(match self.editor.request_inpaint(&self.outbox) {
            Ok(id) => format!("Inpaint request {id} queued"),
            Err(err) => err.to_string(),
        });
    }

    pub fn request_save(&mut self) {
        self.status = Some(match self.editor.request_save(&self.outbox) {
            Ok(()) => format!("Saved ({} items in outbox)", self.outbox.len()),
            Err(err) => err.to_string(),
        });
    }

    fn poll_loading(&mut self, ctx: &egui::Context) {
        if let Some(Err(err)) = self.editor.poll_pending_image() {
            self.status = Some(err.to_string());
        }
        if self.editor.is_loading() {
            ctx.request_repaint();
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        use egui::{Key, Modifiers};

        let redo = ctx.input_mut(|i| {
            i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z) || i.consume_key(Modifiers::COMMAND, Key::Y)
        });
        let undo = ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Z));
        if redo {
            self.editor.redo();
        } else if undo {
            self.editor.undo();
        }

        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Enter)) {
            self.editor.commit_crop();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
            self.editor.cancel_crop();
        }
    }

    fn handle_events(&mut self) {
        for event in self.editor.drain_events() {
            log::debug!("{event:?}");
            match event {
                EditorEvent::ImageLoaded { .. } | EditorEvent::LoadStarted { .. } => self.textures.clear_cache(),
                EditorEvent::CropCommitted { width, height } => {
                    self.status = Some(format!("Cropped to {width}x{height}"));
                }
                EditorEvent::ImageFailed(message) => self.status = Some(message),
                _ => {}
            }
        }
    }
}

impl eframe::App for MaskEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings = *self.editor.settings();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();

        if let Some(request) = self.file_handler.take_dropped_image(ctx, self.sources.blobs_mut()) {
            self.source_input = request.url.clone();
            self.open(request);
        }
        self.poll_loading(ctx);
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.file_handler.preview_files_being_dropped(ctx);

        self.handle_events();
    }
}
