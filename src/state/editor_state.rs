//! The single owner of everything in one editing session.
//!
//! All mutation goes through [`EditorState`]: the host forwards pointer
//! input and button presses, reads back images by revision and drains
//! [`EditorEvent`]s once per frame.

use egui::{Pos2, Rect, Vec2};
use image::{GrayImage, Rgba, RgbaImage};
use log::{debug, info, warn};
use uuid::Uuid;

use super::{InteractionPhase, InteractionState};
use crate::canvas::Canvas;
use crate::command::{Command, CommandContext, CommandHistory, TransformChange};
use crate::compositor;
use crate::config::EditorConfig;
use crate::document::MaskDocument;
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventQueue};
use crate::export::{self, EncodedRaster, InpaintRequest, InpaintSink, SaveSink};
use crate::loader::{ImageRequest, ImageSupplier, PendingImage};
use crate::pipeline;
use crate::selection::{CropRect, SelectionRect};
use crate::stroke::MutableStroke;
use crate::tool::{LayerVisibility, ToolMode, ToolSettings};
use crate::transform::{FilterPreset, GeometricTransform, TransformState};
use crate::viewport::{self, Viewport, ZoomDirection};

#[derive(Debug)]
pub struct EditorState {
    session_id: Uuid,
    config: EditorConfig,
    canvas: Option<Canvas>,
    pending: Option<PendingImage>,
    prompt: String,
    viewport: Viewport,
    document: MaskDocument,
    transform: TransformState,
    history: CommandHistory,
    interaction: InteractionState,
    tool: ToolMode,
    tool_before_crop: ToolMode,
    settings: ToolSettings,
    layers: LayerVisibility,
    events: EventQueue,
    image_revision: u64,
    overlay_revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        Self {
            session_id: Uuid::new_v4(),
            viewport: Viewport::new(&config),
            history: CommandHistory::new(config.history_limit),
            settings: ToolSettings::with_brush_size(config.default_brush_size),
            config,
            canvas: None,
            pending: None,
            prompt: String::new(),
            document: MaskDocument::new(),
            transform: TransformState::default(),
            interaction: InteractionState::Idle,
            tool: ToolMode::default(),
            tool_before_crop: ToolMode::default(),
            layers: LayerVisibility::default(),
            events: EventQueue::new(),
            image_revision: 0,
            overlay_revision: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Loading ---

    /// Starts resolving `request` and drops the current session. The editor
    /// stays renderless until [`Self::poll_pending_image`] reports success.
    pub fn begin_load(&mut self, request: ImageRequest, supplier: &dyn ImageSupplier) {
        info!("Loading image from {}", request.url);
        self.reset_session();
        self.prompt = request.prompt.unwrap_or_default();
        self.pending = Some(PendingImage::new(request.url.clone(), supplier.fetch(&request.url)));
        self.events.emit(EditorEvent::LoadStarted { url: request.url });
    }

    /// Polls the load started by [`Self::begin_load`]. Returns `None` while
    /// it is still running (or if none is), and the outcome once it ends.
    pub fn poll_pending_image(&mut self) -> Option<EditorResult<[u32; 2]>> {
        let bytes = self.pending.as_mut()?.poll()?;
        let url = self.pending.take().map(|pending| pending.url().to_owned());
        let result = match bytes {
            Ok(bytes) => self.load_image_bytes(&bytes),
            Err(err) => {
                self.events.emit(EditorEvent::ImageFailed(err.to_string()));
                Err(err)
            }
        };
        if let Err(err) = &result {
            warn!("Failed to load {}: {err}", url.unwrap_or_default());
        }
        Some(result)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Decodes and shows an image straight away, replacing the session.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> EditorResult<[u32; 2]> {
        match Canvas::from_bytes(bytes) {
            Ok(canvas) => Ok(self.install_canvas(canvas)),
            Err(err) => {
                self.reset_session();
                self.events.emit(EditorEvent::ImageFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Shows already decoded pixels, replacing the session.
    pub fn load_image(&mut self, pixels: RgbaImage) -> EditorResult<[u32; 2]> {
        let canvas = Canvas::from_image(pixels)?;
        Ok(self.install_canvas(canvas))
    }

    fn install_canvas(&mut self, canvas: Canvas) -> [u32; 2] {
        self.reset_session();
        let size = canvas.size();
        info!("Image loaded: {}x{}", size[0], size[1]);
        self.canvas = Some(canvas);
        self.viewport.load(viewport::size_vec(size));
        self.touch_image();
        self.touch_overlay();
        self.events.emit(EditorEvent::ImageLoaded {
            width: size[0],
            height: size[1],
        });
        size
    }

    /// Forgets the image and every edit made to it.
    fn reset_session(&mut self) {
        self.pending = None;
        self.canvas = None;
        self.document = MaskDocument::new();
        self.transform.reset();
        self.history.clear();
        self.viewport.unload();
        if !self.interaction.is_idle() {
            self.set_interaction(InteractionState::Idle);
        }
        if self.tool == ToolMode::Crop {
            self.change_tool(self.tool_before_crop);
        }
        self.touch_image();
        self.touch_overlay();
    }

    pub fn has_image(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn source_size(&self) -> Option<[u32; 2]> {
        self.canvas.as_ref().map(Canvas::size)
    }

    /// Size of the displayed image: source after flip and rotation.
    pub fn display_size(&self) -> Option<[u32; 2]> {
        self.display_geometry().map(|geometry| geometry.output_size)
    }

    fn display_geometry(&self) -> Option<GeometricTransform> {
        let size = self.source_size()?;
        Some(self.transform.geometry(size, false))
    }

    // --- Session settings ---

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.settings = settings;
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.settings.set_brush_size(size);
    }

    pub fn set_brush_color(&mut self, color: egui::Color32) {
        self.settings.set_color(color);
    }

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    pub fn set_image_visible(&mut self, visible: bool) {
        self.layers.image = visible;
    }

    pub fn set_mask_visible(&mut self, visible: bool) {
        self.layers.mask = visible;
    }

    // --- Tools ---

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Switches the active tool. Ignored (returns `false`) while a stroke or
    /// selection is being dragged. Leaving the crop tool commits the crop.
    pub fn set_tool(&mut self, tool: ToolMode) -> bool {
        if self.interaction.in_gesture() {
            debug!("Ignoring switch to {:?} during {:?}", tool, self.interaction.phase());
            return false;
        }
        if tool == self.tool {
            return true;
        }

        if self.interaction.is_cropping() {
            self.commit_pending_crop();
            self.set_interaction(InteractionState::Idle);
        }
        if tool == ToolMode::Crop {
            self.tool_before_crop = self.tool;
            self.set_interaction(InteractionState::Cropping);
        }
        self.change_tool(tool);
        true
    }

    fn change_tool(&mut self, tool: ToolMode) {
        let old = std::mem::replace(&mut self.tool, tool);
        self.events.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    fn set_interaction(&mut self, next: InteractionState) -> bool {
        if !self.interaction.can_transition_to(&next) {
            debug!("Invalid transition {:?} -> {:?}", self.interaction.phase(), next.phase());
            return false;
        }
        let old = self.interaction.phase();
        self.interaction = next;
        self.events.emit(EditorEvent::InteractionChanged {
            old,
            new: self.interaction.phase(),
        });
        true
    }

    /// Ends the current gesture, handing back what it recorded.
    fn finish_gesture(&mut self) -> InteractionState {
        let finished = std::mem::take(&mut self.interaction);
        self.events.emit(EditorEvent::InteractionChanged {
            old: finished.phase(),
            new: InteractionPhase::Idle,
        });
        finished
    }

    // --- Pointer input (screen coordinates relative to the canvas widget) ---

    /// Screen point to source image space.
    pub fn screen_to_source(&self, screen: Pos2) -> Option<Pos2> {
        let geometry = self.display_geometry()?;
        Some(geometry.from_output.apply(self.viewport.screen_to_image(screen)))
    }

    /// Source image point to screen space.
    pub fn source_to_screen(&self, source: Pos2) -> Option<Pos2> {
        let geometry = self.display_geometry()?;
        Some(self.viewport.image_to_screen(geometry.to_output.apply(source)))
    }

    pub fn pointer_down(&mut self, screen: Pos2) -> bool {
        if !self.interaction.is_idle() {
            return false;
        }
        let Some(source) = self.screen_to_source(screen) else {
            return false;
        };

        let next = match self.tool {
            ToolMode::Brush | ToolMode::Eraser => {
                let Some(kind) = self.tool.stroke_kind() else {
                    return false;
                };
                let mut stroke = MutableStroke::new(kind, self.settings.brush_size(), self.settings.color());
                stroke.add_point(source);
                InteractionState::Drawing { stroke }
            }
            ToolMode::Select => {
                let display = self.viewport.screen_to_image(screen);
                InteractionState::Selecting {
                    start: display,
                    current: display,
                }
            }
            ToolMode::Crop => return false,
        };
        self.set_interaction(next)
    }

    pub fn pointer_move(&mut self, screen: Pos2) -> bool {
        let Some(source) = self.screen_to_source(screen) else {
            return false;
        };
        let display = self.viewport.screen_to_image(screen);
        match &mut self.interaction {
            InteractionState::Drawing { stroke } => {
                stroke.add_point(source);
                true
            }
            InteractionState::Selecting { current, .. } => {
                *current = display;
                true
            }
            InteractionState::Idle | InteractionState::Cropping => false,
        }
    }

    pub fn pointer_up(&mut self, screen: Pos2) -> bool {
        if !self.interaction.in_gesture() {
            return false;
        }
        let source = self.screen_to_source(screen);
        let display = self.viewport.screen_to_image(screen);

        match self.finish_gesture() {
            InteractionState::Drawing { mut stroke } => {
                if let Some(source) = source {
                    if stroke.points().last() != Some(&source) {
                        stroke.add_point(source);
                    }
                }
                self.commit_stroke(stroke);
            }
            InteractionState::Selecting { start, .. } => self.commit_selection(start, display),
            InteractionState::Idle | InteractionState::Cropping => return false,
        }
        true
    }

    fn commit_stroke(&mut self, stroke: MutableStroke) {
        let stroke = stroke.into_stroke();
        let (kind, points) = (stroke.kind(), stroke.points().len());
        if self.execute(Command::AddStroke(stroke)) {
            self.touch_overlay();
            self.events.emit(EditorEvent::StrokeCommitted { kind, points });
        }
    }

    /// Records a selection dragged in display space. A zero-area drag
    /// clears the selection.
    fn commit_selection(&mut self, start: Pos2, end: Pos2) {
        let Some(geometry) = self.display_geometry() else {
            return;
        };
        let dragged = SelectionRect::from_drag(start, end);
        let new = if !dragged.has_area() {
            None
        } else if geometry.is_identity() {
            Some(self.document.place_selection(dragged))
        } else {
            Some(self.document.place_selection(dragged.transformed(&geometry.from_output)))
        };

        let old = self.document.placed_selection();
        if old == new {
            return;
        }
        if self.execute(Command::SetSelection { old, new }) {
            self.touch_overlay();
            self.events
                .emit(EditorEvent::SelectionChanged(new.map(|placed| placed.rect)));
        }
    }

    /// The stroke being drawn, in source space.
    pub fn active_stroke(&self) -> Option<&MutableStroke> {
        match &self.interaction {
            InteractionState::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }

    /// The selection being dragged, in screen space.
    pub fn live_selection_screen_rect(&self) -> Option<Rect> {
        match &self.interaction {
            InteractionState::Selecting { start, current } => Some(Rect::from_two_pos(
                self.viewport.image_to_screen(*start),
                self.viewport.image_to_screen(*current),
            )),
            _ => None,
        }
    }

    pub fn document(&self) -> &MaskDocument {
        &self.document
    }

    pub fn selection(&self) -> Option<&SelectionRect> {
        self.document.selection()
    }

    // --- Viewport ---

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Records the canvas widget size. The first real size after a load
    /// triggers a fit, since loads can finish before the widget is laid out.
    pub fn set_container_size(&mut self, size: Vec2) {
        let was_empty = self.viewport.container_size().x <= 0.0 || self.viewport.container_size().y <= 0.0;
        self.viewport.set_container_size(size);
        if was_empty && self.has_image() {
            self.fit_to_container();
        }
    }

    pub fn fit_to_container(&mut self) {
        self.viewport.fit_to_container();
        self.emit_view_changed();
    }

    pub fn zoom_at(&mut self, pointer: Pos2, direction: ZoomDirection) {
        if !self.has_image() {
            return;
        }
        self.viewport.zoom_at(pointer, direction);
        self.emit_view_changed();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if !self.has_image() {
            return;
        }
        self.viewport.pan_by(delta);
        self.emit_view_changed();
    }

    fn emit_view_changed(&mut self) {
        self.events.emit(EditorEvent::ViewChanged {
            scale: self.viewport.scale(),
            offset: self.viewport.offset(),
        });
    }

    // --- Transforms ---

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn rotate_right(&mut self) -> bool {
        self.change_transform(TransformChange::Rotate, TransformState::rotate_right)
    }

    pub fn rotate_left(&mut self) -> bool {
        self.change_transform(TransformChange::Rotate, TransformState::rotate_left)
    }

    pub fn set_rotation(&mut self, degrees: i32) -> bool {
        self.change_transform(TransformChange::Rotate, |t| t.set_rotation(degrees))
    }

    pub fn flip_x(&mut self) -> bool {
        self.change_transform(TransformChange::FlipX, TransformState::flip_x)
    }

    pub fn flip_y(&mut self) -> bool {
        self.change_transform(TransformChange::FlipY, TransformState::flip_y)
    }

    pub fn set_filter(&mut self, filter: FilterPreset) -> bool {
        self.change_transform(TransformChange::Filter, |t| t.set_filter(filter))
    }

    pub fn set_brightness(&mut self, value: i32) -> bool {
        self.change_transform(TransformChange::Brightness, |t| t.set_brightness(value))
    }

    pub fn set_contrast(&mut self, value: i32) -> bool {
        self.change_transform(TransformChange::Contrast, |t| t.set_contrast(value))
    }

    pub fn set_saturation(&mut self, value: i32) -> bool {
        self.change_transform(TransformChange::Saturation, |t| t.set_saturation(value))
    }

    pub fn reset_transform(&mut self) -> bool {
        self.change_transform(TransformChange::Reset, TransformState::reset)
    }

    /// Geometric changes need an idle editor; colour changes only need the
    /// pointer to be up.
    fn change_transform(&mut self, change: TransformChange, edit: impl FnOnce(&mut TransformState)) -> bool {
        let geometric = matches!(
            change,
            TransformChange::Rotate | TransformChange::FlipX | TransformChange::FlipY | TransformChange::Reset
        );
        let allowed = if geometric {
            self.interaction.is_idle()
        } else {
            !self.interaction.in_gesture()
        };
        if !allowed {
            debug!("Ignoring {:?} during {:?}", change, self.interaction.phase());
            return false;
        }

        let old = self.transform;
        let mut new = old;
        edit(&mut new);
        if new == old {
            return true;
        }
        if self.execute(Command::SetTransform { change, old, new }) {
            self.after_transform_change(&old);
        }
        true
    }

    fn after_transform_change(&mut self, old: &TransformState) {
        self.touch_image();
        if self.transform.has_geometry() || old.has_geometry() {
            self.touch_overlay();
        }
        if self.transform.rotation_degrees() != old.rotation_degrees() {
            if let Some(size) = self.display_size() {
                self.viewport.load(viewport::size_vec(size));
                self.emit_view_changed();
            }
        }
        self.events.emit(EditorEvent::TransformChanged(self.transform));
    }

    // --- Crop ---

    pub fn crop_rect(&self) -> Option<&CropRect> {
        self.transform.crop()
    }

    /// Sets the pending crop in display space. Only meaningful with the crop
    /// tool active; otherwise it is ignored.
    pub fn set_crop_rect(&mut self, rect: Rect) -> EditorResult<()> {
        if !self.interaction.is_cropping() {
            debug!("Ignoring crop rectangle outside crop mode");
            return Ok(());
        }
        let display_size = self.display_size().ok_or(EditorError::NoImage)?;
        let crop = CropRect::new(rect)?.clipped_to(display_size)?;
        self.transform.set_crop(Some(crop));
        self.events.emit(EditorEvent::TransformChanged(self.transform));
        Ok(())
    }

    /// Bakes the pending crop and returns to the tool used before cropping.
    pub fn commit_crop(&mut self) -> bool {
        if !self.interaction.is_cropping() {
            return false;
        }
        self.set_tool(self.tool_before_crop)
    }

    /// Leaves crop mode without changing the image.
    pub fn cancel_crop(&mut self) -> bool {
        if !self.interaction.is_cropping() {
            return false;
        }
        self.transform.set_crop(None);
        self.set_interaction(InteractionState::Idle);
        self.change_tool(self.tool_before_crop);
        self.events.emit(EditorEvent::TransformChanged(self.transform));
        true
    }

    /// Turns flip, rotation and crop into a new source image. Strokes and the
    /// selection follow the pixels; colour settings are kept.
    fn commit_pending_crop(&mut self) {
        if self.transform.crop().is_none() {
            return;
        }
        let Some(canvas) = &self.canvas else {
            return;
        };
        let geometry = self.transform.geometry(canvas.size(), true);
        let baked = pipeline::apply_geometry(canvas.pixels(), &geometry);
        let canvas = match Canvas::from_image(baked) {
            Ok(canvas) => canvas,
            Err(err) => {
                warn!("Discarding crop: {err}");
                self.transform.set_crop(None);
                return;
            }
        };

        let [width, height] = canvas.size();
        info!("Crop committed: {width}x{height}");
        self.canvas = Some(canvas);
        self.document.transform(&geometry.to_output);
        self.transform.reset_geometry();
        self.history.clear();
        self.viewport.load(viewport::size_vec([width, height]));
        self.touch_image();
        self.touch_overlay();
        self.events.emit(EditorEvent::CropCommitted { width, height });
        self.emit_history_changed();
        self.emit_view_changed();
    }

    // --- Mask edits and history ---

    /// Removes every stroke and the selection as one undoable step.
    pub fn clear_mask(&mut self) -> bool {
        if self.interaction.in_gesture() {
            debug!("Ignoring clear during {:?}", self.interaction.phase());
            return false;
        }
        if self.document.is_empty() {
            return true;
        }
        let command = Command::clear_mask(&self.document);
        if self.execute(command) {
            self.touch_overlay();
            self.events.emit(EditorEvent::MaskCleared);
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.step_history(true)
    }

    pub fn redo(&mut self) -> bool {
        self.step_history(false)
    }

    fn step_history(&mut self, undo: bool) -> bool {
        if !self.interaction.is_idle() {
            debug!("Ignoring undo/redo during {:?}", self.interaction.phase());
            return false;
        }
        let old = self.transform;
        let mut ctx = CommandContext::new(&mut self.document, &mut self.transform);
        let result = if undo {
            self.history.undo(&mut ctx)
        } else {
            self.history.redo(&mut ctx)
        };
        if let Err(err) = result {
            debug!("History step failed: {err}");
            return false;
        }

        self.touch_overlay();
        if self.transform != old {
            self.after_transform_change(&old);
        }
        self.emit_history_changed();
        true
    }

    fn execute(&mut self, command: Command) -> bool {
        let mut ctx = CommandContext::new(&mut self.document, &mut self.transform);
        if let Err(err) = self.history.execute(command, &mut ctx) {
            warn!("Command failed: {err}");
            return false;
        }
        self.emit_history_changed();
        true
    }

    fn emit_history_changed(&mut self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    // --- Rendering and export ---

    /// Bumped whenever the displayed image changes.
    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    /// Bumped whenever the committed overlay changes.
    pub fn overlay_revision(&self) -> u64 {
        self.overlay_revision
    }

    fn touch_image(&mut self) {
        self.image_revision += 1;
    }

    fn touch_overlay(&mut self) {
        self.overlay_revision += 1;
    }

    /// Source after flip, rotation and colour stages; a pending crop is
    /// shown with handles instead of being applied.
    pub fn display_image(&self) -> Option<RgbaImage> {
        let canvas = self.canvas.as_ref()?;
        Some(pipeline::render(canvas.pixels(), &self.transform, false, self.config.blur_sigma))
    }

    /// Committed strokes and selection, aligned with [`Self::display_image`].
    pub fn overlay_image(&self) -> Option<RgbaImage> {
        let geometry = self.display_geometry()?;
        Some(self.overlay_through(&geometry))
    }

    fn overlay_through(&self, geometry: &GeometricTransform) -> RgbaImage {
        let size = self.source_size().unwrap_or(geometry.output_size);
        let overlay = compositor::render_overlay(size, &self.document, self.config.selection_tint);
        pipeline::apply_geometry(&overlay, geometry)
    }

    /// The mask bitmap, sized to the source image.
    pub fn mask_image(&self) -> EditorResult<GrayImage> {
        let size = self.source_size().ok_or(EditorError::NoImage)?;
        Ok(compositor::render_mask(size, &self.document))
    }

    /// Pipeline output (including a pending crop) with the overlay on top,
    /// honouring layer visibility.
    pub fn composite_image(&self) -> EditorResult<RgbaImage> {
        let canvas = self.canvas.as_ref().ok_or(EditorError::NoImage)?;
        let geometry = self.transform.geometry(canvas.size(), true);
        let [width, height] = geometry.output_size;

        let mut composite = if self.layers.image {
            pipeline::render(canvas.pixels(), &self.transform, true, self.config.blur_sigma)
        } else {
            RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
        };
        if self.layers.mask {
            compositor::composite(&mut composite, &self.overlay_through(&geometry));
        }
        Ok(composite)
    }

    pub fn export_mask(&self) -> EditorResult<EncodedRaster> {
        let encoded = export::encode_mask(self.mask_image()?)?;
        info!("Exported mask {}x{}", encoded.width, encoded.height);
        Ok(encoded)
    }

    pub fn export_composite(&self) -> EditorResult<EncodedRaster> {
        let encoded = export::encode_rgba(self.composite_image()?)?;
        info!("Exported composite {}x{}", encoded.width, encoded.height);
        Ok(encoded)
    }

    /// Packs mask, composite and prompt into a request and hands it to
    /// `sink`. Nothing is sent when the prompt is blank.
    pub fn request_inpaint(&mut self, sink: &dyn InpaintSink) -> EditorResult<Uuid> {
        if self.prompt.trim().is_empty() {
            return Err(EditorError::EmptyPrompt);
        }
        let request = InpaintRequest::new(&self.prompt, self.export_mask()?, self.export_composite()?)?;
        let id = request.id;
        info!("Submitting inpaint request {id}");
        sink.submit(request);
        self.events.emit(EditorEvent::InpaintRequested { id });
        Ok(id)
    }

    pub fn request_save(&mut self, sink: &dyn SaveSink) -> EditorResult<()> {
        let composite = self.export_composite()?;
        let (width, height) = (composite.width, composite.height);
        sink.save(composite);
        self.events.emit(EditorEvent::SaveRequested { width, height });
        Ok(())
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }
}
