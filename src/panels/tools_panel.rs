use egui::{Button, ComboBox, Slider, TextEdit};

use crate::MaskEditorApp;
use crate::components::ToolButton;
use crate::state::EditorState;
use crate::tool::{BRUSH_SIZE_RANGE, ToolMode};
use crate::transform::{ADJUSTMENT_RANGE, FilterPreset};

pub fn tools_panel(app: &mut MaskEditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                source_section(app, ui);
                ui.separator();

                let has_image = app.editor().has_image();
                ui.add_enabled_ui(has_image, |ui| {
                    tool_section(app.editor_mut(), ui);
                    ui.separator();
                    transform_section(app.editor_mut(), ui);
                    ui.separator();
                    layer_section(app.editor_mut(), ui);
                    ui.separator();
                    history_section(app.editor_mut(), ui);
                    ui.separator();
                    output_section(app, ui);
                });

                if let Some(status) = app.status() {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
}

fn source_section(app: &mut MaskEditorApp, ui: &mut egui::Ui) {
    ui.heading("Image");
    ui.horizontal(|ui| {
        let response = ui.add(TextEdit::singleline(app.source_input_mut()).hint_text("Path or URL"));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Open").clicked() || submitted {
            app.open_source_input();
        }
    });
    if app.editor().is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading…");
        });
    } else if let Some([width, height]) = app.editor().source_size() {
        ui.label(format!("{width} × {height}"));
    }
}

fn tool_section(editor: &mut EditorState, ui: &mut egui::Ui) {
    ui.heading("Tools");
    let in_gesture = editor.interaction().in_gesture();
    ui.horizontal(|ui| {
        for tool in ToolMode::ALL {
            let button = ToolButton::new(tool, editor.tool() == tool).enabled(!in_gesture);
            if button.show(ui).clicked() {
                log::info!("Tool selected from UI: {}", tool.label());
                editor.set_tool(tool);
            }
        }
    });

    let mut brush_size = editor.settings().brush_size();
    if ui
        .add(Slider::new(&mut brush_size, BRUSH_SIZE_RANGE).text("Brush size"))
        .changed()
    {
        editor.set_brush_size(brush_size);
    }

    ui.horizontal(|ui| {
        let mut color = editor.settings().color();
        if ui.color_edit_button_srgba(&mut color).changed() {
            editor.set_brush_color(color);
        }
        ui.label("Brush colour");
    });

    if editor.interaction().is_cropping() {
        ui.label("Drag the corners to crop.");
        ui.horizontal(|ui| {
            if ui.button("Apply crop").clicked() {
                editor.commit_crop();
            }
            if ui.button("Cancel").clicked() {
                editor.cancel_crop();
            }
        });
    }
}

fn transform_section(editor: &mut EditorState, ui: &mut egui::Ui) {
    ui.heading("Transform");
    let idle = editor.interaction().is_idle();
    ui.horizontal(|ui| {
        if ui.add_enabled(idle, Button::new("⟲")).on_hover_text("Rotate left").clicked() {
            editor.rotate_left();
        }
        if ui.add_enabled(idle, Button::new("⟳")).on_hover_text("Rotate right").clicked() {
            editor.rotate_right();
        }
        if ui.add_enabled(idle, Button::new("⇔")).on_hover_text("Flip horizontally").clicked() {
            editor.flip_x();
        }
        if ui.add_enabled(idle, Button::new("⇕")).on_hover_text("Flip vertically").clicked() {
            editor.flip_y();
        }
    });

    let transform = *editor.transform();
    let mut filter = transform.filter();
    ComboBox::from_label("Filter")
        .selected_text(filter.label())
        .show_ui(ui, |ui| {
            for preset in FilterPreset::ALL {
                ui.selectable_value(&mut filter, preset, preset.label());
            }
        });
    if filter != transform.filter() {
        editor.set_filter(filter);
    }

    let mut brightness = transform.brightness();
    if ui
        .add(Slider::new(&mut brightness, ADJUSTMENT_RANGE).text("Brightness"))
        .changed()
    {
        editor.set_brightness(brightness);
    }
    let mut contrast = transform.contrast();
    if ui.add(Slider::new(&mut contrast, ADJUSTMENT_RANGE).text("Contrast")).changed() {
        editor.set_contrast(contrast);
    }
    let mut saturation = transform.saturation();
    if ui
        .add(Slider::new(&mut saturation, ADJUSTMENT_RANGE).text("Saturation"))
        .changed()
    {
        editor.set_saturation(saturation);
    }

    let can_reset = idle && (transform.has_geometry() || transform.has_color());
    if ui.add_enabled(can_reset, Button::new("Reset transform")).clicked() {
        editor.reset_transform();
    }
}

fn layer_section(editor: &mut EditorState, ui: &mut egui::Ui) {
    ui.heading("Layers");
    let mut layers = editor.layers();
    if ui.checkbox(&mut layers.image, "Image").changed() {
        editor.set_image_visible(layers.image);
    }
    if ui.checkbox(&mut layers.mask, "Mask").changed() {
        editor.set_mask_visible(layers.mask);
    }
}

fn history_section(editor: &mut EditorState, ui: &mut egui::Ui) {
    let idle = editor.interaction().is_idle();
    ui.horizontal(|ui| {
        if ui.add_enabled(idle && editor.can_undo(), Button::new("Undo")).clicked() {
            editor.undo();
        }
        if ui.add_enabled(idle && editor.can_redo(), Button::new("Redo")).clicked() {
            editor.redo();
        }
        let has_mask = !editor.document().is_empty();
        if ui.add_enabled(has_mask, Button::new("Clear mask")).clicked() {
            editor.clear_mask();
        }
    });
}

fn output_section(app: &mut MaskEditorApp, ui: &mut egui::Ui) {
    ui.heading("Inpaint");
    let mut prompt = app.editor().prompt().to_owned();
    if ui
        .add(TextEdit::multiline(&mut prompt).hint_text("Describe what to paint").desired_rows(3))
        .changed()
    {
        app.editor_mut().set_prompt(prompt);
    }

    ui.horizontal(|ui| {
        let has_prompt = !app.editor().prompt().trim().is_empty();
        if ui.add_enabled(has_prompt, Button::new("Inpaint")).clicked() {
            app.request_inpaint();
        }
        if ui.button("Save").clicked() {
            app.request_save();
        }
    });

    let queued = app.outbox().inpaint_count();
    if queued > 0 {
        ui.label(format!("{queued} inpaint request(s) queued"));
    }
}
