use super::*;

impl DeckApp {
    pub(crate) fn render_publish_windows(&mut self, ctx: &egui::Context) {
        let mut browse: Option<(u64, Vec<String>)> = None;
        for window in &mut self.publishers {
            if !window.open {
                continue;
            }
            let mut open = window.open;
            let title = format!("Publish {}", window.panel.topic());
            egui::Window::new(title)
                .id(egui::Id::new(("publish_panel", window.id)))
                .default_size(egui::vec2(380.0, 420.0))
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(RichText::new(window.panel.type_name()).weak());
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, true])
                        .max_height(300.0)
                        .show(ui, |ui| {
                            if let Ok(mut form) = window.panel.form.lock() {
                                let response = form_renderer::render_form(ui, &mut form);
                                if let Some(path) = response.browse {
                                    browse = Some((window.id, path));
                                }
                            }
                        });
                    ui.separator();
                    ui.horizontal(|ui| {
                        if styled_button(ui, "Send").clicked() {
                            window.panel.send_once();
                        }
                        let repeating = window.panel.is_repeating();
                        let repeat_label = if repeating { "Stop" } else { "Repeat" };
                        if styled_button(ui, repeat_label).clicked() {
                            if repeating {
                                let _ = window.panel.stop_repeat();
                            } else if let Err(err) = window.panel.start_repeat() {
                                window.panel.last_error = Some(err.to_string());
                            }
                        }
                        // The repeat interval is fixed when the loop starts.
                        ui.add_enabled(
                            !repeating,
                            egui::DragValue::new(&mut window.panel.rate_hz)
                                .clamp_range(1..=1000)
                                .suffix(" Hz"),
                        );
                        let mut latched = window.panel.latching();
                        if ui.checkbox(&mut latched, "Latch").changed() {
                            window.panel.set_latch(latched);
                        }
                    });
                    if let Some(err) = &window.panel.last_error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err);
                    }
                });
            window.open = open;
        }
        if let Some((id, control_path)) = browse {
            self.open_image_dialog(id, control_path);
        }
    }
}
