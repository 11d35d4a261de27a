use super::*;
use std::path::Path;
use topicdeck_core::BagPlayer;

impl DeckApp {
    pub(crate) fn render_bag_windows(&mut self, ctx: &egui::Context) {
        let mut browse: Option<u64> = None;
        for window in &mut self.bags {
            if !window.open {
                continue;
            }
            let mut open = window.open;
            let title = format!("Bag {}", bag_title(&window.path));
            egui::Window::new(title)
                .id(egui::Id::new(("bag_panel", window.id)))
                .default_size(egui::vec2(440.0, 360.0))
                .open(&mut open)
                .show(ctx, |ui| {
                    let playing = window.is_playing();
                    ui.horizontal(|ui| {
                        ui.label("Bag file:");
                        ui.add_enabled(
                            !playing,
                            egui::TextEdit::singleline(&mut window.path).desired_width(240.0),
                        );
                        if ui.add_enabled(!playing, egui::Button::new("Browse...")).clicked() {
                            browse = Some(window.id);
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("Player:");
                        ui.add_enabled(
                            !playing,
                            egui::TextEdit::singleline(&mut window.program).desired_width(120.0),
                        );
                    });
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut window.options.immediate, "Immediate");
                        ui.checkbox(&mut window.options.loop_playback, "Loop");
                        ui.checkbox(&mut window.options.publish_clock, "Clock");
                    });
                    ui.horizontal(|ui| {
                        let mut clocked = window.options.clock_hz.is_some();
                        if ui.checkbox(&mut clocked, "Clock Hz").changed() {
                            window.options.clock_hz = if clocked { Some(100) } else { None };
                        }
                        if let Some(hz) = window.options.clock_hz.as_mut() {
                            ui.add(egui::DragValue::new(hz).clamp_range(1..=10_000));
                        }
                        ui.separator();
                        ui.label("Queue:");
                        ui.add(
                            egui::DragValue::new(&mut window.options.queue_size)
                                .clamp_range(1..=100_000),
                        );
                        ui.label("Rate:");
                        ui.add(
                            egui::DragValue::new(&mut window.options.rate)
                                .clamp_range(0.01..=100.0)
                                .speed(0.1),
                        );
                    });
                    ui.separator();
                    ui.horizontal(|ui| {
                        let play_label = if playing { "Stop" } else { "Play" };
                        if styled_button(ui, play_label).clicked() {
                            if playing {
                                if let Some(player) = window.player.as_mut() {
                                    player.stop();
                                }
                                window.player = None;
                            } else {
                                let mut player =
                                    BagPlayer::with_program(&window.program, &window.path);
                                player.options = window.options.clone();
                                match player.play() {
                                    Ok(()) => {
                                        window.info_error = None;
                                        window.player = Some(player);
                                    }
                                    Err(err) => window.info_error = Some(err.to_string()),
                                }
                            }
                        }
                        if styled_button(ui, "Info").clicked() {
                            let player = BagPlayer::with_program(&window.program, &window.path);
                            match player.info() {
                                Ok(info) => {
                                    window.info = Some(info);
                                    window.info_error = None;
                                }
                                Err(err) => {
                                    window.info = None;
                                    window.info_error = Some(err.to_string());
                                }
                            }
                        }
                        if playing {
                            ui.spinner();
                            ui.label(RichText::new("playing").weak());
                        }
                    });
                    if let Some(err) = &window.info_error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err);
                    }
                    if let Some(info) = &window.info {
                        ui.separator();
                        egui::Grid::new(("bag_info", window.id))
                            .striped(true)
                            .show(ui, |ui| {
                                if let Some(duration) = info.duration {
                                    ui.label("Duration");
                                    ui.label(format!("{duration:.1} s"));
                                    ui.end_row();
                                }
                                if let Some(messages) = info.messages {
                                    ui.label("Messages");
                                    ui.label(messages.to_string());
                                    ui.end_row();
                                }
                                if let Some(size) = info.size {
                                    ui.label("Size");
                                    ui.label(format!("{size} bytes"));
                                    ui.end_row();
                                }
                            });
                        if !info.topics.is_empty() {
                            ui.add_space(4.0);
                            for topic in &info.topics {
                                let mut line =
                                    format!("{}  [{}]", topic.topic, topic.type_name);
                                if let Some(messages) = topic.messages {
                                    line.push_str(&format!("  {messages} msgs"));
                                }
                                if let Some(frequency) = topic.frequency {
                                    line.push_str(&format!("  @ {frequency} Hz"));
                                }
                                ui.label(RichText::new(line).monospace().small());
                            }
                        }
                    }
                });
            window.open = open;
        }
        if let Some(id) = browse {
            self.open_bag_dialog(id);
        }
    }
}

fn bag_title(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("player")
}
