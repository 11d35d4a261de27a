use super::*;
use crate::state::{NewBagDraft, NewPlotDraft, NewPublishDraft};
use serde_json::json;
use std::sync::mpsc;
use topicdeck_core::bag::DEFAULT_PLAYER_PROGRAM;
use topicdeck_core::deck::{PANEL_KIND_BAG_PLAYER, PANEL_KIND_LIVE_PLOT, PANEL_KIND_PUBLISH};
use topicdeck_core::{DeckDefinition, PanelDefinition, DEFAULT_HISTORY};

impl DeckApp {
    pub(crate) fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Deck", |ui| {
                    let label = if self.deck_name.is_empty() {
                        "Unsaved deck".to_string()
                    } else {
                        self.deck_name.clone()
                    };
                    ui.add_enabled(
                        false,
                        egui::Label::new(RichText::new(label).color(egui::Color32::from_gray(230))),
                    );
                    ui.separator();
                    if ui.button("Save Deck").clicked() {
                        self.open_save_deck_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Load Deck").clicked() {
                        self.open_load_deck_dialog();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Panels", |ui| {
                    if ui.button("New Publish Panel").clicked() {
                        self.windows.new_publish = true;
                        ui.close_menu();
                    }
                    if ui.button("New Live Plot").clicked() {
                        self.windows.new_plot = true;
                        ui.close_menu();
                    }
                    if ui.button("New Bag Player").clicked() {
                        self.windows.new_bag = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    pub(crate) fn render_overview(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Panels");
            if !self.status.is_empty() {
                ui.label(RichText::new(&self.status).weak());
            }
            ui.separator();
            if self.publishers.is_empty() && self.plots.is_empty() && self.bags.is_empty() {
                ui.label("No panels yet. Add one from the Panels menu.");
                return;
            }

            let mut remove_publish = None;
            for (idx, window) in self.publishers.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    let label = format!(
                        "Publish {}  [{}]",
                        window.panel.topic(),
                        window.panel.type_name()
                    );
                    ui.checkbox(&mut window.open, label);
                    if window.panel.is_repeating() {
                        ui.label(RichText::new("repeating").weak().small());
                    }
                    if ui.small_button("Remove").clicked() {
                        remove_publish = Some(idx);
                    }
                });
            }
            if let Some(idx) = remove_publish {
                self.publishers.remove(idx);
            }

            let mut remove_plot = None;
            for (idx, window) in self.plots.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    ui.checkbox(&mut window.open, format!("Plot {}", window.panel.spec()));
                    if ui.small_button("Remove").clicked() {
                        remove_plot = Some(idx);
                    }
                });
            }
            if let Some(idx) = remove_plot {
                self.plots.remove(idx);
            }

            let mut remove_bag = None;
            for (idx, window) in self.bags.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    let label = if window.path.is_empty() {
                        "Bag player".to_string()
                    } else {
                        format!("Bag {}", window.path)
                    };
                    ui.checkbox(&mut window.open, label);
                    if window.is_playing() {
                        ui.label(RichText::new("playing").weak().small());
                    }
                    if ui.small_button("Remove").clicked() {
                        remove_bag = Some(idx);
                    }
                });
            }
            if let Some(idx) = remove_bag {
                self.bags.remove(idx);
            }
        });
    }

    pub(crate) fn render_new_panel_dialogs(&mut self, ctx: &egui::Context) {
        if self.windows.new_publish {
            let mut open = self.windows.new_publish;
            let mut created = false;
            egui::Window::new("New Publish Panel")
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Topic:");
                        ui.text_edit_singleline(&mut self.publish_draft.topic);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Type:");
                        egui::ComboBox::from_id_source("new_publish_type")
                            .selected_text(self.publish_draft.type_name.clone())
                            .width(220.0)
                            .show_ui(ui, |ui| {
                                for name in self.registry.names() {
                                    let value = name.to_string();
                                    ui.selectable_value(
                                        &mut self.publish_draft.type_name,
                                        value,
                                        name,
                                    );
                                }
                            });
                    });
                    if let Some(err) = &self.publish_draft.error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err);
                    }
                    if styled_button(ui, "Add").clicked() {
                        match self.publish_draft.validate(&self.registry) {
                            Ok(()) => {
                                let topic = self.publish_draft.topic.trim().to_string();
                                let type_name = self.publish_draft.type_name.trim().to_string();
                                match self.add_publish_panel(&topic, &type_name) {
                                    Ok(()) => created = true,
                                    Err(err) => {
                                        self.publish_draft.error = Some(err.to_string());
                                    }
                                }
                            }
                            Err(err) => self.publish_draft.error = Some(err),
                        }
                    }
                });
            if created {
                self.publish_draft = NewPublishDraft::default();
                open = false;
            }
            self.windows.new_publish = open;
        }

        if self.windows.new_plot {
            let mut open = self.windows.new_plot;
            let mut created = false;
            egui::Window::new("New Live Plot")
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Spec:");
                        ui.text_edit_singleline(&mut self.plot_draft.spec)
                            .on_hover_text("topic:field[:field], e.g. /cmd_vel:linear.x:angular.z");
                    });
                    ui.horizontal(|ui| {
                        ui.label("History:");
                        ui.add(
                            egui::DragValue::new(&mut self.plot_draft.history)
                                .clamp_range(2..=100_000)
                                .suffix(" samples"),
                        );
                    });
                    if let Some(err) = &self.plot_draft.error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err);
                    }
                    if styled_button(ui, "Add").clicked() {
                        match self.plot_draft.validate() {
                            Ok(spec) => {
                                let history = self.plot_draft.history;
                                self.add_plot_panel(spec, history);
                                created = true;
                            }
                            Err(err) => self.plot_draft.error = Some(err),
                        }
                    }
                });
            if created {
                self.plot_draft = NewPlotDraft::default();
                open = false;
            }
            self.windows.new_plot = open;
        }

        if self.windows.new_bag {
            let mut open = self.windows.new_bag;
            let mut created = false;
            egui::Window::new("New Bag Player")
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Bag file:");
                        ui.text_edit_singleline(&mut self.bag_draft.path);
                    });
                    ui.label(RichText::new("The path can also be picked later.").weak().small());
                    if styled_button(ui, "Add").clicked() {
                        let path = self.bag_draft.path.trim().to_string();
                        self.add_bag_panel(&path);
                        created = true;
                    }
                });
            if created {
                self.bag_draft = NewBagDraft::default();
                open = false;
            }
            self.windows.new_bag = open;
        }
    }

    pub(crate) fn open_save_deck_dialog(&mut self) {
        if self.file_dialogs.save_deck_rx.is_some() {
            self.status = "Save dialog already open".to_string();
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.save_deck_rx = Some(rx);
        let default_name = if self.deck_name.is_empty() {
            "deck.json".to_string()
        } else {
            format!("{}.json", self.deck_name.replace(' ', "_"))
        };
        crate::spawn_file_dialog_thread(move || {
            let file = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name(default_name)
                .save_file();
            let _ = tx.send(file);
        });
    }

    pub(crate) fn open_load_deck_dialog(&mut self) {
        if self.file_dialogs.load_deck_rx.is_some() {
            self.status = "Load dialog already open".to_string();
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.load_deck_rx = Some(rx);
        crate::spawn_file_dialog_thread(move || {
            let file = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file();
            let _ = tx.send(file);
        });
    }

    /// Snapshot of every panel in a form `apply_deck` can rebuild from.
    pub(crate) fn deck_definition(&self) -> DeckDefinition {
        let mut deck = DeckDefinition::new(&self.deck_name);
        for window in &self.publishers {
            deck.panels.push(PanelDefinition {
                kind: PANEL_KIND_PUBLISH.to_string(),
                config: json!({
                    "topic": window.panel.topic(),
                    "type": window.panel.type_name(),
                    "rate_hz": window.panel.rate_hz,
                    "latch": window.panel.latching(),
                }),
            });
        }
        for window in &self.plots {
            deck.panels.push(PanelDefinition {
                kind: PANEL_KIND_LIVE_PLOT.to_string(),
                config: json!({
                    "spec": window.panel.spec().to_string(),
                    "history": window.panel.history(),
                }),
            });
        }
        for window in &self.bags {
            deck.panels.push(PanelDefinition {
                kind: PANEL_KIND_BAG_PLAYER.to_string(),
                config: json!({
                    "path": window.path,
                    "program": window.program,
                    "immediate": window.options.immediate,
                    "loop": window.options.loop_playback,
                    "clock": window.options.publish_clock,
                    "hz": window.options.clock_hz,
                    "queue": window.options.queue_size,
                    "rate": window.options.rate,
                }),
            });
        }
        deck
    }

    /// Replaces the current panels with the deck's. Entries that cannot be
    /// rebuilt, say a publish panel whose type is not registered here, are
    /// skipped and counted in the status line rather than failing the load.
    pub(crate) fn apply_deck(&mut self, deck: DeckDefinition) {
        self.publishers.clear();
        self.plots.clear();
        self.bags.clear();
        self.deck_name = deck.name;
        let mut skipped = 0usize;
        for panel in deck.panels {
            let config = &panel.config;
            match panel.kind.as_str() {
                PANEL_KIND_PUBLISH => {
                    let topic = config.get("topic").and_then(|v| v.as_str()).unwrap_or_default();
                    let type_name =
                        config.get("type").and_then(|v| v.as_str()).unwrap_or_default();
                    match self.add_publish_panel(topic, type_name) {
                        Ok(()) => {
                            if let Some(window) = self.publishers.last_mut() {
                                if let Some(rate) =
                                    config.get("rate_hz").and_then(|v| v.as_i64())
                                {
                                    window.panel.rate_hz = rate;
                                }
                                if config.get("latch").and_then(|v| v.as_bool()).unwrap_or(false)
                                {
                                    window.panel.set_latch(true);
                                }
                            }
                        }
                        Err(err) => {
                            log::warn!("skipping publish panel '{topic}': {err}");
                            skipped += 1;
                        }
                    }
                }
                PANEL_KIND_LIVE_PLOT => {
                    let spec_text =
                        config.get("spec").and_then(|v| v.as_str()).unwrap_or_default();
                    let history = config
                        .get("history")
                        .and_then(|v| v.as_u64())
                        .map(|h| h as usize)
                        .unwrap_or(DEFAULT_HISTORY);
                    match topicdeck_core::PlotSpec::parse(spec_text) {
                        Ok(spec) => self.add_plot_panel(spec, history),
                        Err(err) => {
                            log::warn!("skipping plot panel: {err}");
                            skipped += 1;
                        }
                    }
                }
                PANEL_KIND_BAG_PLAYER => {
                    let path =
                        config.get("path").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                    self.add_bag_panel(&path);
                    if let Some(window) = self.bags.last_mut() {
                        window.program = config
                            .get("program")
                            .and_then(|v| v.as_str())
                            .unwrap_or(DEFAULT_PLAYER_PROGRAM)
                            .to_string();
                        window.options.immediate =
                            config.get("immediate").and_then(|v| v.as_bool()).unwrap_or(false);
                        window.options.loop_playback =
                            config.get("loop").and_then(|v| v.as_bool()).unwrap_or(false);
                        window.options.publish_clock =
                            config.get("clock").and_then(|v| v.as_bool()).unwrap_or(false);
                        window.options.clock_hz = config.get("hz").and_then(|v| v.as_i64());
                        if let Some(queue) = config.get("queue").and_then(|v| v.as_i64()) {
                            window.options.queue_size = queue;
                        }
                        if let Some(rate) = config.get("rate").and_then(|v| v.as_f64()) {
                            window.options.rate = rate;
                        }
                    }
                }
                other => {
                    log::warn!("unknown panel kind '{other}' in deck");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            self.status = format!("{skipped} panel(s) could not be restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgschema::SchemaRegistry;
    use std::sync::Arc;
    use topicbus::MessageBus;
    use topicdeck_core::PlotSpec;

    fn app() -> DeckApp {
        DeckApp::new(MessageBus::new(), Arc::new(SchemaRegistry::with_builtins()))
    }

    #[test]
    fn deck_round_trip_restores_panels() {
        let mut deck_app = app();
        deck_app.deck_name = "bench".to_string();
        deck_app.add_publish_panel("/cmd_vel", "geometry_msgs/Twist").unwrap();
        deck_app.publishers[0].panel.rate_hz = 20;
        deck_app.publishers[0].panel.set_latch(true);
        deck_app.add_plot_panel(PlotSpec::parse("/cmd_vel:linear.x").unwrap(), 50);
        deck_app.add_bag_panel("/data/run.bag");
        deck_app.bags[0].options.loop_playback = true;
        deck_app.bags[0].options.clock_hz = Some(200);

        let deck = deck_app.deck_definition();
        assert_eq!(deck.name, "bench");
        assert_eq!(deck.panels.len(), 3);

        let mut restored = app();
        restored.apply_deck(deck);
        assert_eq!(restored.publishers.len(), 1);
        assert_eq!(restored.publishers[0].panel.topic(), "/cmd_vel");
        assert_eq!(restored.publishers[0].panel.rate_hz, 20);
        assert!(restored.publishers[0].panel.latching());
        assert_eq!(
            restored.plots[0].panel.spec().to_string(),
            "/cmd_vel:linear.x"
        );
        assert_eq!(restored.plots[0].panel.history(), 50);
        assert_eq!(restored.bags[0].path, "/data/run.bag");
        assert!(restored.bags[0].options.loop_playback);
        assert_eq!(restored.bags[0].options.clock_hz, Some(200));
        assert!(restored.status.is_empty());
    }

    #[test]
    fn unknown_panel_kinds_are_skipped() {
        let mut deck = DeckDefinition::new("odd");
        deck.panels.push(PanelDefinition {
            kind: "mystery".to_string(),
            config: serde_json::Value::Null,
        });
        let mut deck_app = app();
        deck_app.apply_deck(deck);
        assert!(deck_app.publishers.is_empty());
        assert!(deck_app.plots.is_empty());
        assert!(deck_app.bags.is_empty());
        assert!(deck_app.status.contains("1 panel"));
    }

    #[test]
    fn broken_entries_do_not_block_the_rest() {
        let mut deck = DeckDefinition::new("partial");
        deck.panels.push(PanelDefinition {
            kind: PANEL_KIND_PUBLISH.to_string(),
            config: json!({ "topic": "/x", "type": "no_pkg/NoSuch" }),
        });
        deck.panels.push(PanelDefinition {
            kind: PANEL_KIND_LIVE_PLOT.to_string(),
            config: json!({ "spec": "/imu:angular_velocity.z" }),
        });
        let mut deck_app = app();
        deck_app.apply_deck(deck);
        assert!(deck_app.publishers.is_empty());
        assert_eq!(deck_app.plots.len(), 1);
        assert_eq!(deck_app.plots[0].panel.history(), DEFAULT_HISTORY);
        assert!(deck_app.status.contains("1 panel"));
    }

    #[test]
    fn bag_panels_restore_without_a_player_binary() {
        let mut deck = DeckDefinition::new("bags");
        deck.panels.push(PanelDefinition {
            kind: PANEL_KIND_BAG_PLAYER.to_string(),
            config: json!({ "path": "/tmp/a.bag", "program": "rosbag2", "rate": 0.5 }),
        });
        let mut deck_app = app();
        deck_app.apply_deck(deck);
        assert_eq!(deck_app.bags.len(), 1);
        assert_eq!(deck_app.bags[0].program, "rosbag2");
        assert_eq!(deck_app.bags[0].options.rate, 0.5);
        // Omitted options fall back to defaults.
        assert_eq!(deck_app.bags[0].options.queue_size, 100);
        assert!(!deck_app.bags[0].options.immediate);
    }
}
