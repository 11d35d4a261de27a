use eframe::egui;
use msgschema::{MessageValue, SchemaRegistry};
use std::sync::Arc;
use std::time::Duration;
use topicbus::MessageBus;
use topicdeck_core::bag::DEFAULT_PLAYER_PROGRAM;
use topicdeck_core::{
    BagInfo, BagOptions, BagPlayer, LivePlotPanel, PanelError, PlotSpec, PublishPanel,
};

mod dialog_polling;
mod form_renderer;
mod state;
mod ui;

use state::{DeckWindows, FileDialogs, NewBagDraft, NewPlotDraft, NewPublishDraft};

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "topicdeck".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
}

/// Opens the deck window on the given bus and blocks until it is closed.
/// Panels created in the GUI publish and subscribe through `bus`, so demo
/// talkers or other panels sharing the bus show up live.
pub fn run_gui(
    config: GuiConfig,
    bus: MessageBus<MessageValue>,
    registry: Arc<SchemaRegistry>,
) -> Result<(), GuiError> {
    let mut options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.width, config.height]),
        ..Default::default()
    };
    // Vsync stalls the repaint loop while the window is occluded.
    options.vsync = false;

    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Box::new(DeckApp::new(bus, registry))),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}

struct PublishWindow {
    id: u64,
    panel: PublishPanel,
    open: bool,
}

struct PlotWindow {
    id: u64,
    panel: LivePlotPanel,
    open: bool,
}

struct BagWindow {
    id: u64,
    path: String,
    program: String,
    options: BagOptions,
    player: Option<BagPlayer>,
    info: Option<BagInfo>,
    info_error: Option<String>,
    open: bool,
}

impl BagWindow {
    fn is_playing(&mut self) -> bool {
        self.player.as_mut().map(BagPlayer::is_playing).unwrap_or(false)
    }
}

struct DeckApp {
    bus: MessageBus<MessageValue>,
    registry: Arc<SchemaRegistry>,
    publishers: Vec<PublishWindow>,
    plots: Vec<PlotWindow>,
    bags: Vec<BagWindow>,
    // Window ids stay stable when panels are removed, so egui keeps
    // positions attached to the right panel.
    next_panel_id: u64,
    deck_name: String,
    file_dialogs: FileDialogs,
    windows: DeckWindows,
    publish_draft: NewPublishDraft,
    plot_draft: NewPlotDraft,
    bag_draft: NewBagDraft,
    status: String,
}

impl DeckApp {
    fn new(bus: MessageBus<MessageValue>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            bus,
            registry,
            publishers: Vec::new(),
            plots: Vec::new(),
            bags: Vec::new(),
            next_panel_id: 1,
            deck_name: String::new(),
            file_dialogs: FileDialogs::new(),
            windows: DeckWindows::default(),
            publish_draft: NewPublishDraft::default(),
            plot_draft: NewPlotDraft::default(),
            bag_draft: NewBagDraft::default(),
            status: String::new(),
        }
    }

    fn alloc_panel_id(&mut self) -> u64 {
        let id = self.next_panel_id;
        self.next_panel_id += 1;
        id
    }

    fn add_publish_panel(&mut self, topic: &str, type_name: &str) -> Result<(), PanelError> {
        let panel = PublishPanel::new(&self.bus, Arc::clone(&self.registry), topic, type_name)?;
        let id = self.alloc_panel_id();
        self.publishers.push(PublishWindow {
            id,
            panel,
            open: true,
        });
        Ok(())
    }

    fn add_plot_panel(&mut self, spec: PlotSpec, history: usize) {
        let panel = LivePlotPanel::new(&self.bus, spec, history);
        let id = self.alloc_panel_id();
        self.plots.push(PlotWindow {
            id,
            panel,
            open: true,
        });
    }

    fn add_bag_panel(&mut self, path: &str) {
        let id = self.alloc_panel_id();
        self.bags.push(BagWindow {
            id,
            path: path.to_string(),
            program: DEFAULT_PLAYER_PROGRAM.to_string(),
            options: BagOptions::default(),
            player: None,
            info: None,
            info_error: None,
            open: true,
        });
    }
}

pub(crate) fn spawn_file_dialog_thread<F, T>(f: F) -> std::thread::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::spawn(f)
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.style_mut(|style| {
            style.interaction.selectable_labels = false;
        });
        self.poll_save_deck_dialog();
        self.poll_load_deck_dialog();
        self.poll_bag_dialog();
        self.poll_image_dialog();

        // Subscriptions queue between frames; drain them whether or not the
        // plot window is currently open.
        for window in &mut self.plots {
            window.panel.pump();
        }

        let repeating = self.publishers.iter().any(|w| w.panel.is_repeating());
        let playing = self.bags.iter_mut().any(BagWindow::is_playing);
        if repeating || playing || !self.plots.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if !ctx.input(|i| i.focused) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.windows.new_publish = false;
            self.windows.new_plot = false;
            self.windows.new_bag = false;
        }

        self.render_menu_bar(ctx);
        self.render_overview(ctx);
        self.render_publish_windows(ctx);
        self.render_plot_windows(ctx);
        self.render_bag_windows(ctx);
        self.render_new_panel_dialogs(ctx);
    }
}
