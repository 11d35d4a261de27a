use super::*;
use egui_plot::{Legend, Line, Plot, PlotPoints};

const SERIES_COLORS: &[egui::Color32] = &[
    egui::Color32::from_rgb(0x1f, 0x77, 0xb4),
    egui::Color32::from_rgb(0xff, 0x7f, 0x0e),
    egui::Color32::from_rgb(0x2c, 0xa0, 0x2c),
    egui::Color32::from_rgb(0xd6, 0x27, 0x28),
    egui::Color32::from_rgb(0x94, 0x67, 0xbd),
    egui::Color32::from_rgb(0x8c, 0x56, 0x4b),
];

impl DeckApp {
    pub(crate) fn render_plot_windows(&mut self, ctx: &egui::Context) {
        for window in &mut self.plots {
            if !window.open {
                continue;
            }
            let mut open = window.open;
            let title = format!("Plot {}", window.panel.spec().topic);
            egui::Window::new(title)
                .id(egui::Id::new(("plot_panel", window.id)))
                .default_size(egui::vec2(480.0, 320.0))
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(RichText::new(window.panel.spec().to_string()).weak());
                    let plot_height = (ui.available_height() - 20.0).max(120.0);
                    Plot::new(format!("live_plot_{}", window.id))
                        .legend(Legend::default())
                        .allow_scroll(false)
                        .x_axis_label("sample")
                        .height(plot_height)
                        .show(ui, |plot_ui| {
                            for (i, series) in window.panel.series.iter().enumerate() {
                                if series.points.is_empty() {
                                    continue;
                                }
                                let points: PlotPoints =
                                    series.points.iter().map(|(x, y)| [*x, *y]).collect();
                                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                                plot_ui.line(Line::new(points).color(color).name(&series.path));
                            }
                        });
                    ui.label(
                        RichText::new(format!("window: {} samples", window.panel.history()))
                            .weak()
                            .small(),
                    );
                });
            window.open = open;
        }
    }
}
