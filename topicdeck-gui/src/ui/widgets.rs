//! Shared widgets used across the deck windows.

use super::BUTTON_SIZE;
use eframe::egui;

/// A button with the same footprint everywhere, so rows of panel controls
/// line up between windows.
pub(crate) fn styled_button(ui: &mut egui::Ui, label: impl Into<egui::WidgetText>) -> egui::Response {
    ui.add_sized(BUTTON_SIZE, egui::Button::new(label).min_size(BUTTON_SIZE))
}
