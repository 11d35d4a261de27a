use eframe::egui;
use eframe::egui::RichText;

use crate::form_renderer;
use crate::DeckApp;

mod bag;
mod decks;
mod plot;
mod publish;
mod widgets;

pub(crate) const BUTTON_SIZE: egui::Vec2 = egui::vec2(88.0, 26.0);

use widgets::styled_button;
