//! Turns a message form into egui widgets, one control per editable field.

use eframe::egui;
use msgschema::{FormControl, FormEntry, FormModel};

pub(crate) struct FormResponse {
    pub changed: bool,
    /// Set when a file-picker control's Browse button was clicked; holds the
    /// control's path through nested groups.
    pub browse: Option<Vec<String>>,
}

pub(crate) fn render_form(ui: &mut egui::Ui, form: &mut FormModel) -> FormResponse {
    let mut response = FormResponse {
        changed: false,
        browse: None,
    };
    if form.is_empty() {
        ui.label("This message type has no editable fields.");
        return response;
    }
    let mut prefix = Vec::new();
    render_group(ui, form, &mut prefix, &mut response);
    response
}

fn render_group(
    ui: &mut egui::Ui,
    form: &mut FormModel,
    prefix: &mut Vec<String>,
    out: &mut FormResponse,
) {
    for (name, entry) in &mut form.entries {
        match entry {
            FormEntry::Control(control) => render_control(ui, name, control, prefix, out),
            FormEntry::Group(group) => {
                prefix.push(name.clone());
                egui::CollapsingHeader::new(name.as_str())
                    .default_open(true)
                    .show(ui, |ui| render_group(ui, group, prefix, out));
                prefix.pop();
            }
        }
    }
}

fn render_control(
    ui: &mut egui::Ui,
    name: &str,
    control: &mut FormControl,
    prefix: &[String],
    out: &mut FormResponse,
) {
    match control {
        FormControl::FloatSlider { value, min, max } => {
            out.changed |= ui.add(egui::Slider::new(value, *min..=*max).text(name)).changed();
        }
        FormControl::IntSlider { value, min, max } => {
            out.changed |= ui.add(egui::Slider::new(value, *min..=*max).text(name)).changed();
        }
        FormControl::TextBox { value } => {
            ui.horizontal(|ui| {
                ui.label(name);
                out.changed |= ui.text_edit_singleline(value).changed();
            });
        }
        FormControl::ImagePath { value } => {
            ui.horizontal(|ui| {
                ui.label(name);
                out.changed |= ui.text_edit_singleline(value).changed();
                if ui.button("Browse...").clicked() {
                    let mut path = prefix.to_vec();
                    path.push(name.to_string());
                    out.browse = Some(path);
                }
            });
        }
    }
}
