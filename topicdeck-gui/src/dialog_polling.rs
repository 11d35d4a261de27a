use crate::DeckApp;
use msgschema::FormControl;
use std::sync::mpsc;
use topicdeck_core::DeckDefinition;

impl DeckApp {
    pub(crate) fn poll_save_deck_dialog(&mut self) {
        let result = match &self.file_dialogs.save_deck_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.save_deck_rx = None;
            if let Some(path) = selection {
                if self.deck_name.is_empty() {
                    self.deck_name = path
                        .file_stem()
                        .and_then(|name| name.to_str())
                        .unwrap_or("deck")
                        .to_string();
                }
                match self.deck_definition().save_to_file(&path) {
                    Ok(()) => {
                        self.status = format!("Deck saved to {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Deck save failed: {err}");
                    }
                }
            }
        }
    }

    pub(crate) fn poll_load_deck_dialog(&mut self) {
        let result = match &self.file_dialogs.load_deck_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.load_deck_rx = None;
            if let Some(path) = selection {
                self.status.clear();
                match DeckDefinition::load_from_file(&path) {
                    Ok(deck) => {
                        self.apply_deck(deck);
                        // apply_deck reports skipped panels; keep that over the happy line.
                        if self.status.is_empty() {
                            self.status = format!("Deck loaded from {}", path.display());
                        }
                    }
                    Err(err) => {
                        self.status = format!("Deck load failed: {err}");
                    }
                }
            }
        }
    }

    pub(crate) fn poll_bag_dialog(&mut self) {
        let result = match &self.file_dialogs.bag_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.bag_rx = None;
            let target = self.file_dialogs.bag_target.take();
            if let (Some(path), Some(id)) = (selection, target) {
                if let Some(window) = self.bags.iter_mut().find(|w| w.id == id) {
                    window.path = path.to_string_lossy().to_string();
                    window.info = None;
                    window.info_error = None;
                }
            }
        }
    }

    pub(crate) fn poll_image_dialog(&mut self) {
        let result = match &self.file_dialogs.image_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.image_rx = None;
            let target = self.file_dialogs.image_target.take();
            if let (Some(path), Some((id, control_path))) = (selection, target) {
                if let Some(window) = self.publishers.iter_mut().find(|w| w.id == id) {
                    if let Ok(mut form) = window.panel.form.lock() {
                        if let Some(FormControl::ImagePath { value }) =
                            form.control_mut_at(&control_path)
                        {
                            *value = path.to_string_lossy().to_string();
                        }
                    }
                }
            }
        }
    }

    pub(crate) fn open_bag_dialog(&mut self, id: u64) {
        if self.file_dialogs.bag_rx.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.bag_rx = Some(rx);
        self.file_dialogs.bag_target = Some(id);
        crate::spawn_file_dialog_thread(move || {
            let file = rfd::FileDialog::new().add_filter("Bag", &["bag"]).pick_file();
            let _ = tx.send(file);
        });
    }

    pub(crate) fn open_image_dialog(&mut self, id: u64, control_path: Vec<String>) {
        if self.file_dialogs.image_rx.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.file_dialogs.image_rx = Some(rx);
        self.file_dialogs.image_target = Some((id, control_path));
        crate::spawn_file_dialog_thread(move || {
            let file = rfd::FileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file();
            let _ = tx.send(file);
        });
    }
}
