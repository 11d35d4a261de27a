use msgschema::SchemaRegistry;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use topicdeck_core::{PlotSpec, DEFAULT_HISTORY};

#[derive(Debug, Default)]
pub(crate) struct DeckWindows {
    pub new_publish: bool,
    pub new_plot: bool,
    pub new_bag: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct NewPublishDraft {
    pub topic: String,
    pub type_name: String,
    pub error: Option<String>,
}

impl Default for NewPublishDraft {
    fn default() -> Self {
        Self {
            topic: String::new(),
            type_name: "std_msgs/String".to_string(),
            error: None,
        }
    }
}

impl NewPublishDraft {
    pub fn validate(&self, registry: &SchemaRegistry) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic must not be empty".to_string());
        }
        let type_name = self.type_name.trim();
        if !registry.contains(type_name) {
            return Err(format!("unknown message type '{type_name}'"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NewPlotDraft {
    pub spec: String,
    pub history: usize,
    pub error: Option<String>,
}

impl Default for NewPlotDraft {
    fn default() -> Self {
        Self {
            spec: String::new(),
            history: DEFAULT_HISTORY,
            error: None,
        }
    }
}

impl NewPlotDraft {
    pub fn validate(&self) -> Result<PlotSpec, String> {
        PlotSpec::parse(&self.spec).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NewBagDraft {
    pub path: String,
}

pub(crate) struct FileDialogs {
    pub save_deck_rx: Option<Receiver<Option<PathBuf>>>,
    pub load_deck_rx: Option<Receiver<Option<PathBuf>>>,
    pub bag_rx: Option<Receiver<Option<PathBuf>>>,
    pub bag_target: Option<u64>,
    pub image_rx: Option<Receiver<Option<PathBuf>>>,
    pub image_target: Option<(u64, Vec<String>)>,
}

impl FileDialogs {
    pub fn new() -> Self {
        Self {
            save_deck_rx: None,
            load_deck_rx: None,
            bag_rx: None,
            bag_target: None,
            image_rx: None,
            image_target: None,
        }
    }
}

impl Default for FileDialogs {
    fn default() -> Self {
        Self::new()
    }
}
