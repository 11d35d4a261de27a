use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PANEL_KIND_PUBLISH: &str = "publish";
pub const PANEL_KIND_LIVE_PLOT: &str = "live_plot";
pub const PANEL_KIND_BAG_PLAYER: &str = "bag_player";

#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One saved panel. `config` carries kind-specific settings and is left
/// untouched by panels of other kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDefinition {
    pub kind: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// A saved arrangement of panels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeckDefinition {
    pub name: String,
    #[serde(default)]
    pub panels: Vec<PanelDefinition>,
}

impl DeckDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            panels: Vec::new(),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), DeckError> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, DeckError> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
