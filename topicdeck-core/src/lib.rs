//! Panels that drive the message bus: form-based publishing, live plots,
//! bag playback and the deck files that tie them together.

pub mod bag;
pub mod deck;
pub mod liveplot;
pub mod publish;

pub use bag::{BagError, BagInfo, BagOptions, BagPlayer, BagTopicInfo};
pub use deck::{DeckDefinition, DeckError, PanelDefinition};
pub use liveplot::{FieldSeries, LivePlotPanel, PlotSpec, DEFAULT_HISTORY};
pub use publish::{PublishPanel, RepeatHandle, DEFAULT_RATE_HZ};

#[derive(thiserror::Error, Debug)]
pub enum PanelError {
    #[error("schema error: {0}")]
    Schema(#[from] msgschema::SchemaError),
    #[error("form error: {0}")]
    Form(#[from] msgschema::FormError),
    #[error("bus error: {0}")]
    Bus(#[from] topicbus::BusError),
    #[error("plot spec must look like 'topic:field[:field]', got '{0}'")]
    PlotSpec(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
