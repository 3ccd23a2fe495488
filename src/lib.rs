pub mod constants;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod notify;
pub mod parser;
pub mod registry;
pub mod settings;
pub mod utils;
#[cfg(feature = "web-api")]
pub mod web_handlers;

// Re-export the main node types for easier access
pub use models::{ClientType, ParsedNode, ProxyType};

pub use interfaces::{FormatConverter, NodeMerger};
pub use settings::Settings;
