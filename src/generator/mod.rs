//! Local profile generation
//!
//! `yaml` holds the serializable Clash document model, `exports` turns node
//! links into that model.

pub mod exports;
pub mod yaml;

// Re-export format converters
pub use exports::proxy_to_clash::proxy_to_clash;
