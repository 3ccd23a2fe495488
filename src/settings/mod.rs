//! Settings module
//!
//! Configuration is read from a TOML or YAML file and then overridden from
//! the environment.

pub mod settings_struct;

pub use settings_struct::{Settings, SettingsError, ENV_PREFIX};
