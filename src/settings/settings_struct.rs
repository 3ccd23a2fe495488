use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interfaces::MergeLimits;
use crate::utils::http::{parse_proxy, ProxyConfig};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "SUB_";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Settings structure to hold global configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    // Access
    pub my_token: String,
    pub file_name: String,
    /// Hours between client refreshes
    pub sub_update_time: u32,

    // Telegram
    pub tg_bot_token: String,
    pub tg_chat_id: String,
    pub tg_notify_level: u8,

    // Conversion backend
    pub subconverter: String,
    pub sub_config: String,

    // Node data
    pub main_data: String,
    pub subscribe_urls: Vec<String>,
    pub subscribe_file: String,

    // Server
    pub listen_address: String,
    pub listen_port: u16,

    // Outbound limits, durations in seconds
    pub max_concurrent_fetches: usize,
    pub fetch_timeout: u64,
    pub merge_deadline: u64,
    pub backend_timeout: u64,
    pub reload_interval: u64,
    /// `SYSTEM`, `NONE`, or a proxy URL
    pub proxy: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            my_token: "auto".to_string(),
            file_name: "Pages-SUB-Convert".to_string(),
            sub_update_time: 6,
            tg_bot_token: String::new(),
            tg_chat_id: String::new(),
            tg_notify_level: 0,
            subconverter: "apiurl.v1.mk".to_string(),
            sub_config: "https://raw.githubusercontent.com/cmliu/ACL4SSR/main/Clash/config/ACL4SSR_Online_MultiCountry.ini"
                .to_string(),
            main_data: String::new(),
            subscribe_urls: Vec::new(),
            subscribe_file: "subscribe.json".to_string(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            max_concurrent_fetches: 8,
            fetch_timeout: 10,
            merge_deadline: 30,
            backend_timeout: 15,
            reload_interval: 30,
            proxy: "SYSTEM".to_string(),
        }
    }
}

pub fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

pub fn default_listen_port() -> u16 {
    8080
}

impl Settings {
    /// Load from `path` when given, then apply the process environment
    pub fn load(path: Option<&str>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) if !path.is_empty() => Self::load_from_file(path)?,
            _ => Self::default(),
        };
        settings.apply_env_overrides(std::env::vars())?;
        Ok(settings)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        if !Path::new(path).exists() {
            info!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;
        let settings = Self::load_from_content(&content)?;
        info!("Loaded settings from {}", path);
        Ok(settings)
    }

    /// Parse config text, TOML if it parses as such, YAML otherwise
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = if toml::from_str::<toml::Table>(content).is_ok() {
            toml::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };

        if settings.listen_address.trim().is_empty() {
            settings.listen_address = default_listen_address();
        }
        Ok(settings)
    }

    /// Apply `SUB_*` overrides and `PORT` from `vars`; unknown keys are ignored
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if key == "PORT" {
                self.listen_port = parse_value(&key, &value)?;
                continue;
            }
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "MY_TOKEN" => self.my_token = value,
                "FILE_NAME" => self.file_name = value,
                "SUB_UPDATE_TIME" => self.sub_update_time = parse_value(&key, &value)?,
                "TG_BOT_TOKEN" => self.tg_bot_token = value,
                "TG_CHAT_ID" => self.tg_chat_id = value,
                "TG_NOTIFY_LEVEL" => self.tg_notify_level = parse_value(&key, &value)?,
                "SUBCONVERTER" => self.subconverter = value,
                "SUB_CONFIG" => self.sub_config = value,
                "MAIN_DATA" => self.main_data = value,
                "SUBSCRIBE_URLS" => self.subscribe_urls = split_list(&value),
                "SUBSCRIBE_FILE" => self.subscribe_file = value,
                "LISTEN_ADDRESS" => self.listen_address = value,
                "LISTEN_PORT" => self.listen_port = parse_value(&key, &value)?,
                "MAX_CONCURRENT_FETCHES" => {
                    self.max_concurrent_fetches = parse_value(&key, &value)?
                }
                "FETCH_TIMEOUT" => self.fetch_timeout = parse_value(&key, &value)?,
                "MERGE_DEADLINE" => self.merge_deadline = parse_value(&key, &value)?,
                "BACKEND_TIMEOUT" => self.backend_timeout = parse_value(&key, &value)?,
                "RELOAD_INTERVAL" => self.reload_interval = parse_value(&key, &value)?,
                "PROXY" => self.proxy = value,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        parse_proxy(&self.proxy)
    }

    pub fn merge_limits(&self) -> MergeLimits {
        MergeLimits {
            max_concurrent: self.max_concurrent_fetches.max(1),
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            deadline: Duration::from_secs(self.merge_deadline),
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout)
    }

    pub fn reload_interval(&self) -> Duration {
        // A zero period would make the reload ticker panic.
        Duration::from_secs(self.reload_interval.max(1))
    }

    pub fn listen_on(&self) -> (String, u16) {
        (self.listen_address.clone(), self.listen_port)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Split a comma or newline separated list, dropping blanks
fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
