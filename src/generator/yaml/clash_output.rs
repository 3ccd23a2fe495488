use serde::{Deserialize, Serialize};

fn is_empty_option_string(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, str::is_empty)
}

/// Represents a complete Clash configuration output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashYamlOutput {
    // General settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socks_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_lan: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub external_controller: Option<String>,

    // Proxy settings
    #[serde(default)]
    pub proxies: Vec<ClashProxy>,
    #[serde(default)]
    pub proxy_groups: Vec<ClashProxyGroup>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl ClashYamlOutput {
    /// General section shared by every generated profile
    pub fn with_general_defaults() -> Self {
        Self {
            port: Some(7890),
            socks_port: Some(7891),
            allow_lan: Some(true),
            mode: Some("Rule".to_string()),
            log_level: Some("info".to_string()),
            external_controller: Some("127.0.0.1:9090".to_string()),
            proxies: Vec::new(),
            proxy_groups: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// Common proxy options that can be used across different proxy types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonProxyOptions {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub sni: Option<String>,
}

impl CommonProxyOptions {
    /// Create a new CommonProxyOptions with default values
    pub fn new(name: String, server: String, port: u16) -> Self {
        Self {
            name,
            server,
            port,
            tls: None,
            sni: None,
        }
    }
}

/// Represents a single proxy in Clash configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClashProxy {
    #[serde(rename = "ss")]
    Shadowsocks {
        #[serde(flatten)]
        common: CommonProxyOptions,
        cipher: String,
        password: String,
    },
    #[serde(rename = "vmess")]
    VMess {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(rename = "alterId")]
        alter_id: u32,
        cipher: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        network: Option<String>,
    },
    #[serde(rename = "trojan")]
    Trojan {
        #[serde(flatten)]
        common: CommonProxyOptions,
        password: String,
    },
    #[serde(rename = "http")]
    Http {
        #[serde(flatten)]
        common: CommonProxyOptions,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
}

impl ClashProxy {
    pub fn common(&self) -> &CommonProxyOptions {
        match self {
            ClashProxy::Shadowsocks { common, .. }
            | ClashProxy::VMess { common, .. }
            | ClashProxy::Trojan { common, .. }
            | ClashProxy::Http { common, .. } => common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonProxyOptions {
        match self {
            ClashProxy::Shadowsocks { common, .. }
            | ClashProxy::VMess { common, .. }
            | ClashProxy::Trojan { common, .. }
            | ClashProxy::Http { common, .. } => common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }
}

/// Represents a proxy group in Clash configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClashProxyGroup {
    #[serde(rename = "select")]
    Select { name: String, proxies: Vec<String> },
}
