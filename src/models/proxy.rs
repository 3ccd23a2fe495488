//! Proxy model definitions
//!
//! A node link decodes into exactly one [`ParsedNode`] variant. Each variant
//! carries only the fields its protocol defines, so a missing credential is a
//! parse failure rather than an empty string discovered at generation time.

/// Represents the type of a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Shadowsocks,
    VMess,
    Trojan,
}

/// `vmess://` node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMessNode {
    pub remark: Option<String>,
    pub server: String,
    pub port: u16,
    pub user_id: String,
    pub alter_id: u32,
    /// Transport network (`tcp`, `ws`, `grpc`, ...)
    pub network: Option<String>,
    pub tls: bool,
}

/// `ss://` node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowsocksNode {
    pub remark: Option<String>,
    pub server: String,
    pub port: u16,
    pub cipher: String,
    pub password: String,
}

/// `trojan://` node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrojanNode {
    pub remark: Option<String>,
    pub server: String,
    pub port: u16,
    pub password: String,
    /// Explicit `sni`/`peer` parameter; the server name applies when absent
    pub sni: Option<String>,
}

/// Structured view of a single node link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    VMess(VMessNode),
    Shadowsocks(ShadowsocksNode),
    Trojan(TrojanNode),
}

impl ParsedNode {
    pub fn proxy_type(&self) -> ProxyType {
        match self {
            ParsedNode::VMess(_) => ProxyType::VMess,
            ParsedNode::Shadowsocks(_) => ProxyType::Shadowsocks,
            ParsedNode::Trojan(_) => ProxyType::Trojan,
        }
    }

    /// Display name carried by the link, if any
    pub fn remark(&self) -> Option<&str> {
        match self {
            ParsedNode::VMess(node) => node.remark.as_deref(),
            ParsedNode::Shadowsocks(node) => node.remark.as_deref(),
            ParsedNode::Trojan(node) => node.remark.as_deref(),
        }
    }
}
