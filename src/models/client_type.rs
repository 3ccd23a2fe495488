use std::fmt;

/// The representation a requesting client expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientType {
    /// Base64 node list as consumed by v2ray-style clients
    #[default]
    V2Ray,
    Clash,
    SingBox,
}

impl ClientType {
    /// Target identifier understood by the conversion backend
    pub fn as_str(self) -> &'static str {
        match self {
            ClientType::V2Ray => "v2ray",
            ClientType::Clash => "clash",
            ClientType::SingBox => "singbox",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
