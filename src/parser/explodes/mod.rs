pub mod ss;
pub mod trojan;
pub mod vmess;

use thiserror::Error;

use crate::models::ParsedNode;

/// Why a link could not be decoded into a [`ParsedNode`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported link scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("payload is not valid base64")]
    InvalidBase64,

    #[error("invalid vmess document: {0}")]
    InvalidJson(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid port `{0}`")]
    InvalidPort(String),

    #[error("malformed link: {0}")]
    Malformed(String),
}

/// Explode a proxy link into a [`ParsedNode`]
///
/// This function detects the type of proxy link and calls the appropriate
/// parser. Parsing performs no I/O and never mutates its input.
pub fn explode(link: &str) -> Result<ParsedNode, ParseError> {
    let link = link.trim();

    if link.starts_with("vmess://") {
        vmess::explode_vmess(link)
    } else if link.starts_with("ss://") {
        ss::explode_ss(link)
    } else if link.starts_with("trojan://") {
        trojan::explode_trojan(link)
    } else {
        let scheme = link.split_once("://").map_or("", |(scheme, _)| scheme);
        Err(ParseError::UnsupportedScheme(scheme.to_string()))
    }
}

/// Parse a port that may arrive as text, e.g. from a query or a JSON string
pub(crate) fn parse_port(port: &str) -> Result<u16, ParseError> {
    port.trim()
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidPort(port.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    #[test]
    fn test_explode_dispatch() {
        let node = explode("  trojan://pw@h.example:443#T  ").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Trojan);

        let node = explode("ss://YWVzLTI1Ni1nY206cHc=@h.example:8388").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Shadowsocks);
    }

    #[test]
    fn test_explode_unsupported() {
        assert_eq!(
            explode("vless://uuid@h.example:443"),
            Err(ParseError::UnsupportedScheme("vless".to_string()))
        );
        assert_eq!(
            explode("not a link"),
            Err(ParseError::UnsupportedScheme(String::new()))
        );
    }
}
