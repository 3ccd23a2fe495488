use super::{parse_port, ParseError};
use crate::models::{ParsedNode, ShadowsocksNode};
use crate::utils::base64::base64_decode;
use crate::utils::url::url_decode;

/// Parse a Shadowsocks link into a [`ParsedNode`]
///
/// Format: `ss://<base64(method:password)>@<host>:<port>[#name]`. A plain
/// `method:password` user info (SIP002 with AEAD-2022 ciphers) is accepted as
/// well, as is the legacy form where the whole `method:password@host:port`
/// part is encoded. Anything after the port (`/?plugin=...`) is ignored.
pub fn explode_ss(ss: &str) -> Result<ParsedNode, ParseError> {
    let content = ss
        .strip_prefix("ss://")
        .ok_or_else(|| ParseError::UnsupportedScheme(String::new()))?;

    let (content, remark) = match content.split_once('#') {
        Some((content, name)) => (content, Some(url_decode(name))),
        None => (content, None),
    };

    // Legacy links encode the whole `method:password@host:port` part.
    let legacy;
    let content = if content.contains('@') {
        content
    } else {
        legacy = base64_decode(content).ok_or(ParseError::InvalidBase64)?;
        legacy.as_str()
    };

    let (secret, address) = content.split_once('@').ok_or_else(|| {
        ParseError::Malformed("missing '@' between credentials and server".to_string())
    })?;

    let secret = url_decode(secret);
    let user_info = match base64_decode(&secret) {
        Some(decoded) => decoded,
        None if secret.contains(':') => secret,
        None => return Err(ParseError::InvalidBase64),
    };

    // Only the first two fields count, as in `method:password`.
    let mut fields = user_info.split(':');
    let cipher = fields
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("method"))?;
    let password = fields
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("password"))?;

    let address = address.split(['/', '?']).next().unwrap_or_default();

    let (server, port) = address
        .rsplit_once(':')
        .ok_or(ParseError::MissingField("port"))?;
    let server = server.trim_start_matches('[').trim_end_matches(']');
    if server.is_empty() {
        return Err(ParseError::MissingField("server"));
    }
    let port = parse_port(port)?;

    Ok(ParsedNode::Shadowsocks(ShadowsocksNode {
        remark: remark.filter(|name| !name.trim().is_empty()),
        server: server.to_string(),
        port,
        cipher: cipher.to_string(),
        password: password.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64::base64_encode;

    #[test]
    fn test_explode_ss() {
        let link = format!("ss://{}@h.example:8388#Name", base64_encode("aes-256-gcm:pw"));
        assert_eq!(
            explode_ss(&link).unwrap(),
            ParsedNode::Shadowsocks(ShadowsocksNode {
                remark: Some("Name".to_string()),
                server: "h.example".to_string(),
                port: 8388,
                cipher: "aes-256-gcm".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_explode_ss_variants() {
        // IPv6 server, encoded remark, plugin suffix
        let link = "ss://YWVzLTEyOC1nY206c2VjcmV0@[2001:db8::1]:443/?plugin=obfs-local#Hong%20Kong";
        let ParsedNode::Shadowsocks(node) = explode_ss(link).unwrap() else {
            panic!("expected a shadowsocks node");
        };
        assert_eq!(node.cipher, "aes-128-gcm");
        assert_eq!(node.password, "secret");
        assert_eq!(node.server, "2001:db8::1");
        assert_eq!(node.port, 443);
        assert_eq!(node.remark.as_deref(), Some("Hong Kong"));

        let link = "ss://2022-blake3-aes-128-gcm:a2V5@h.example:9000";
        let ParsedNode::Shadowsocks(node) = explode_ss(link).unwrap() else {
            panic!("expected a shadowsocks node");
        };
        assert_eq!(node.cipher, "2022-blake3-aes-128-gcm");
        assert_eq!(node.password, "a2V5");
        assert_eq!(node.remark, None);

        let link = format!("ss://{}#Legacy", base64_encode("chacha20-ietf-poly1305:pw@1.2.3.4:8000"));
        let ParsedNode::Shadowsocks(node) = explode_ss(&link).unwrap() else {
            panic!("expected a shadowsocks node");
        };
        assert_eq!(node.cipher, "chacha20-ietf-poly1305");
        assert_eq!(node.server, "1.2.3.4");
        assert_eq!(node.port, 8000);
        assert_eq!(node.remark.as_deref(), Some("Legacy"));
    }

    #[test]
    fn test_explode_ss_missing_pieces() {
        assert!(matches!(
            explode_ss("ss://YWVzLTI1Ni1nY206cHc="),
            Err(ParseError::Malformed(_))
        ));
        assert_eq!(
            explode_ss(&format!("ss://{}@h.example:8388", base64_encode("aes-256-gcm"))),
            Err(ParseError::MissingField("password"))
        );
        assert_eq!(
            explode_ss(&format!("ss://{}@h.example", base64_encode("aes-256-gcm:pw"))),
            Err(ParseError::MissingField("port"))
        );
        assert!(matches!(
            explode_ss(&format!("ss://{}@h.example:http", base64_encode("aes-256-gcm:pw"))),
            Err(ParseError::InvalidPort(_))
        ));
    }
}
