use serde::de::IgnoredAny;
use serde::Deserialize;

use super::{parse_port, ParseError};
use crate::models::{ParsedNode, VMessNode};
use crate::utils::base64::base64_decode;

/// A JSON field of unreliable type; anything but a number or a string is
/// kept as `Other` and read as absent
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Number(u64),
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

/// The JSON document carried by a `vmess://` link
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VMessLink {
    ps: Option<LooseValue>,
    add: Option<LooseValue>,
    port: Option<LooseValue>,
    id: Option<LooseValue>,
    aid: Option<LooseValue>,
    net: Option<LooseValue>,
    tls: Option<LooseValue>,
}

/// Trimmed, non-empty text of a string field
fn text(value: Option<LooseValue>) -> Option<String> {
    match value {
        Some(LooseValue::Text(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Parse a VMess link into a [`ParsedNode`]
///
/// Format: `vmess://<base64 of a JSON document>`. `add` and `id` are required,
/// a missing `port` reads as 0 and a missing `aid` as 0. Optional fields of an
/// unexpected JSON type are ignored.
pub fn explode_vmess(vmess: &str) -> Result<ParsedNode, ParseError> {
    let encoded = vmess
        .strip_prefix("vmess://")
        .ok_or_else(|| ParseError::UnsupportedScheme(String::new()))?;

    let decoded = base64_decode(encoded).ok_or(ParseError::InvalidBase64)?;
    let link: VMessLink =
        serde_json::from_str(&decoded).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let server = text(link.add).ok_or(ParseError::MissingField("add"))?;
    let user_id = text(link.id).ok_or(ParseError::MissingField("id"))?;

    let port = match link.port {
        Some(LooseValue::Number(port)) => {
            u16::try_from(port).map_err(|_| ParseError::InvalidPort(port.to_string()))?
        }
        Some(LooseValue::Text(port)) if !port.trim().is_empty() => parse_port(&port)?,
        _ => 0,
    };

    let alter_id = match link.aid {
        Some(LooseValue::Number(aid)) => u32::try_from(aid).unwrap_or(0),
        Some(LooseValue::Text(aid)) => aid.trim().parse().unwrap_or(0),
        _ => 0,
    };

    Ok(ParsedNode::VMess(VMessNode {
        remark: text(link.ps),
        server,
        port,
        user_id,
        alter_id,
        network: text(link.net),
        tls: text(link.tls).as_deref() == Some("tls"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64::base64_encode;

    fn vmess_link(json: &str) -> String {
        format!("vmess://{}", base64_encode(json))
    }

    #[test]
    fn test_explode_vmess() {
        let link = vmess_link(
            r#"{"add":"h.example","port":443,"id":"u1","aid":0,"net":"ws","tls":"tls","ps":"N1"}"#,
        );
        let node = explode_vmess(&link).unwrap();
        assert_eq!(
            node,
            ParsedNode::VMess(VMessNode {
                remark: Some("N1".to_string()),
                server: "h.example".to_string(),
                port: 443,
                user_id: "u1".to_string(),
                alter_id: 0,
                network: Some("ws".to_string()),
                tls: true,
            })
        );
    }

    #[test]
    fn test_explode_vmess_string_numbers() {
        let link = vmess_link(
            r#"{"v":"2","add":"1.2.3.4","port":"8080","id":"abc","aid":"64","net":"tcp","tls":""}"#,
        );
        let ParsedNode::VMess(node) = explode_vmess(&link).unwrap() else {
            panic!("expected a vmess node");
        };
        assert_eq!(node.port, 8080);
        assert_eq!(node.alter_id, 64);
        assert!(!node.tls);
        assert_eq!(node.remark, None);
    }

    #[test]
    fn test_explode_vmess_odd_field_types() {
        let link = vmess_link(
            r#"{"add":"h.example","port":443,"id":"u1","aid":null,"net":["ws"],"tls":false,"ps":7}"#,
        );
        let ParsedNode::VMess(node) = explode_vmess(&link).unwrap() else {
            panic!("expected a vmess node");
        };
        assert_eq!(node.server, "h.example");
        assert_eq!(node.user_id, "u1");
        assert_eq!(node.alter_id, 0);
        assert_eq!(node.network, None);
        assert!(!node.tls);
        assert_eq!(node.remark, None);

        // A required field of the wrong type is still missing.
        let link = vmess_link(r#"{"add":"h.example","port":443,"id":true}"#);
        assert_eq!(explode_vmess(&link), Err(ParseError::MissingField("id")));
    }

    #[test]
    fn test_explode_vmess_missing_fields() {
        let link = vmess_link(r#"{"port":443,"id":"u1"}"#);
        assert_eq!(explode_vmess(&link), Err(ParseError::MissingField("add")));

        let link = vmess_link(r#"{"add":"h.example","port":443}"#);
        assert_eq!(explode_vmess(&link), Err(ParseError::MissingField("id")));
    }

    #[test]
    fn test_explode_vmess_bad_payload() {
        assert_eq!(
            explode_vmess("vmess://%%%not-base64"),
            Err(ParseError::InvalidBase64)
        );
        assert!(matches!(
            explode_vmess(&vmess_link("not json")),
            Err(ParseError::InvalidJson(_))
        ));
        assert!(matches!(
            explode_vmess(&vmess_link(r#"{"add":"h","id":"u","port":70000}"#)),
            Err(ParseError::InvalidPort(_))
        ));
    }
}
