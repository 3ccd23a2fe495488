use std::collections::HashSet;

use log::{debug, error};

use crate::constants::clash::{DIRECT, PLACEHOLDER_PORT, PLACEHOLDER_SERVER, PROXY_GROUP_NAME};
use crate::generator::yaml::clash_output::{
    ClashProxy, ClashProxyGroup, ClashYamlOutput, CommonProxyOptions,
};
use crate::models::ParsedNode;
use crate::parser::explode;

/// Convert a parsed node to its Clash proxy entry
///
/// `fallback_name` applies when the link carries no display name.
pub fn node_to_clash(node: ParsedNode, fallback_name: String) -> ClashProxy {
    let name = node
        .remark()
        .map(str::to_string)
        .unwrap_or(fallback_name);

    match node {
        ParsedNode::VMess(vmess) => {
            let mut common = CommonProxyOptions::new(name, vmess.server, vmess.port);
            common.tls = Some(vmess.tls);
            ClashProxy::VMess {
                common,
                uuid: vmess.user_id,
                alter_id: vmess.alter_id,
                cipher: "auto".to_string(),
                network: vmess.network,
            }
        }
        ParsedNode::Shadowsocks(ss) => ClashProxy::Shadowsocks {
            common: CommonProxyOptions::new(name, ss.server, ss.port),
            cipher: ss.cipher,
            password: ss.password,
        },
        ParsedNode::Trojan(trojan) => {
            let mut common = CommonProxyOptions::new(name, trojan.server.clone(), trojan.port);
            common.sni = Some(trojan.sni.unwrap_or(trojan.server));
            ClashProxy::Trojan {
                common,
                password: trojan.password,
            }
        }
    }
}

/// Generic entry standing in for a link that could not be parsed
pub fn placeholder_proxy(name: String) -> ClashProxy {
    ClashProxy::Http {
        common: CommonProxyOptions::new(name, PLACEHOLDER_SERVER.to_string(), PLACEHOLDER_PORT),
        username: None,
        password: None,
    }
}

/// Claim `name`, or `name 2`, `name 3`, ... when it is already taken
///
/// Clash rejects profiles where two proxies, or a proxy and a group, share a
/// name.
fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut suffix = 2;
    while used.contains(&candidate) {
        candidate = format!("{} {}", name, suffix);
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Build a Clash profile from node links
///
/// Every link yields exactly one proxy entry: parsed links keep their own
/// fields, anything else becomes a placeholder named `Node-<n>`. Repeated
/// names get a numeric suffix. All entries
/// land in one selector group together with `DIRECT`, and a single `MATCH`
/// rule routes everything through that group.
///
/// Returns `None` when there are no links, or when serialization fails.
pub fn proxy_to_clash(links: &[String]) -> Option<String> {
    if links.is_empty() {
        return None;
    }

    let mut output = ClashYamlOutput::with_general_defaults();
    let mut used_names: HashSet<String> = [DIRECT, PROXY_GROUP_NAME]
        .into_iter()
        .map(str::to_string)
        .collect();

    for (index, link) in links.iter().enumerate() {
        let fallback_name = format!("Node-{}", index + 1);
        let mut proxy = match explode(link) {
            Ok(node) => {
                debug!("Link #{} parsed as {:?}", index + 1, node.proxy_type());
                node_to_clash(node, fallback_name)
            }
            Err(e) => {
                debug!("Using placeholder for unparsed link #{}: {}", index + 1, e);
                placeholder_proxy(fallback_name)
            }
        };
        let name = unique_name(proxy.name(), &mut used_names);
        proxy.common_mut().name = name;
        output.proxies.push(proxy);
    }

    let mut group_members: Vec<String> = output
        .proxies
        .iter()
        .map(|proxy| proxy.name().to_string())
        .collect();
    group_members.push(DIRECT.to_string());

    output.proxy_groups.push(ClashProxyGroup::Select {
        name: PROXY_GROUP_NAME.to_string(),
        proxies: group_members,
    });
    output.rules.push(format!("MATCH,{}", PROXY_GROUP_NAME));

    match serde_yaml::to_string(&output) {
        Ok(result) => Some(result),
        Err(e) => {
            error!("Clash profile serialization failed: {}", e);
            None
        }
    }
}
