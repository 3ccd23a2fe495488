pub mod clash_output;

#[cfg(test)]
mod tests {
    use super::clash_output::{ClashProxy, ClashYamlOutput, CommonProxyOptions};

    #[test]
    fn test_clash_proxy_serializes_type_tag() {
        let mut output = ClashYamlOutput::with_general_defaults();
        output.proxies.push(ClashProxy::Shadowsocks {
            common: CommonProxyOptions::new("example-ss".to_string(), "example.com".to_string(), 8388),
            cipher: "aes-256-gcm".to_string(),
            password: "password".to_string(),
        });

        let yaml = serde_yaml::to_string(&output).unwrap();
        assert!(yaml.contains("socks-port: 7891"));
        assert!(yaml.contains("type: ss"));
        assert!(yaml.contains("cipher: aes-256-gcm"));
        assert!(!yaml.contains("tls:"));

        let parsed: ClashYamlOutput = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.proxies[0].name(), "example-ss");
    }
}
