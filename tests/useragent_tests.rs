use sublinks::{
    utils::useragent::{detect_client_type, is_browser},
    ClientType,
};

#[test]
fn test_detect_client_type() {
    // Test Clash family
    assert_eq!(detect_client_type("ClashMetaForAndroid/2.8.9.Meta"), ClientType::Clash);
    assert_eq!(detect_client_type("clash-verge/v1.3.8"), ClientType::Clash);
    assert_eq!(detect_client_type("Stash/2.4 Clash/1.9.0"), ClientType::Clash);

    // Test sing-box, with and without the hyphen
    assert_eq!(detect_client_type("sing-box 1.8.0"), ClientType::SingBox);
    assert_eq!(detect_client_type("SFA/1.8.0 (singbox)"), ClientType::SingBox);

    // Test plain list clients
    assert_eq!(detect_client_type("v2rayN/6.23"), ClientType::V2Ray);
    assert_eq!(detect_client_type(""), ClientType::V2Ray);
}

#[test]
fn test_detect_client_type_precedence() {
    // NekoBox mentions clash but wants the plain list
    assert_eq!(detect_client_type("NekoBox/Android 1.2.9 (clash)"), ClientType::V2Ray);

    // clash is checked before sing-box
    assert_eq!(detect_client_type("clash sing-box"), ClientType::Clash);
    assert_eq!(
        detect_client_type("nekobox clash sing-box"),
        ClientType::SingBox
    );
}

#[test]
fn test_is_browser() {
    assert!(is_browser(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)"
    ));
    assert!(!is_browser("Mozilla/5.0 sing-box"));
    assert!(!is_browser("v2rayN/6.23"));
}
