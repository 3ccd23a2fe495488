#![cfg(feature = "web-api")]

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use tempfile::TempDir;

use sublinks::models::AppState;
use sublinks::utils::base64_encode;
use sublinks::web_handlers;
use sublinks::Settings;

const NODE: &str = "trojan://pw@t.example:443#Tokyo";

fn app_state(dir: &TempDir) -> Arc<AppState> {
    let settings = Settings {
        my_token: "secret".to_string(),
        main_data: NODE.to_string(),
        subscribe_file: dir
            .path()
            .join("subscribe.json")
            .to_string_lossy()
            .into_owned(),
        proxy: "NONE".to_string(),
        ..Settings::default()
    };
    Arc::new(AppState::new(settings).unwrap())
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(web_handlers::config),
        )
        .await
    };
}

#[actix_web::test]
async fn test_unauthorized_gets_welcome_page() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/sub?token=wrong")
        .insert_header(("User-Agent", "v2rayN/6.23"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/html; charset=UTF-8"
    );
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Welcome to nginx!"));
}

#[actix_web::test]
async fn test_plain_subscription() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/secret")
        .insert_header(("User-Agent", "v2rayN/6.23"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("Profile-Update-Interval").unwrap(), "6");
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Pages-SUB-Convert"));

    let body = test::read_body(resp).await;
    assert_eq!(body, base64_encode(NODE).as_bytes());
}

#[actix_web::test]
async fn test_browser_sees_decoded_list() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/?token=secret")
        .insert_header((
            "User-Agent",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0",
        ))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, NODE.as_bytes());
}

#[actix_web::test]
async fn test_clash_subscription_generated_locally() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/secret/clash")
        .insert_header(("User-Agent", "ClashMetaForAndroid/2.8.9"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let yaml = String::from_utf8_lossy(&body);

    assert!(yaml.contains("name: Tokyo"));
    assert!(yaml.contains("MATCH,"));
}

#[actix_web::test]
async fn test_subscribe_api() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(app_state(&dir));

    // Unauthorized
    let req = test::TestRequest::get().uri("/api/subscribe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // Add
    let req = test::TestRequest::post()
        .uri("/api/subscribe?token=secret")
        .set_json(json!({ "url": "https://a.example/sub" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Bad body
    let req = test::TestRequest::post()
        .uri("/api/subscribe?token=secret")
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // List
    let req = test::TestRequest::get()
        .uri("/api/subscribe?token=secret")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!({ "urls": ["https://a.example/sub"] }));

    // Remove
    let req = test::TestRequest::delete()
        .uri("/api/subscribe?token=secret")
        .set_json(json!({ "url": "https://a.example/sub" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/subscribe?token=secret")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!({ "urls": [] }));
}
