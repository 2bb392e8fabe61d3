use axum::extract::Path;
use axum::http::{StatusCode, header};

use crate::web::static_assets::serve_static;

#[tokio::test]
async fn serves_stylesheet_with_mime_type() {
    let response = serve_static(Path("css/global.css".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn serves_script() {
    let response = serve_static(Path("js/global.js".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("javascript"));
}

#[tokio::test]
async fn missing_asset_is_404() {
    let response = serve_static(Path("css/missing.css".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn templates_are_not_served() {
    let response = serve_static(Path("../templates/base.html".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
