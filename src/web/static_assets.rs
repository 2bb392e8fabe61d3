//! Embedded static assets.
//!
//! In release mode the files are compiled into the binary; in debug mode
//! rust-embed reads them from `static/` at runtime.

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
#[include = "*.css"]
#[include = "*.js"]
#[include = "*.ico"]
#[include = "*.png"]
struct StaticAssets;

/// Serve one asset; no directory listings.
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                content.data,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found 404").into_response(),
    }
}
