//! Route configuration.

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use super::handlers::{self, index, login, notepad, register};
use super::state::AppState;
use super::{acl, static_assets};
use crate::config::SessionInfo;

/// Session layer over `store`, configured from the `Session` section.
pub fn session_layer(
    info: &SessionInfo,
    store: SqliteStore,
) -> SessionManagerLayer<SqliteStore> {
    let options = &info.options;
    SessionManagerLayer::new(store)
        .with_name(info.name.clone())
        .with_path(options.path.clone())
        .with_secure(options.secure)
        .with_http_only(options.http_only)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(options.max_age)))
}

/// Create the application router.
pub fn create_router(state: AppState, sessions: SessionManagerLayer<SqliteStore>) -> Router {
    // Only reachable while logged out
    let guest_routes = Router::new()
        .route("/login", get(login::login_get).post(login::login_post))
        .route(
            "/register",
            get(register::register_get).post(register::register_post),
        )
        .route_layer(middleware::from_fn(acl::disallow_auth));

    // Only reachable while logged in
    let member_routes = Router::new()
        .route("/notepad", get(notepad::read))
        .route(
            "/notepad/create",
            get(notepad::create_get).post(notepad::create_post),
        )
        .route(
            "/notepad/update/{id}",
            get(notepad::update_get).post(notepad::update_post),
        )
        .route("/notepad/delete/{id}", get(notepad::delete))
        .route_layer(middleware::from_fn(acl::disallow_anon));

    Router::new()
        .route("/", get(index::index))
        .route("/about", get(index::about))
        .route("/logout", get(login::logout))
        .route("/static/{*path}", get(static_assets::serve_static))
        .merge(guest_routes)
        .merge(member_routes)
        .fallback(handlers::not_found)
        .layer(sessions)
        .with_state(state)
}
