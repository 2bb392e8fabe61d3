//! Server-rendered web interface.
//!
//! Conventional plumbing around the data layer: sessions, CSRF tokens, flash
//! messages, HTML views and the page handlers.

mod acl;
mod csrf;
mod error;
mod handlers;
mod routes;
mod session;
mod state;
mod static_assets;
mod view;

#[cfg(test)]
mod csrf_test;
#[cfg(test)]
mod session_test;
#[cfg(test)]
mod static_assets_test;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub use error::WebError;
pub use handlers::GENERIC_ERROR;
pub use routes::{create_router, session_layer};
pub use session::{Flash, FlashClass, SessionData, open_store, spawn_expired_cleanup};
pub use state::AppState;
pub use view::Views;

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notepad=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the web server until it fails.
pub async fn run(config: &Config, state: AppState) -> Result<(), WebError> {
    let store = open_store(&config.session.store).await?;
    let cleanup = spawn_expired_cleanup(store.clone());

    let app = create_router(state, session_layer(&config.session, store))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Web server listening on http://{}", addr);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await;
    cleanup.abort();
    served?;
    Ok(())
}
