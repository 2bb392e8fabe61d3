//! notepad web server binary.
//!
//! Loads the configuration, connects the configured storage backend and hands
//! the resulting `dyn Database` to the web layer, which never learns which
//! engine is behind it.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::Diagnostic;
use notepad::auth::Recaptcha;
use notepad::config::{Config, ConfigError};
use notepad::db::{self, ConnectionManager, DbError};
use notepad::web::{self, AppState, Views, WebError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    #[diagnostic(code(notepad::binary::database))]
    Database(#[from] DbError),

    #[error("Template error: {0}")]
    #[diagnostic(code(notepad::binary::view))]
    View(#[from] minijinja::Error),

    #[error("Web server error: {0}")]
    #[diagnostic(code(notepad::binary::web))]
    Web(#[from] WebError),
}

#[derive(Parser)]
#[command(name = "notepad")]
#[command(author, version, about = "Multi-backend notepad web server", long_about = None)]
struct Cli {
    /// Config file (defaults to $NOTEPAD_CONFIG, then config/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    web::init_tracing();
    serve(cli).await?;
    Ok(())
}

async fn serve(cli: Cli) -> Result<(), BinaryError> {
    let path = Config::resolve_path(cli.config);
    let config = Config::load(&path)?;
    info!(config = %path.display(), backend = %config.database.kind, "Configuration loaded");

    let manager = Arc::new(ConnectionManager::connect(config.database.clone()).await?);
    let db = db::open(manager)?;

    // A store that is down at startup is retried lazily on first use.
    if db.check_connection().await {
        db.migrate().await?;
        info!("Database schema ready");
    } else {
        warn!("Database unreachable, skipping migrations");
    }

    let views = Views::new(&config.view)?;
    let recaptcha = Recaptcha::new(config.recaptcha.clone());
    let state = AppState::new(db, views, recaptcha);

    web::run(&config, state).await?;
    Ok(())
}
