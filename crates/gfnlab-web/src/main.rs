//! GFN Lab Web Server
//!
//! Run with: cargo run -p gfnlab-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use gfnlab_config::Config;
use gfnlab_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gfnlab=debug,info")),
        )
        .init();

    info!("GFN Lab starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let addr = config.server.socket_addr()?;

    let state = AppState::from_config(&config)?;
    info!(
        "{} experiments in catalog, mail via {}",
        state.catalog.len(),
        state.notifier.name()
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
