use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::runtime;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Parse `server.host:server.port` into a socket address.
pub fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let addr = cfg.server.bind_addr();
    addr.parse().map_err(|source| StartupError::BindAddr { addr, source })
}

/// Open the store described by `cfg` and build the application router around it.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = runtime::open_store(&cfg.storage).await?;
    let state = ServerState::new(store);
    Ok(routes::build_router(state, build_cors()))
}

/// Load configuration from `CONFIG_PATH` (or `config.toml`), falling back to
/// the environment only when no file exists.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))
}

/// Build the app from `cfg` and serve it until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, base_dir = %cfg.storage.base_dir, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
