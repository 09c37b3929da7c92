use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use hiring_dashboard::config::Config;
use hiring_dashboard::routes::build_router;
use hiring_dashboard::state::AppState;
use hiring_dashboard::submissions::JsonFileStore;
use hiring_dashboard::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    telemetry::init(env!("CARGO_CRATE_NAME"), &config.rust_log);

    info!("Starting hiring dashboard API v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonFileStore::new(&config.data_file);
    store.ensure_data_file().await?;
    info!("Record store at {}", store.path().display());

    let state = AppState {
        store: Arc::new(store),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
