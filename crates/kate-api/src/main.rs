//! kate-api - dashboard HTTP backend for K-A-T-E One

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kate_api::state::AppState;
use kate_api::router;
use kate_core::defaults::SERVER_PORT;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::from_env()?;
    let app = router(state);

    let port = std::env::var("KATE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(SERVER_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "K-A-T-E One backend listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
