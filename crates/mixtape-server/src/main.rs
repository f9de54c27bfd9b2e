use std::sync::Arc;

use mixtape_room::{CleanupScheduler, RoomRegistry};
use mixtape_server::gateway::Gateway;
use mixtape_server::http::{self, AppState};
use mixtape_server::{config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let registry = Arc::new(RoomRegistry::new());
    let cleanup = Arc::new(CleanupScheduler::with_delay(
        Arc::clone(&registry),
        config::cleanup_delay(),
    ));
    let gateway = Arc::new(Gateway::new(Arc::clone(&registry), Arc::clone(&cleanup)));

    let http_listener = tokio::net::TcpListener::bind(config::http_addr()).await?;
    let ws_listener = tokio::net::TcpListener::bind(config::ws_addr()).await?;
    tracing::info!(http = %config::http_addr(), ws = %config::ws_addr(), "listening");

    let router = http::router(AppState { registry, cleanup });
    let http_api = async move {
        axum::serve(http_listener, router)
            .await
            .map_err(anyhow::Error::from)
    };
    let ws_gateway = async move {
        gateway
            .run(ws_listener)
            .await
            .map_err(anyhow::Error::from)
    };
    tokio::try_join!(http_api, ws_gateway)?;
    Ok(())
}
