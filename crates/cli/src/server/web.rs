use axum::Router;
use fastdns_api::{create_doh_routes_with_state, DohState};
use fastdns_infrastructure::dns::Handler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_doh_server<H: Handler>(
    bind_addr: SocketAddr,
    handler: Arc<H>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        bind_address = %local_addr,
        doh_url = format!("http://{}/dns-query", local_addr),
        "Starting DNS-over-HTTPS server"
    );

    let app = create_app(handler, local_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    info!("DNS-over-HTTPS server stopped");
    Ok(())
}

fn create_app<H: Handler>(handler: Arc<H>, local_addr: SocketAddr) -> Router {
    create_doh_routes_with_state(DohState::new(handler).with_local_addr(local_addr))
}
