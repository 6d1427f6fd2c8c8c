use fastdns_domain::config::ServerConfig;
use fastdns_infrastructure::dns::{Handler, Server, ServerOptions};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_dns_server<H: Handler>(
    config: &ServerConfig,
    handler: Arc<H>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = config.dns_addr()?;
    let server = Server::new(handler)
        .with_options(ServerOptions::from(config))
        .with_shutdown_token(shutdown);

    info!(
        bind_address = %addr,
        listeners = server.listener_count(),
        max_restarts = config.max_restarts,
        "Starting DNS server"
    );

    server.listen_and_serve(addr).await?;

    info!("DNS server stopped");
    Ok(())
}
