use clap::Parser;
use fastdns_domain::CliOverrides;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod handler;
mod server;

use handler::StaticAnswerHandler;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "fastdns")]
#[command(version)]
#[command(about = "fastdns - low-allocation UDP DNS server")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Number of UDP listeners (defaults to the CPU count on Linux)
    #[arg(short = 'l', long)]
    listeners: Option<usize>,

    /// Serve DNS-over-HTTPS on this port
    #[arg(long)]
    doh_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        listeners: cli.listeners,
        doh_port: cli.doh_port,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting fastdns v{}", env!("CARGO_PKG_VERSION"));

    let handler = Arc::new(StaticAnswerHandler::from_config(&config.answers)?);
    let shutdown = CancellationToken::new();

    let doh_task = match config.server.doh_addr()? {
        Some(addr) => {
            let handler = Arc::clone(&handler);
            let shutdown = shutdown.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = server::start_doh_server(addr, handler, shutdown).await {
                    error!(error = %e, "DNS-over-HTTPS server error");
                }
            }))
        }
        None => None,
    };

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received shutdown signal");
                    shutdown.cancel();
                }
                Err(e) => warn!(error = %e, "Unable to listen for shutdown signal"),
            }
        }
    });

    let result = server::start_dns_server(&config.server, handler, shutdown.clone()).await;
    if let Err(e) = &result {
        error!(error = %e, "DNS server error");
    }

    shutdown.cancel();
    if let Some(task) = doh_task {
        let _ = task.await;
    }

    info!("Server shutdown complete");
    result
}
