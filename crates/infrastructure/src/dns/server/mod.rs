//! UDP DNS server: one listener per CPU sharing the port, a worker pool for
//! the handlers and a supervisor restarting crashed listeners.

mod listener;
mod socket;
mod supervisor;

pub use socket::bind_udp_socket;
pub use supervisor::Supervisor;

use crate::dns::handler::Handler;
use crate::dns::pool::Pool;
use crate::dns::worker_pool::{WorkerPool, DEFAULT_IDLE_TIMEOUT};
use fastdns_domain::config::ServerConfig;
use fastdns_domain::Request;
use listener::Listener;
use std::io;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Largest number of released buffers and requests each pool keeps around.
const MAX_IDLE_POOLED: usize = 1024;

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Failed to bind listener socket: {0}")]
    Bind(#[source] io::Error),

    #[error("Socket read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Listener panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Too many listener restarts ({0})")]
    TooManyRestarts(usize),
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Listener count; `None` means one per CPU.
    pub listeners: Option<usize>,
    pub max_restarts: usize,
    pub worker_idle_timeout: Duration,
    pub read_backoff: Duration,
    pub recv_buffer_size: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            listeners: None,
            max_restarts: 200,
            worker_idle_timeout: DEFAULT_IDLE_TIMEOUT,
            read_backoff: Duration::from_millis(10),
            recv_buffer_size: 4096,
        }
    }
}

impl From<&ServerConfig> for ServerOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            listeners: config.listeners,
            max_restarts: config.max_restarts,
            worker_idle_timeout: config.worker_idle_timeout(),
            read_backoff: config.read_backoff(),
            recv_buffer_size: config.recv_buffer_size,
        }
    }
}

/// State every listener of one server shares.
pub(crate) struct Shared<H: Handler> {
    handler: Arc<H>,
    workers: WorkerPool,
    buffers: Pool<Vec<u8>>,
    requests: Pool<Request>,
    recv_buffer_size: usize,
    read_backoff: Duration,
    local_addr: SocketAddr,
}

pub struct Server<H: Handler> {
    handler: Arc<H>,
    options: ServerOptions,
    shutdown: CancellationToken,
}

impl<H: Handler> Server<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            options: ServerOptions::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: ServerOptions) -> Self {
        self.options = options;
        self
    }

    /// Cancelling `token` stops every listener and makes serving return `Ok`.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Number of listeners [`Server::bind`] opens. Only Linux balances
    /// datagrams across SO_REUSEPORT sockets, so elsewhere it is always 1.
    pub fn listener_count(&self) -> usize {
        if !cfg!(target_os = "linux") {
            return 1;
        }
        self.options
            .listeners
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Binds every listener socket up front. Nothing is served until
    /// [`BoundServer::serve`]; a bind failure is returned as is.
    pub fn bind(self, addr: SocketAddr) -> Result<BoundServer<H>, ServerError> {
        let count = self.listener_count();

        let first = bind_or_log(addr)?;
        // Port 0 resolves on the first bind; the rest must join that port.
        let local_addr = first.local_addr().unwrap_or(addr);
        let mut sockets = Vec::with_capacity(count);
        sockets.push(first);
        for _ in 1..count {
            sockets.push(bind_or_log(local_addr)?);
        }

        info!(addr = %local_addr, listeners = count, "DNS server listening");

        let shared = Arc::new(Shared {
            handler: self.handler,
            workers: WorkerPool::new(self.options.worker_idle_timeout),
            buffers: Pool::byte_buffers(MAX_IDLE_POOLED, self.options.recv_buffer_size),
            requests: Pool::requests(MAX_IDLE_POOLED),
            recv_buffer_size: self.options.recv_buffer_size,
            read_backoff: self.options.read_backoff,
            local_addr,
        });

        Ok(BoundServer {
            sockets,
            shared,
            max_restarts: self.options.max_restarts,
            shutdown: self.shutdown,
        })
    }

    /// Binds and serves until shutdown or until listeners crash more than
    /// `max_restarts` times.
    pub async fn listen_and_serve(self, addr: SocketAddr) -> Result<(), ServerError> {
        self.bind(addr)?.serve().await
    }
}

fn bind_or_log(addr: SocketAddr) -> Result<UdpSocket, ServerError> {
    bind_udp_socket(addr).map_err(|source| {
        error!(addr = %addr, error = %source, "Failed to bind DNS socket");
        ServerError::Bind { addr, source }
    })
}

/// A server whose sockets are open but not yet read.
pub struct BoundServer<H: Handler> {
    sockets: Vec<UdpSocket>,
    shared: Arc<Shared<H>>,
    max_restarts: usize,
    shutdown: CancellationToken,
}

impl<H: Handler> BoundServer<H> {
    pub fn local_addr(&self) -> SocketAddr {
        self.shared.local_addr
    }

    pub fn listener_count(&self) -> usize {
        self.sockets.len()
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.shared.workers
    }

    pub async fn serve(self) -> Result<(), ServerError> {
        let count = self.sockets.len();
        let mut initial: Vec<Option<UdpSocket>> = self.sockets.into_iter().map(Some).collect();
        let shared = self.shared;

        let supervisor = Supervisor::new(self.max_restarts, self.shutdown);
        supervisor
            .run(count, move |index| {
                let shared = Arc::clone(&shared);
                let socket = initial.get_mut(index - 1).and_then(Option::take);
                async move {
                    let socket = match socket {
                        Some(socket) => socket,
                        None => bind_udp_socket(shared.local_addr).map_err(ListenerError::Bind)?,
                    };
                    Listener::new(index, socket, shared).serve().await
                }
            })
            .await
    }
}
