use super::{ListenerError, Shared};
use crate::dns::handler::Handler;
use crate::dns::parser::parse_request;
use crate::dns::response_writer::UdpResponseWriter;
use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::ReadBuf;
use tokio::net::UdpSocket;
use tracing::info;

/// Receive side of a listener socket.
pub(super) trait RecvSource: Send + Sync + 'static {
    fn poll_recv_from(
        &self,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<SocketAddr>>;
}

impl RecvSource for UdpSocket {
    fn poll_recv_from(
        &self,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<SocketAddr>> {
        UdpSocket::poll_recv_from(self, cx, buf)
    }
}

/// One UDP socket and its receive loop. Replies always go out through
/// `socket`; `source` is the same socket outside of tests.
pub(super) struct Listener<H: Handler, S: RecvSource = UdpSocket> {
    index: usize,
    socket: Arc<UdpSocket>,
    source: Arc<S>,
    local: SocketAddr,
    shared: Arc<Shared<H>>,
}

impl<H: Handler> Listener<H> {
    pub(super) fn new(index: usize, socket: UdpSocket, shared: Arc<Shared<H>>) -> Self {
        let socket = Arc::new(socket);
        Self::with_source(index, Arc::clone(&socket), socket, shared)
    }
}

impl<H: Handler, S: RecvSource> Listener<H, S> {
    pub(super) fn with_source(
        index: usize,
        socket: Arc<UdpSocket>,
        source: Arc<S>,
        shared: Arc<Shared<H>>,
    ) -> Self {
        Self {
            index,
            local: socket.local_addr().unwrap_or(shared.local_addr),
            socket,
            source,
            shared,
        }
    }

    /// Reads datagrams until the socket fails.
    pub(super) async fn serve(self) -> Result<(), ListenerError> {
        info!(listener = self.index, addr = %self.local, "Serving DNS over UDP");

        let shared = &self.shared;
        loop {
            let mut buf = shared.buffers.acquire();
            buf.resize(shared.recv_buffer_size, 0);

            let received = {
                let mut read = ReadBuf::new(&mut buf[..]);
                let result = poll_fn(|cx| self.source.poll_recv_from(cx, &mut read)).await;
                result.map(|peer| (read.filled().len(), peer))
            };
            let (len, peer) = match received {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    tokio::time::sleep(shared.read_backoff).await;
                    continue;
                }
                Err(e) => return Err(ListenerError::Read(e)),
            };

            let mut req = shared.requests.acquire();
            if parse_request(&buf[..len], &mut req).is_err() {
                continue;
            }

            let handler = Arc::clone(&shared.handler);
            let mut rw = UdpResponseWriter::new(Arc::clone(&self.socket), peer, self.local);
            shared.workers.go(async move {
                handler.serve_dns(&mut rw, &req).await;
                drop(req);
                drop(buf);
            });
        }
    }
}

/// Read errors that say nothing about the socket itself. ICMP port
/// unreachable from an earlier reply surfaces as ConnectionReset or
/// ConnectionRefused on some platforms.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::TimedOut
    )
}
