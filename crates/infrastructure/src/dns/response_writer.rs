use super::pool::Recycle;
use socket2::SockRef;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;

/// Destination of one response message.
pub trait ResponseWriter: Send {
    /// Writes one complete message, returning the bytes accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn remote_addr(&self) -> SocketAddr;

    fn local_addr(&self) -> SocketAddr;
}

/// Writes back to the datagram's sender over the listener's socket.
///
/// Listeners share their socket with every in-flight task; each `write` is a
/// single `sendto`, so concurrent writers never interleave datagrams. The send
/// bypasses tokio's readiness tracking; it only fails when the kernel itself
/// refuses the datagram.
#[derive(Debug, Clone)]
pub struct UdpResponseWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    local: SocketAddr,
}

impl UdpResponseWriter {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr, local: SocketAddr) -> Self {
        Self {
            socket,
            peer,
            local,
        }
    }
}

impl ResponseWriter for UdpResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SockRef::from(&*self.socket).send_to(buf, &self.peer.into())
    }

    fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }
}

/// Collects the response in memory for transports that wrap DNS messages
/// (DNS-over-HTTPS bodies, tests).
#[derive(Debug, Clone)]
pub struct MemoryResponseWriter {
    pub data: Vec<u8>,
    pub raddr: SocketAddr,
    pub laddr: SocketAddr,
}

const UNSPECIFIED: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);

impl MemoryResponseWriter {
    pub fn new(raddr: SocketAddr, laddr: SocketAddr) -> Self {
        Self {
            data: Vec::new(),
            raddr,
            laddr,
        }
    }
}

impl Default for MemoryResponseWriter {
    fn default() -> Self {
        Self::new(UNSPECIFIED, UNSPECIFIED)
    }
}

impl Recycle for MemoryResponseWriter {
    fn recycle(&mut self) {
        self.data.clear();
        self.raddr = UNSPECIFIED;
        self.laddr = UNSPECIFIED;
    }
}

impl ResponseWriter for MemoryResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn remote_addr(&self) -> SocketAddr {
        self.raddr
    }

    fn local_addr(&self) -> SocketAddr {
        self.laddr
    }
}
