use fastdns_domain::Request;
use fastdns_infrastructure::dns::{Handler, MemoryResponseWriter, Pool};
use std::net::SocketAddr;
use std::sync::Arc;

const MAX_IDLE_POOLED: usize = 256;

pub struct DohState<H: Handler> {
    pub handler: Arc<H>,
    pub requests: Pool<Request>,
    pub writers: Pool<MemoryResponseWriter>,
    /// Reported to the handler as the writer's local address.
    pub local_addr: Option<SocketAddr>,
}

impl<H: Handler> DohState<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            requests: Pool::requests(MAX_IDLE_POOLED),
            writers: Pool::new(MAX_IDLE_POOLED, MemoryResponseWriter::default),
            local_addr: None,
        }
    }

    pub fn with_local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }
}

// `H` itself need not be `Clone`.
impl<H: Handler> Clone for DohState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            requests: self.requests.clone(),
            writers: self.writers.clone(),
            local_addr: self.local_addr,
        }
    }
}
