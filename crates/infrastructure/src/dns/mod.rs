pub mod handler;
pub mod name;
pub mod parser;
pub mod pool;
pub mod record;
pub mod reply;
pub mod response_writer;
pub mod server;
pub mod worker_pool;

pub use handler::Handler;
pub use parser::parse_request;
pub use pool::{Pool, PoolStats, Pooled, Recycle};
pub use response_writer::{MemoryResponseWriter, ResponseWriter, UdpResponseWriter};
pub use server::{BoundServer, ListenerError, Server, ServerError, ServerOptions};
pub use worker_pool::WorkerPool;
