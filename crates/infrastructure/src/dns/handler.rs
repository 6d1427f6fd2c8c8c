use super::response_writer::ResponseWriter;
use async_trait::async_trait;
use fastdns_domain::Request;

/// Decides the answer for one query.
///
/// Both arguments are reclaimed as soon as `serve_dns` returns; the borrows
/// keep implementations from holding on to them. A handler should write one
/// message to `rw` (or nothing, to drop the query).
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn serve_dns(&self, rw: &mut dyn ResponseWriter, req: &Request);
}
