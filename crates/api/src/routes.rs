use crate::handlers;
use crate::state::DohState;
use axum::{routing::get, Router};
use fastdns_infrastructure::dns::Handler;
use std::sync::Arc;

pub const DOH_PATH: &str = "/dns-query";

pub fn create_doh_routes<H: Handler>(handler: Arc<H>) -> Router {
    create_doh_routes_with_state(DohState::new(handler))
}

pub fn create_doh_routes_with_state<H: Handler>(state: DohState<H>) -> Router {
    Router::new()
        .route(
            DOH_PATH,
            get(handlers::dns_query_get::<H>).post(handlers::dns_query_post::<H>),
        )
        .with_state(state)
}
