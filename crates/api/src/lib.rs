//! DNS-over-HTTPS (RFC 8484) front end for any [`Handler`].
//!
//! [`Handler`]: fastdns_infrastructure::dns::Handler
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::DohError;
pub use routes::{create_doh_routes, create_doh_routes_with_state};
pub use state::DohState;
