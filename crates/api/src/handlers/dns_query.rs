use crate::errors::DohError;
use crate::state::DohState;
use axum::{
    body::to_bytes,
    extract::{ConnectInfo, Query, Request, State},
    http::header,
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use fastdns_infrastructure::dns::{parse_request, Handler};
use serde::Deserialize;
use std::net::SocketAddr;
use tracing::{debug, instrument};

pub const DNS_MESSAGE: &str = "application/dns-message";

/// Largest DNS message a body or parameter may carry.
const MAX_MESSAGE_LEN: usize = u16::MAX as usize;

#[derive(Debug, Deserialize)]
pub struct DnsQueryParams {
    pub dns: Option<String>,
}

#[instrument(skip_all, name = "doh_get")]
pub async fn dns_query_get<H: Handler>(
    State(state): State<DohState<H>>,
    request: Request,
) -> Result<Response, DohError> {
    let peer = peer_addr(&request);
    let Query(params) = Query::<DnsQueryParams>::try_from_uri(request.uri())
        .map_err(|_| DohError::MissingParameter)?;
    let encoded = params.dns.ok_or(DohError::MissingParameter)?;

    // RFC 8484 forbids padding, but some clients send it anyway.
    let message = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|_| DohError::InvalidEncoding)?;

    answer(&state, peer, &message).await
}

#[instrument(skip_all, name = "doh_post")]
pub async fn dns_query_post<H: Handler>(
    State(state): State<DohState<H>>,
    request: Request,
) -> Result<Response, DohError> {
    let peer = peer_addr(&request);
    let body = to_bytes(request.into_body(), MAX_MESSAGE_LEN)
        .await
        .map_err(|_| DohError::InvalidBody)?;

    answer(&state, peer, &body).await
}

fn peer_addr(request: &Request) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

async fn answer<H: Handler>(
    state: &DohState<H>,
    peer: Option<SocketAddr>,
    message: &[u8],
) -> Result<Response, DohError> {
    let mut req = state.requests.acquire();
    if let Err(e) = parse_request(message, &mut req) {
        debug!(error = %e, len = message.len(), "Rejecting malformed DoH message");
        return Err(e.into());
    }

    let mut rw = state.writers.acquire();
    if let Some(peer) = peer {
        rw.raddr = peer;
    }
    if let Some(local) = state.local_addr {
        rw.laddr = local;
    }

    state.handler.serve_dns(&mut *rw, &req).await;

    if rw.data.is_empty() {
        return Err(DohError::NoResponse);
    }

    let body = Bytes::copy_from_slice(&rw.data);
    Ok(([(header::CONTENT_TYPE, DNS_MESSAGE)], body).into_response())
}
