use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fastdns_domain::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DohError {
    #[error("Missing dns parameter")]
    MissingParameter,

    #[error("The dns parameter is not base64url")]
    InvalidEncoding,

    #[error("Unreadable request body")]
    InvalidBody,

    #[error("Malformed DNS message: {0}")]
    InvalidMessage(#[from] ParseError),

    #[error("Handler produced no response")]
    NoResponse,
}

impl IntoResponse for DohError {
    fn into_response(self) -> Response {
        match self {
            DohError::NoResponse => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
            _ => (StatusCode::BAD_REQUEST, "bad request").into_response(),
        }
    }
}
