//! Gateway-level errors
//!
//! These never come from the CA. They cover requests the gateway refuses
//! before reaching it: unknown paths, unsupported methods and parameters
//! that cannot be decoded.

use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

use super::form::DecodeError;
use super::reply::Reply;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not implemented")]
    NotImplemented,

    #[error("Malformed query string: {0}")]
    MalformedQuery(DecodeError),

    #[error("Malformed form body: {0}")]
    MalformedForm(DecodeError),

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("Unreadable request body: {0}")]
    UnreadableBody(axum::Error),
}

impl From<&GatewayError> for Reply {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::MethodNotAllowed => Reply::method_not_allowed(),
            GatewayError::NotImplemented => Reply::not_implemented(),
            GatewayError::MalformedQuery(_)
            | GatewayError::MalformedForm(_)
            | GatewayError::MalformedMultipart(_)
            | GatewayError::UnreadableBody(_) => Reply::bad_request(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Rejecting request");
        Reply::from(&self).into_response()
    }
}
