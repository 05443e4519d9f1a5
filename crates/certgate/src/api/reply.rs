//! Wire-level responses and the outcome translator
//!
//! Status lines and bodies here are matched byte for byte by existing
//! clients. Every body is `text/plain` except a fetched certificate.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use certgate_core::{Action, Outcome};

pub const TEXT_PLAIN: &str = "text/plain";
pub const PEM_FILE: &str = "application/x-pem-file";

/// Reason given when sign reports a miss, which it never should
pub const SIGN_MISS_REASON: &str = "sign reported a miss";

/// Reason given when fetch reports a hit without a certificate
pub const EMPTY_FETCH_REASON: &str = "fetch hit carried no certificate";

/// Status, headers and body of a gateway response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: StatusCode,
    content_type: &'static str,
    location: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN,
            location: None,
            body: body.into().into_bytes(),
        }
    }

    /// 200 with the canonical body
    pub fn ok() -> Self {
        Self::text(StatusCode::OK, "200 OK")
    }

    /// Liveness answer
    pub fn pong() -> Self {
        Self::text(StatusCode::OK, "PONG")
    }

    /// 200 carrying a PEM-encoded certificate
    pub fn pem(certificate: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: PEM_FILE,
            location: None,
            body: certificate,
        }
    }

    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::text(StatusCode::SEE_OTHER, "303 See Other")
        }
    }

    pub fn bad_request() -> Self {
        Self::text(StatusCode::BAD_REQUEST, "400 Bad Request")
    }

    pub fn forbidden(reason: &str) -> Self {
        Self::text(StatusCode::FORBIDDEN, format!("403 Forbidden ({reason})"))
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "404 Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed")
    }

    pub fn internal_error(reason: &str) -> Self {
        Self::text(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("500 Internal Server Error ({reason})"),
        )
    }

    pub fn not_implemented() -> Self {
        Self::text(StatusCode::NOT_IMPLEMENTED, "501 Not Implemented")
    }

    /// 503 whose body is the failure message itself
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::text(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        if let Some(location) = self.location {
            match HeaderValue::try_from(location) {
                Ok(value) => {
                    headers.insert(header::LOCATION, value);
                }
                Err(e) => warn!(error = %e, "Dropping unrepresentable Location header"),
            }
        }

        response
    }
}

/// Map a CA outcome for `action` to its wire response.
///
/// `path` is the request path as the client sent it, mount prefix included;
/// a successful sign redirects there.
pub fn translate(action: Action, outcome: Outcome, path: &str) -> Reply {
    match (action, outcome) {
        (_, Outcome::Denied(reason)) => Reply::forbidden(reason.as_str()),
        (_, Outcome::Error(reason)) => Reply::internal_error(reason.as_str()),

        (Action::Sign, Outcome::Hit(_)) => Reply::see_other(path),
        (Action::Sign, Outcome::Miss) => Reply::internal_error(SIGN_MISS_REASON),

        (Action::Fetch, Outcome::Hit(Some(certificate))) => Reply::pem(certificate),
        (Action::Fetch, Outcome::Hit(None)) => Reply::internal_error(EMPTY_FETCH_REASON),
        (Action::Fetch, Outcome::Miss) => Reply::not_found(),

        (Action::Remove, Outcome::Hit(_)) => Reply::ok(),
        (Action::Remove, Outcome::Miss) => Reply::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/certificate/axl.starjuice.net";

    fn body(reply: &Reply) -> &str {
        std::str::from_utf8(reply.body()).unwrap()
    }

    #[test]
    fn test_sign_hit_redirects_to_request_path() {
        let reply = translate(Action::Sign, Outcome::hit_with("...crt..."), PATH);

        assert_eq!(reply.status(), StatusCode::SEE_OTHER);
        assert_eq!(reply.location(), Some(PATH));
        assert_eq!(body(&reply), "303 See Other");
        assert_eq!(reply.content_type(), TEXT_PLAIN);
    }

    #[test]
    fn test_sign_miss_is_internal_error() {
        let reply = translate(Action::Sign, Outcome::miss(), PATH);

        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&reply), "500 Internal Server Error (sign reported a miss)");
    }

    #[test]
    fn test_fetch_hit_serves_pem() {
        let reply = translate(Action::Fetch, Outcome::hit_with("...crt..."), PATH);

        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(body(&reply), "...crt...");
        assert_eq!(reply.content_type(), PEM_FILE);
        assert_eq!(reply.location(), None);
    }

    #[test]
    fn test_fetch_hit_without_payload_is_internal_error() {
        let reply = translate(Action::Fetch, Outcome::hit(), PATH);

        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.content_type(), TEXT_PLAIN);
    }

    #[test]
    fn test_remove_hit_is_plain_ok() {
        let reply = translate(Action::Remove, Outcome::hit(), PATH);

        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(body(&reply), "200 OK");
        assert_eq!(reply.content_type(), TEXT_PLAIN);
    }

    #[test]
    fn test_miss_is_not_found_for_fetch_and_remove() {
        for action in [Action::Fetch, Action::Remove] {
            let reply = translate(action, Outcome::miss(), PATH);
            assert_eq!(reply.status(), StatusCode::NOT_FOUND);
            assert_eq!(body(&reply), "404 Not Found");
        }
    }

    #[test]
    fn test_denied_and_error_interpolate_reason_for_every_action() {
        for action in Action::ALL {
            let denied = translate(action, Outcome::denied("no mojo"), PATH);
            assert_eq!(denied.status(), StatusCode::FORBIDDEN);
            assert_eq!(body(&denied), "403 Forbidden (no mojo)");
            assert_eq!(denied.content_type(), TEXT_PLAIN);

            let error = translate(action, Outcome::error("all is lost"), PATH);
            assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body(&error), "500 Internal Server Error (all is lost)");
            assert_eq!(error.content_type(), TEXT_PLAIN);
        }
    }

    #[test]
    fn test_fixed_literals() {
        assert_eq!(body(&Reply::pong()), "PONG");
        assert_eq!(body(&Reply::method_not_allowed()), "405 Method Not Allowed");
        assert_eq!(body(&Reply::not_implemented()), "501 Not Implemented");
        assert_eq!(Reply::not_implemented().status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_into_response_sets_headers() {
        let response = Reply::see_other(PATH).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
        assert_eq!(response.headers()[header::LOCATION], PATH);
    }

    #[test]
    fn test_unrepresentable_location_is_dropped() {
        let response = Reply::see_other("/certificate/bad\nname").into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
