//! Certificate and liveness handler
//!
//! A single fallback handler sees every request so the dispatch table in
//! [`crate::api::route`] stays the only place routing decisions are made.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{self, Body, Bytes},
    extract::{ConnectInfo, FromRequest, Multipart, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderValue, Method},
};
use tracing::{debug, info, warn};

use certgate_core::{Action, CaEngine, Field, Outcome, Params};

use crate::api::error::GatewayError;
use crate::api::form::{decode_pairs, DecodeError};
use crate::api::reply::{translate, Reply};
use crate::api::route::{PathShape, Route};

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Application state shared across handlers
pub struct AppState {
    /// The CA everything is forwarded to
    pub engine: Arc<dyn CaEngine>,
}

/// Route any request
///
/// - `GET /ping` answers `PONG`
/// - `POST|GET|DELETE /certificate/{subject}` sign, fetch or remove
/// - other methods on known paths are `405`, anything else `501`
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Reply, GatewayError> {
    let (parts, body) = request.into_parts();

    match Route::resolve(PathShape::classify(parts.uri.path()), &parts.method) {
        Route::Pong => Ok(Reply::pong()),
        Route::MethodNotAllowed => Err(GatewayError::MethodNotAllowed),
        Route::NotImplemented => Err(GatewayError::NotImplemented),
        Route::Certificate { action, subject } => {
            let params = collect_params(&parts, body, subject).await?;
            let outcome = forward(state.engine.as_ref(), action, &params).await;
            log_outcome(action, &params, &outcome);
            Ok(translate(action, outcome, &request_path(&parts)))
        }
    }
}

async fn forward(engine: &dyn CaEngine, action: Action, params: &Params) -> Outcome {
    match action {
        Action::Sign => engine.sign(params).await,
        Action::Fetch => engine.fetch(params).await,
        Action::Remove => engine.remove(params).await,
    }
}

/// Merge query string, form body and the router-derived `cn`/`ip`, in that
/// order. Derived fields always replace whatever the client sent.
async fn collect_params(parts: &Parts, body: Body, subject: &str) -> Result<Params, GatewayError> {
    let query = match parts.uri.query() {
        Some(query) => decode_pairs(query.as_bytes()).map_err(GatewayError::MalformedQuery)?,
        None => Vec::new(),
    };

    let form = match body_format(parts) {
        BodyFormat::Ignored => Vec::new(),
        BodyFormat::UrlEncoded => {
            let bytes = read_body(body).await?;
            decode_pairs(&bytes).map_err(GatewayError::MalformedForm)?
        }
        BodyFormat::Multipart(content_type) => {
            let bytes = read_body(body).await?;
            multipart_pairs(content_type, bytes).await?
        }
    };

    debug!(
        query_params = query.len(),
        form_params = form.len(),
        "Collected request parameters"
    );

    Ok(Params::builder()
        .extend(query)
        .extend(form)
        .insert(Field::Cn, subject)
        .insert(Field::Ip, source_ip(parts))
        .build())
}

#[derive(Debug, PartialEq, Eq)]
enum BodyFormat<'a> {
    Ignored,
    UrlEncoded,
    Multipart(&'a HeaderValue),
}

/// A body is read as a form when it says so, or when a POST says nothing
fn body_format(parts: &Parts) -> BodyFormat<'_> {
    let Some(value) = parts.headers.get(header::CONTENT_TYPE) else {
        return if parts.method == Method::POST {
            BodyFormat::UrlEncoded
        } else {
            BodyFormat::Ignored
        };
    };

    let essence = value
        .to_str()
        .ok()
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    if essence.eq_ignore_ascii_case(FORM_URLENCODED) {
        BodyFormat::UrlEncoded
    } else if essence.eq_ignore_ascii_case(MULTIPART_FORM_DATA) {
        BodyFormat::Multipart(value)
    } else {
        BodyFormat::Ignored
    }
}

async fn read_body(body: Body) -> Result<Bytes, GatewayError> {
    body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(GatewayError::UnreadableBody)
}

/// Named parts of a `multipart/form-data` body, file uploads included.
/// Part contents are passed on verbatim and must be UTF-8.
async fn multipart_pairs(
    content_type: &HeaderValue,
    bytes: Bytes,
) -> Result<Vec<(String, String)>, GatewayError> {
    let mut request = Request::new(Body::from(bytes));
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type.clone());

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| GatewayError::MalformedMultipart(rejection.body_text()))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| GatewayError::MalformedMultipart(err.body_text()))?
    {
        let Some(name) = field.name().filter(|name| !name.is_empty()).map(str::to_owned) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|err| GatewayError::MalformedMultipart(err.body_text()))?;
        let value = String::from_utf8(data.to_vec())
            .map_err(|_| GatewayError::MalformedForm(DecodeError::NotUtf8))?;
        pairs.push((name, value));
    }

    Ok(pairs)
}

/// Caller address as seen by the listener, or empty when unknown
fn source_ip(parts: &Parts) -> String {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

/// Path the client actually requested, including any mount prefix
fn request_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path())
        .unwrap_or_else(|| parts.uri.path())
        .to_string()
}

fn log_outcome(action: Action, params: &Params, outcome: &Outcome) {
    let cn = params.get_or(&Field::Cn, "");
    let ip = params.get_or(&Field::Ip, "");

    match outcome {
        Outcome::Denied(reason) => {
            warn!(%action, cn, ip, reason = %reason, "CA denied request");
        }
        Outcome::Error(reason) => {
            warn!(%action, cn, ip, reason = %reason, "CA failed request");
        }
        Outcome::Miss if action == Action::Sign => {
            warn!(%action, cn, ip, "CA reported a miss for sign");
        }
        Outcome::Hit(_) | Outcome::Miss => {
            info!(%action, cn, ip, outcome = outcome.kind(), "CA answered request");
        }
    }
}
