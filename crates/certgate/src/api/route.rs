//! Request dispatch table
//!
//! Routing happens in two steps. The path is classified first; the method
//! is only consulted within a recognised path shape, so an unknown path is
//! `501` whatever the method.

use axum::http::Method;

use certgate_core::Action;

pub const PING_PATH: &str = "/ping";
pub const CERTIFICATE_PREFIX: &str = "/certificate/";

/// Shape of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape<'a> {
    /// Exactly `/ping`
    Ping,
    /// `/certificate/<subject>` with a non-empty subject
    Certificate(&'a str),
    Unmatched,
}

impl<'a> PathShape<'a> {
    pub fn classify(path: &'a str) -> Self {
        if path == PING_PATH {
            return PathShape::Ping;
        }

        match path.strip_prefix(CERTIFICATE_PREFIX) {
            Some(subject) if !subject.is_empty() => PathShape::Certificate(subject),
            _ => PathShape::Unmatched,
        }
    }
}

/// Where a request ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Pong,
    Certificate { action: Action, subject: &'a str },
    MethodNotAllowed,
    NotImplemented,
}

impl<'a> Route<'a> {
    pub fn resolve(shape: PathShape<'a>, method: &Method) -> Self {
        match shape {
            PathShape::Ping if method == Method::GET => Route::Pong,
            PathShape::Ping => Route::MethodNotAllowed,
            PathShape::Certificate(subject) => match certificate_action(method) {
                Some(action) => Route::Certificate { action, subject },
                None => Route::MethodNotAllowed,
            },
            PathShape::Unmatched => Route::NotImplemented,
        }
    }
}

fn certificate_action(method: &Method) -> Option<Action> {
    match method.as_str() {
        "POST" => Some(Action::Sign),
        "GET" => Some(Action::Fetch),
        "DELETE" => Some(Action::Remove),
        _ => None,
    }
}
