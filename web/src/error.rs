use std::error::Error as StdError;
use std::fmt;
use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the web layer, either as an HTTP response or as a fatal
/// startup failure handed back to the binary.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The request did not present the configured agent token.
    Unauthorized,
    Startup(StartupErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum StartupErrorKind {
    /// The listening socket could not be bound to the given address.
    Bind(String),
    /// The server stopped with an I/O error while accepting connections.
    Serve,
}

impl Error {
    pub fn unauthorized() -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::Unauthorized,
        }
    }

    pub fn bind(addr: impl Into<String>, err: io::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Startup(StartupErrorKind::Bind(addr.into())),
        }
    }

    pub fn serve(err: io::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Startup(StartupErrorKind::Serve),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::Startup(StartupErrorKind::Bind(addr)) => match &self.source {
                Some(source) => write!(f, "Failed to bind {addr}: {source}"),
                None => write!(f, "Failed to bind {addr}"),
            },
            ErrorKind::Startup(StartupErrorKind::Serve) => match &self.source {
                Some(source) => write!(f, "Server error: {source}"),
                None => write!(f, "Server error"),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.error_kind {
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized").into_response(),
            ErrorKind::Startup(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}
