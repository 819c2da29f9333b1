//! Error types for the storefront client.
//!
//! # Design
//! Two families live here. `DispatchFailure` is everything that can go wrong
//! inside one dispatch; it never leaves the dispatcher, which reduces it to
//! an `ErrorKind` and hands that back inside `ResultWrapper::Failure`.
//! `DecodeError` belongs to the payload codec and is returned to the caller
//! as an ordinary `Err`, since a malformed route argument is a data error the
//! caller must see.

use thiserror::Error;

/// Boxed error returned by caller-supplied transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classified outcome of a failed dispatch.
///
/// Produced only by `classify`; callers match on it, they never build one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The remote side rejected the request with a 4xx status.
    #[error("client error {status}: {message}")]
    ClientError { status: u16, message: String },

    /// The remote side failed with a 5xx status.
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Connectivity or I/O failure: refused connection, DNS, timeout.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Anything else, including response decoding and transform failures.
    #[error("unknown error: {0}")]
    UnknownError(String),
}

impl ErrorKind {
    /// HTTP status carried by the error, if the remote side answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorKind::ClientError { status, .. } | ErrorKind::ServerError { status, .. } => {
                Some(*status)
            }
            ErrorKind::TransportError(_) | ErrorKind::UnknownError(_) => None,
        }
    }
}

/// Coarse cause reported by a `Transport` when no response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Io,
    /// The request could not be issued at all (bad URL, builder failure).
    Other,
}

/// A transport-level failure: the call produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Everything raised while a dispatch is in flight.
#[derive(Debug, Error)]
pub enum DispatchFailure {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The response body did not match the expected shape.
    #[error("response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transform failed: {0}")]
    Transform(BoxError),

    /// The transform panicked; the payload is the panic message, if any.
    #[error("transform panicked: {0}")]
    TransformPanic(String),
}

/// Errors returned by the payload codec and route parser.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is not a structured record with the expected fields.
    #[error("malformed token: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A free-text field is not valid base64 after placeholder reversal.
    #[error("field `{field}` is not valid base64: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// A free-text field carries a raw `/` instead of its placeholder.
    #[error("field `{field}` contains an unsubstituted `/`")]
    UnescapedSymbol { field: &'static str },

    #[error("field `{field}` is not valid UTF-8")]
    Utf8 { field: &'static str },

    /// The locator field is not a valid percent-escaped UTF-8 string.
    #[error("locator field could not be unescaped: {source}")]
    Locator {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The route argument is not a valid percent-escaped UTF-8 string.
    #[error("route argument could not be unescaped: {source}")]
    Argument {
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("unknown route: {0}")]
    UnknownRoute(String),
}

/// The caller's scope was cancelled before the dispatch completed.
///
/// Not an `ErrorKind`: cancellation is a scheduling outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dispatch cancelled")]
pub struct Cancelled;
