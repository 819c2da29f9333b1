//! Reduction of raised dispatch failures to an `ErrorKind`.
//!
//! Pure and exhaustive: every `DispatchFailure` maps to exactly one kind, and
//! nothing here logs or re-raises. The dispatcher does the logging.

use crate::error::{DispatchFailure, ErrorKind, TransportErrorKind};

/// Map a failure raised during dispatch to its `ErrorKind`.
pub fn classify(raised: &DispatchFailure) -> ErrorKind {
    match raised {
        DispatchFailure::Status { status, body } => classify_status(*status, body),
        DispatchFailure::Transport(err) => match err.kind {
            TransportErrorKind::Connect | TransportErrorKind::Timeout | TransportErrorKind::Io => {
                ErrorKind::TransportError(err.message.clone())
            }
            TransportErrorKind::Other => ErrorKind::UnknownError(err.message.clone()),
        },
        DispatchFailure::Decode(err) => ErrorKind::UnknownError(format!("invalid response body: {err}")),
        DispatchFailure::Transform(err) => ErrorKind::UnknownError(err.to_string()),
        DispatchFailure::TransformPanic(msg) => ErrorKind::UnknownError(format!("transform panicked: {msg}")),
    }
}

fn classify_status(status: u16, body: &str) -> ErrorKind {
    let message = status_message(status, body);
    match status {
        400..=499 => ErrorKind::ClientError { status, message },
        500..=599 => ErrorKind::ServerError { status, message },
        _ => ErrorKind::UnknownError(format!("unexpected status {status}: {message}")),
    }
}

/// The response body, or the canonical reason phrase when the body is blank.
fn status_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
        .to_string()
}
