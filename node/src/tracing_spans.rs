//! Pre-built [`tracing::Span`] constructors for engine operations.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate a single request's log lines.

use tracing::{info_span, Span};

/// Span covering one verification request, from raw input to verdict.
pub fn verify_span(input: &str) -> Span {
    info_span!("verify", input = %input)
}

/// Span covering one issuance: publishes and the anchor.
pub fn issue_span(serial: &str) -> Span {
    info_span!("issue", serial = %serial)
}

/// Span covering a read-only reconciliation of a failed issuance.
pub fn reconcile_span(metadata_uri: &str) -> Span {
    info_span!("reconcile", metadata_uri = %metadata_uri)
}

/// Span covering a single HTTP request handled by the API server.
pub fn http_span(method: &str, path: &str) -> Span {
    info_span!("http", method = %method, path = %path)
}
