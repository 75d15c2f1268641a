//! HTTP API for certificate verification.
//!
//! Endpoints:
//! - `GET /verify?productId=<id>` (or `mintAddress`, or `input=<raw>`):
//!   the QR payload opened directly
//! - `POST /verify` with `{"input": "<raw>"}`: typed or scanned input
//! - `GET /result/:id`: deep link to a verdict
//! - `GET /health`
//!
//! Every verification request answers `200` with a verdict; only requests
//! that carry no input at all are refused.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, ApiState, VerificationService};
