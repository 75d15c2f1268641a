//! Router construction and shared state.

use async_trait::async_trait;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use certum_ledger::LedgerRpc;
use certum_store::ContentStore;
use certum_types::{Cluster, Verdict};
use certum_verification::Verifier;

use crate::handlers;

/// What the API needs from the verification pipeline.
#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn verify(&self, raw_input: &str) -> Verdict;

    fn cluster(&self) -> Cluster;
}

#[async_trait]
impl<R, S> VerificationService for Verifier<R, S>
where
    R: LedgerRpc + 'static,
    S: ContentStore + 'static,
{
    async fn verify(&self, raw_input: &str) -> Verdict {
        Verifier::verify(self, raw_input).await
    }

    fn cluster(&self) -> Cluster {
        Verifier::cluster(self)
    }
}

/// Shared state for the HTTP handlers.
pub struct ApiState {
    pub verifier: Arc<dyn VerificationService>,
}

impl ApiState {
    pub fn new(verifier: Arc<dyn VerificationService>) -> Self {
        Self { verifier }
    }
}

/// Build the API router. The browser front end calls it cross-origin, so
/// CORS is permissive; every route is read-only.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/verify", get(handlers::verify_query).post(handlers::verify_body))
        .route("/result/:id", get(handlers::result))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
