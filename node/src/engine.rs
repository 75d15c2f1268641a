//! Wiring configuration into running pipelines.

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Instrument};

use certum_issuance::{BrandSubmission, IssuanceError, IssuedCertificate, Issuer, MintStatus};
use certum_ledger::{LedgerLookup, LedgerRpc, RemoteSigner, SolanaRpcClient, TransactionSigner};
use certum_rpc::{router, ApiState};
use certum_store::{ContentStore, PinataStore};
use certum_types::{LedgerId, Verdict};
use certum_verification::{
    verification_link, IdentifierResolver, MetadataReconciler, ResolveError, Verifier,
};

use crate::tracing_spans::{http_span, issue_span, reconcile_span, verify_span};
use crate::{EngineConfig, NodeError};

/// The engine over a live Solana cluster and Pinata.
pub type SolanaEngine = CertificateEngine<SolanaRpcClient, PinataStore>;

/// Verification and issuance over one ledger client and one content store.
pub struct CertificateEngine<R: LedgerRpc + 'static, S: ContentStore + 'static> {
    config: EngineConfig,
    verifier: Arc<Verifier<R, S>>,
    issuer: Issuer<S, R>,
}

impl SolanaEngine {
    /// Build the engine with the real clients named by `config`.
    pub fn from_config(config: EngineConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let rpc = Arc::new(SolanaRpcClient::new(
            config.rpc_url(),
            config.commitment,
            config.rpc_timeout(),
        )?);
        let store = Arc::new(PinataStore::new(config.pinata_config())?);
        info!(
            cluster = %config.cluster,
            rpc_url = %rpc.rpc_url(),
            "engine configured"
        );
        Ok(Self::with_clients(config, rpc, store))
    }
}

impl<R: LedgerRpc + 'static, S: ContentStore + 'static> CertificateEngine<R, S> {
    pub fn with_clients(config: EngineConfig, rpc: Arc<R>, store: Arc<S>) -> Self {
        let resolver =
            IdentifierResolver::new(config.grammar.clone(), config.identifier_params.clone());
        let verifier = Verifier::new(
            resolver,
            LedgerLookup::new(rpc.clone(), config.rpc_timeout()),
            MetadataReconciler::new(store.clone(), config.fetch_timeout()),
            config.cluster,
        );
        let issuer = Issuer::new(store, rpc, config.issuer_config());
        Self {
            config,
            verifier: Arc::new(verifier),
            issuer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn verifier(&self) -> Arc<Verifier<R, S>> {
        self.verifier.clone()
    }

    pub async fn verify(&self, raw_input: &str) -> Verdict {
        self.verifier
            .verify(raw_input)
            .instrument(verify_span(raw_input))
            .await
    }

    pub async fn issue(
        &self,
        submission: &BrandSubmission,
        signer: &dyn TransactionSigner,
    ) -> Result<IssuedCertificate, IssuanceError> {
        self.issuer
            .issue(submission, signer)
            .instrument(issue_span(&submission.serial))
            .await
    }

    pub async fn reconcile(&self, error: &IssuanceError) -> MintStatus {
        let metadata_uri = match error {
            IssuanceError::Anchor { metadata_uri, .. } => metadata_uri.as_str(),
            _ => "",
        };
        self.issuer
            .reconcile(error)
            .instrument(reconcile_span(metadata_uri))
            .await
    }

    /// The deep link (QR payload) that verifies `id`.
    pub fn verification_link(&self, id: &LedgerId) -> String {
        verification_link(&self.config.verify_base_url, id)
    }

    /// The deep link for a raw identifier, refused when the resolver would
    /// not accept it back.
    pub fn resolve_link(&self, raw_input: &str) -> Result<String, ResolveError> {
        let id = self.verifier.resolver().resolve(raw_input)?;
        Ok(self.verification_link(&id))
    }

    /// Connect to the configured wallet bridge.
    pub async fn connect_signer(&self) -> Result<RemoteSigner, NodeError> {
        let url = self
            .config
            .signer_url
            .as_deref()
            .ok_or_else(|| NodeError::Config("signer_url is not configured".into()))?;
        Ok(RemoteSigner::connect(url, self.config.rpc_timeout()).await?)
    }

    /// The HTTP API with per-request spans.
    pub fn router(&self) -> Router {
        let state = Arc::new(ApiState::new(self.verifier.clone()));
        router(state).layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                http_span(request.method().as_str(), request.uri().path())
            }),
        )
    }

    /// Serve the HTTP API until `shutdown` resolves.
    pub async fn serve<F>(&self, shutdown: F) -> Result<(), NodeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("0.0.0.0:{}", self.config.listen_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("verification API listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
