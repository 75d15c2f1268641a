use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use certum_crypto::IdentifierGrammar;
use certum_issuance::{BrandSubmission, IssuanceError};
use certum_nullables::{NullContentStore, NullLedger, NullSigner};
use certum_node::{CertificateEngine, EngineConfig, NodeError};
use certum_types::{ProductCategory, VerificationStatus};

fn engine() -> (
    CertificateEngine<NullLedger, NullContentStore>,
    Arc<NullLedger>,
    Arc<NullContentStore>,
) {
    let config = EngineConfig {
        confirm_poll_millis: 10,
        verify_base_url: "https://certum.example".into(),
        ..EngineConfig::default()
    };
    let ledger = Arc::new(NullLedger::new());
    let store = Arc::new(NullContentStore::new());
    let engine = CertificateEngine::with_clients(config, ledger.clone(), store.clone());
    (engine, ledger, store)
}

fn headphones() -> BrandSubmission {
    BrandSubmission {
        name: "Solana Headphones V1".into(),
        category: ProductCategory::Electronics,
        serial: "SH-001".into(),
        description: "Noise cancelling".into(),
        image: None,
    }
}

#[tokio::test]
async fn issued_certificate_verifies_through_its_link() {
    let (engine, ledger, _) = engine();
    let signer = NullSigner::new([5; 32]).with_ledger(ledger);

    let issued = engine.issue(&headphones(), &signer).await.unwrap();
    assert_eq!(
        issued.verification_link,
        engine.verification_link(&issued.ledger_id)
    );

    let verdict = engine.verify(&issued.verification_link).await;
    assert_eq!(verdict.status, VerificationStatus::Genuine);
    let cert = verdict.certificate.unwrap();
    assert_eq!(cert.serial, "SH-001");
    assert_eq!(cert.category, "Electronics");
    assert_eq!(cert.name, "Solana Headphones V1");
}

#[tokio::test]
async fn solana_grammar_rejects_short_ids() {
    let (engine, ledger, _) = engine();
    let verdict = engine.verify("6yHknown").await;
    assert_eq!(verdict.status, VerificationStatus::Invalid);
    assert_eq!(ledger.total_reads(), 0);
}

#[tokio::test]
async fn configured_grammar_reaches_the_resolver() {
    let config = EngineConfig {
        grammar: IdentifierGrammar::alphanumeric(4, 64),
        ..EngineConfig::default()
    };
    let engine = CertificateEngine::with_clients(
        config,
        Arc::new(NullLedger::new()),
        Arc::new(NullContentStore::new()),
    );
    let verdict = engine.verify("6yHvalidButUnknown").await;
    assert_eq!(verdict.status, VerificationStatus::Invalid);
    assert!(verdict.diagnostic.unwrap().contains("not found on devnet"));
}

#[tokio::test]
async fn rejected_issuance_reconciles_as_not_minted() {
    let (engine, ledger, _) = engine();
    let signer = NullSigner::new([5; 32]).with_ledger(ledger);
    signer.fail_with(certum_ledger::SignerError::Rejected("declined".into()));

    let err = engine.issue(&headphones(), &signer).await.unwrap_err();
    assert!(matches!(err, IssuanceError::Anchor { .. }));
    assert_eq!(
        engine.reconcile(&err).await,
        certum_issuance::MintStatus::NotMinted
    );
}

#[test]
fn links_are_only_built_for_resolvable_ids() {
    let (engine, _, _) = engine();
    let mint = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

    assert_eq!(
        engine.resolve_link(&format!(" {mint}\n")).unwrap(),
        format!("https://certum.example/verify?productId={mint}")
    );
    assert!(engine.resolve_link("bad id").is_err());
    assert!(engine.resolve_link("6yHtooShort").is_err());
}

#[tokio::test]
async fn signer_requires_configuration() {
    let (engine, _, _) = engine();
    assert!(matches!(
        engine.connect_signer().await,
        Err(NodeError::Config(_))
    ));
}

#[tokio::test]
async fn router_serves_health() {
    let (engine, _, _) = engine();
    let response = engine
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["cluster"], "devnet");
}
