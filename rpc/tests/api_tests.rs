use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use certum_crypto::IdentifierGrammar;
use certum_ledger::LedgerLookup;
use certum_nullables::{NullContentStore, NullLedger};
use certum_rpc::{router, ApiState};
use certum_types::{Cluster, LedgerId, LedgerRecord};
use certum_verification::{IdentifierResolver, MetadataReconciler, Verifier};

fn app() -> axum::Router {
    let ledger = Arc::new(NullLedger::new());
    let store = Arc::new(NullContentStore::new());
    let published = store.insert_json(&serde_json::json!({
        "name": "Solana Headphones V1",
        "description": "",
        "attributes": [{ "trait_type": "Serial", "value": "SH-001" }]
    }));
    ledger.add_certificate(LedgerRecord {
        ledger_id: LedgerId::new("6yHknown"),
        name: "Solana Headphones".into(),
        symbol: "CERT".into(),
        metadata_uri: published.uri,
        issuing_authority: LedgerId::new("BrandWallet"),
        mutable: true,
        embedded_metadata: None,
    });
    let verifier = Verifier::new(
        IdentifierResolver::with_grammar(IdentifierGrammar::alphanumeric(4, 64)),
        LedgerLookup::new(ledger, Duration::from_millis(200)),
        MetadataReconciler::new(store, Duration::from_millis(200)),
        Cluster::Devnet,
    );
    router(Arc::new(ApiState::new(Arc::new(verifier))))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn qr_payload_verifies_genuine() {
    let (status, body) = get("/verify?productId=6yHknown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "genuine");
    assert_eq!(body["certificate"]["serial"], "SH-001");
}

#[tokio::test]
async fn raw_input_parameter_is_resolved() {
    let (_, body) = get("/verify?input=https%3A%2F%2Fhost%2Fresult%2F6yHknown").await;
    assert_eq!(body["status"], "genuine");
}

#[tokio::test]
async fn result_path_verifies() {
    let (status, body) = get("/result/6yHvalidButUnknown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "invalid");
    assert!(body["diagnostic"].as_str().unwrap().contains("not found on devnet"));
}

#[tokio::test]
async fn malformed_input_is_an_invalid_verdict_not_an_error() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"input":"not a real id!!"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["diagnostic"], "Invalid Product ID format.");
}

#[tokio::test]
async fn missing_input_is_a_bad_request() {
    let (status, body) = get("/verify").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no verification input"));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify")
                .header("content-type", "application/json")
                .body(Body::from("{"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_cluster() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cluster"], "devnet");
}
