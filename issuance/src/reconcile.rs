//! Reconciling an anchor failure against the ledger.
//!
//! Nothing here writes. The answer tells an operator whether the failed
//! issuance can be retried (`NotMinted`), is already done (`Minted`), or
//! needs a manual look (`Indeterminate`).

use tracing::info;

use certum_ledger::{AnchorError, LedgerLookup, LedgerRpc, LookupError};
use certum_types::LedgerRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintStatus {
    /// The certificate exists and references the expected metadata.
    Minted(LedgerRecord),
    /// Nothing was created; retrying is safe.
    NotMinted,
    /// The ledger does not settle the question.
    Indeterminate(String),
}

pub async fn reconcile_anchor<R: LedgerRpc>(
    lookup: &LedgerLookup<R>,
    error: &AnchorError,
    expected_metadata_uri: &str,
) -> MintStatus {
    let (ledger_id, idempotency_key) = match error {
        AnchorError::Ambiguous {
            ledger_id,
            idempotency_key,
            ..
        } => (ledger_id, idempotency_key),
        _ => return MintStatus::NotMinted,
    };
    let Some(ledger_id) = ledger_id else {
        return MintStatus::Indeterminate(format!(
            "signer reported no mint address; search the authority's transactions for idempotency key {idempotency_key}"
        ));
    };

    let status = match lookup.lookup(ledger_id).await {
        Ok(record) if record.metadata_uri == expected_metadata_uri => MintStatus::Minted(record),
        Ok(record) => MintStatus::Indeterminate(format!(
            "{ledger_id} references {} instead of {expected_metadata_uri}",
            record.metadata_uri
        )),
        Err(LookupError::NotFound(_)) => MintStatus::NotMinted,
        Err(e) => MintStatus::Indeterminate(e.to_string()),
    };
    info!(ledger_id = %ledger_id, ?status, "reconciled ambiguous anchor");
    status
}
