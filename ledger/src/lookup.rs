//! Identifier to certificate record.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use certum_types::{LedgerId, LedgerRecord};

use crate::rpc::LedgerRpc;
use crate::{LookupError, RpcError};

/// Resolves a canonical identifier into its certificate record.
///
/// Issues two reads against the ledger concurrently: the raw account (does
/// anything live here?) and the structured token record (is it a
/// certificate?). Both are bounded by the same timeout.
pub struct LedgerLookup<R: LedgerRpc> {
    rpc: Arc<R>,
    timeout: Duration,
}

impl<R: LedgerRpc> LedgerLookup<R> {
    pub fn new(rpc: Arc<R>, timeout: Duration) -> Self {
        Self { rpc, timeout }
    }

    pub fn rpc(&self) -> &Arc<R> {
        &self.rpc
    }

    pub async fn lookup(&self, id: &LedgerId) -> Result<LedgerRecord, LookupError> {
        let (account, record) = tokio::join!(
            bounded(self.timeout, "getAccountInfo", self.rpc.get_account(id)),
            bounded(self.timeout, "token record", self.rpc.get_token_record(id)),
        );

        match account {
            Err(cause) => {
                warn!(ledger_id = %id, error = %cause, "account read failed");
                return Err(LookupError::Retryable {
                    id: id.clone(),
                    cause,
                });
            }
            Ok(None) => {
                debug!(ledger_id = %id, "no account");
                return Err(LookupError::NotFound(id.clone()));
            }
            Ok(Some(_)) => {}
        }

        match record {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(LookupError::RecordMissing {
                id: id.clone(),
                cause: "no token record".to_string(),
            }),
            Err(RpcError::InvalidRecord(cause)) => Err(LookupError::RecordMissing {
                id: id.clone(),
                cause,
            }),
            Err(cause) => {
                warn!(ledger_id = %id, error = %cause, "record read failed");
                Err(LookupError::Retryable {
                    id: id.clone(),
                    cause,
                })
            }
        }
    }
}

async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(RpcError::Timeout(format!(
            "{what} exceeded {}ms",
            limit.as_millis()
        ))),
    }
}
