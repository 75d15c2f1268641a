//! Nullable ledger: accounts, certificate records and signature statuses
//! held in memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use certum_ledger::{LedgerRpc, RawAccount, RpcError, SignatureState};
use certum_types::{LedgerId, LedgerRecord, TxSignature};

const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

/// An in-memory ledger for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullLedger {
    accounts: Mutex<HashMap<LedgerId, RawAccount>>,
    records: Mutex<HashMap<LedgerId, Result<LedgerRecord, String>>>,
    signatures: Mutex<HashMap<TxSignature, SignatureState>>,
    submission_state: Mutex<SignatureState>,
    read_failure: Mutex<Option<RpcError>>,
    delay: Mutex<Option<Duration>>,
    account_reads: AtomicUsize,
    record_reads: AtomicUsize,
    status_reads: AtomicUsize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            records: Mutex::new(HashMap::new()),
            signatures: Mutex::new(HashMap::new()),
            submission_state: Mutex::new(SignatureState::Confirmed),
            read_failure: Mutex::new(None),
            delay: Mutex::new(None),
            account_reads: AtomicUsize::new(0),
            record_reads: AtomicUsize::new(0),
            status_reads: AtomicUsize::new(0),
        }
    }

    /// Add a mint account carrying a certificate record.
    pub fn add_certificate(&self, record: LedgerRecord) {
        self.put_account(&record.ledger_id, TOKEN_PROGRAM);
        self.records
            .lock()
            .unwrap()
            .insert(record.ledger_id.clone(), Ok(record));
    }

    /// Add an account with no certificate record attached.
    pub fn add_bare_account(&self, id: &LedgerId) {
        self.put_account(id, SYSTEM_PROGRAM);
    }

    /// Add an account whose record exists but does not decode.
    pub fn add_corrupt_record(&self, id: &LedgerId, cause: &str) {
        self.put_account(id, TOKEN_PROGRAM);
        self.records
            .lock()
            .unwrap()
            .insert(id.clone(), Err(cause.to_string()));
    }

    /// Look up a stored record without counting a read.
    pub fn record(&self, id: &LedgerId) -> Option<LedgerRecord> {
        match self.records.lock().unwrap().get(id) {
            Some(Ok(record)) => Some(record.clone()),
            _ => None,
        }
    }

    /// Land a submitted token creation: store its record and give the
    /// signature the configured submission state.
    pub fn land_submission(&self, signature: TxSignature, record: LedgerRecord) {
        let state = self.submission_state.lock().unwrap().clone();
        if !matches!(state, SignatureState::Failed(_)) {
            self.add_certificate(record);
        }
        self.signatures.lock().unwrap().insert(signature, state);
    }

    /// State given to signatures landed after this call.
    pub fn set_submission_state(&self, state: SignatureState) {
        *self.submission_state.lock().unwrap() = state;
    }

    pub fn set_signature_state(&self, signature: TxSignature, state: SignatureState) {
        self.signatures.lock().unwrap().insert(signature, state);
    }

    /// Fail every read with `error` until cleared.
    pub fn fail_reads(&self, error: RpcError) {
        *self.read_failure.lock().unwrap() = Some(error);
    }

    /// Stall every read by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn clear_failures(&self) {
        *self.read_failure.lock().unwrap() = None;
        *self.delay.lock().unwrap() = None;
    }

    pub fn account_reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst)
    }

    pub fn record_reads(&self) -> usize {
        self.record_reads.load(Ordering::SeqCst)
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }

    /// Total reads of any kind.
    pub fn total_reads(&self) -> usize {
        self.account_reads() + self.record_reads() + self.status_reads()
    }

    fn put_account(&self, id: &LedgerId, owner: &str) {
        self.accounts.lock().unwrap().insert(
            id.clone(),
            RawAccount {
                owner: owner.to_string(),
                lamports: 1_461_600,
                data: vec![0; 82],
                executable: false,
            },
        );
    }

    async fn before_read(&self) -> Result<(), RpcError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.read_failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for NullLedger {
    async fn get_account(&self, id: &LedgerId) -> Result<Option<RawAccount>, RpcError> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn get_token_record(&self, id: &LedgerId) -> Result<Option<LedgerRecord>, RpcError> {
        self.record_reads.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        match self.records.lock().unwrap().get(id) {
            None => Ok(None),
            Some(Ok(record)) => Ok(Some(record.clone())),
            Some(Err(cause)) => Err(RpcError::InvalidRecord(cause.clone())),
        }
    }

    async fn signature_status(&self, signature: &TxSignature) -> Result<SignatureState, RpcError> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        Ok(self
            .signatures
            .lock()
            .unwrap()
            .get(signature)
            .cloned()
            .unwrap_or(SignatureState::Pending))
    }
}
