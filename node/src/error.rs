use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("ledger RPC error: {0}")]
    Rpc(#[from] certum_ledger::RpcError),

    #[error("content store error: {0}")]
    Store(#[from] certum_store::StoreError),

    #[error("signer error: {0}")]
    Signer(#[from] certum_ledger::SignerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
