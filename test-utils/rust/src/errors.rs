use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

/// Framework error types
#[derive(Error, Debug)]
pub enum VmError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Failed to set account: {0}")]
    SetAccountFailed(String),

    #[error("Impersonation failed: {0}")]
    ImpersonationFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction reverted: {0}")]
    TransactionReverted(String),

    #[error("Node spawn failed: {0}")]
    NodeSpawnFailed(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(u64),

    #[error("Fork error: {0}")]
    ForkError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract call failed: {0}")]
    ContractError(String),

    #[error("No signers provided")]
    NoSigners,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signer error: {0}")]
    SignerError(String),

    #[error("Token operation failed: {0}")]
    TokenError(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Math error: {0}")]
    MathError(#[from] library::LibraryError),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl From<alloy::transports::TransportError> for VmError {
    fn from(err: alloy::transports::TransportError) -> Self {
        VmError::RpcError(err.to_string())
    }
}

impl From<alloy::contract::Error> for VmError {
    fn from(err: alloy::contract::Error) -> Self {
        VmError::ContractError(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for VmError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        VmError::TransactionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for VmError {
    fn from(err: serde_json::Error) -> Self {
        VmError::Custom(format!("JSON error: {}", err))
    }
}

pub trait ResultExt<T> {
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| VmError::Custom(format!("{}: {}", msg, e)))
    }
}
