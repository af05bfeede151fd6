//! Error types for the wallet core

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wallet core
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secure randomness unavailable: {0}")]
    Rng(String),

    // Key material errors
    #[error("Invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    // Transfer input errors
    #[error("Invalid destination address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // Vault errors
    #[error("Vault decryption failed")]
    DecryptionFailed,

    #[error("Unsupported vault record version: {0}")]
    UnsupportedVaultVersion(u32),

    #[error("No wallet found in storage")]
    WalletNotFound,

    #[error("Wallet is locked")]
    WalletLocked,

    #[error("Vault storage error: {0}")]
    Storage(String),

    // Network errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction rejected by network: {0}")]
    Rejected(String),

    #[error("Blockhash expired: height {height} exceeds last valid height {last_valid_block_height}")]
    Expired {
        height: u64,
        last_valid_block_height: u64,
    },

    #[error("Confirmation timed out after {0} polls")]
    ConfirmationTimeout(u32),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Check if this error is retryable (transient)
    ///
    /// Retrying means repeating the step that failed. An expired blockhash is
    /// NOT retryable: the attempt must restart from a fresh checkpoint, never
    /// by resubmitting the stale signed payload.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Rpc(_) | Error::ConfirmationTimeout(_))
    }

    /// Check if this error was caused by malformed caller input
    ///
    /// These are surfaced immediately and never retried.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidMnemonic(_)
                | Error::InvalidPath(_)
                | Error::InvalidAddress(_)
                | Error::InvalidAmount(_)
        )
    }
}

// Conversion from solana_client errors
impl From<solana_client::client_error::ClientError> for Error {
    fn from(e: solana_client::client_error::ClientError) -> Self {
        Error::Rpc(e.to_string())
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
