//! Ledger RPC boundary
//!
//! The engine consumes three network operations: checkpoint fetch, signed
//! transaction submission, and confirmation lookup. They are behind a trait
//! so tests can drive the state machine with a mock network.

use std::str::FromStr;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::Duration;
use tracing::debug;

use crate::config::RpcConfig;
use crate::error::{Error, Result};

/// A recent blockhash and the height at which it stops being accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Confirmation state of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Included at the required commitment level
    Confirmed,
    /// Not yet observed at the required commitment level
    Pending,
    /// Included but failed on-chain
    Failed(String),
}

/// Network operations the transfer engine depends on
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch the current blockhash checkpoint
    async fn latest_blockhash(&self) -> Result<Checkpoint>;

    /// Current network block height
    async fn block_height(&self) -> Result<u64>;

    /// Submit a signed transaction, returning its tracking signature
    async fn submit(&self, transaction: &Transaction) -> Result<Signature>;

    /// Look up the confirmation state of a submitted transaction
    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus>;

    /// Balance of an address in lamports
    async fn balance(&self, address: &Pubkey) -> Result<u64>;
}

/// Production implementation over the Solana JSON-RPC API
pub struct SolanaRpc {
    client: RpcClient,
    commitment: CommitmentConfig,
    checkpoint_commitment: CommitmentConfig,
}

impl SolanaRpc {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let commitment = CommitmentConfig::from_str(&config.commitment)
            .map_err(|e| Error::Config(format!("invalid commitment: {e}")))?;
        let checkpoint_commitment = CommitmentConfig::from_str(&config.checkpoint_commitment)
            .map_err(|e| Error::Config(format!("invalid checkpoint commitment: {e}")))?;

        let client = RpcClient::new_with_timeout_and_commitment(
            config.endpoint.clone(),
            Duration::from_millis(config.timeout_ms),
            commitment,
        );

        Ok(Self {
            client,
            commitment,
            checkpoint_commitment,
        })
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpc {
    async fn latest_blockhash(&self) -> Result<Checkpoint> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.checkpoint_commitment)
            .await?;

        debug!(
            "Fetched checkpoint: {} (valid through height {})",
            blockhash, last_valid_block_height
        );

        Ok(Checkpoint {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn block_height(&self) -> Result<u64> {
        Ok(self
            .client
            .get_block_height_with_commitment(self.commitment)
            .await?)
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature> {
        self.client.send_transaction(transaction).await.map_err(|e| {
            // Preflight/on-chain rejections are fatal for the attempt;
            // everything else is transport and safe to retry
            match e.get_transaction_error() {
                Some(tx_err) => Error::Rejected(tx_err.to_string()),
                None => Error::Rpc(e.to_string()),
            }
        })
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus> {
        let status = self
            .client
            .get_signature_status_with_commitment(signature, self.commitment)
            .await?;

        Ok(match status {
            None => SignatureStatus::Pending,
            Some(Ok(())) => SignatureStatus::Confirmed,
            Some(Err(tx_err)) => SignatureStatus::Failed(tx_err.to_string()),
        })
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.client.get_balance(address).await?)
    }
}
