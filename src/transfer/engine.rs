//! SOL transfer execution
//!
//! State machine per attempt:
//! VALIDATED → CHECKPOINTED → SIGNED → SUBMITTED → {CONFIRMED | EXPIRED | REJECTED}
//!
//! An expired checkpoint makes the signed payload permanently unconfirmable;
//! the caller restarts from the checkpoint fetch, never resubmits it.

use std::str::FromStr;

use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info, warn};

use crate::config::TransferConfig;
use crate::error::{Error, Result};

use super::rpc::{Checkpoint, LedgerRpc, SignatureStatus};

/// A validated transfer: destination and amount in lamports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub destination: Pubkey,
    pub lamports: u64,
}

impl TransferRequest {
    /// Validate raw caller input
    ///
    /// Fails fast with an invalid-input error before any network call: the
    /// destination must base58-decode to a 32-byte public key and the amount
    /// must be positive, finite, and whole in lamports.
    pub fn parse(destination: &str, amount_sol: f64) -> Result<Self> {
        let destination = Pubkey::from_str(destination)
            .map_err(|e| Error::InvalidAddress(format!("{destination}: {e}")))?;

        if !amount_sol.is_finite() || amount_sol <= 0.0 {
            return Err(Error::InvalidAmount(format!(
                "{amount_sol}: must be a positive number"
            )));
        }

        let raw = amount_sol * LAMPORTS_PER_SOL as f64;
        let rounded = raw.round();

        // Tolerance covers binary float representation of decimal amounts,
        // not genuine sub-lamport fractions
        if (raw - rounded).abs() > 1e-3 {
            return Err(Error::InvalidAmount(format!(
                "{amount_sol} SOL is not a whole number of lamports"
            )));
        }

        if rounded < 1.0 || rounded > u64::MAX as f64 {
            return Err(Error::InvalidAmount(format!(
                "{amount_sol} SOL is out of range"
            )));
        }

        Ok(Self {
            destination,
            lamports: rounded as u64,
        })
    }
}

/// Build and sign the transfer transaction bound to a checkpoint
///
/// Pure and local: single system transfer instruction, sender as fee payer.
pub fn build_transfer(
    signer: &Keypair,
    request: &TransferRequest,
    checkpoint: &Checkpoint,
) -> Transaction {
    let instruction =
        system_instruction::transfer(&signer.pubkey(), &request.destination, request.lamports);

    Transaction::new_signed_with_payer(
        &[instruction],
        Some(&signer.pubkey()),
        &[signer],
        checkpoint.blockhash,
    )
}

/// Transfer executor: checkpoint, sign, submit, poll to resolution
pub struct TransferEngine<R: LedgerRpc> {
    rpc: R,
    config: TransferConfig,
}

impl<R: LedgerRpc> TransferEngine<R> {
    pub fn new(rpc: R, config: TransferConfig) -> Self {
        Self { rpc, config }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Validate raw input and run a full transfer attempt
    pub async fn send(
        &self,
        signer: &Keypair,
        destination: &str,
        amount_sol: f64,
    ) -> Result<Signature> {
        let request = TransferRequest::parse(destination, amount_sol)?;
        self.transfer(signer, &request).await
    }

    /// Run one transfer attempt for an already-validated request
    ///
    /// On `Expired` the caller must restart here (fresh checkpoint), not
    /// retry any individual step.
    pub async fn transfer(&self, signer: &Keypair, request: &TransferRequest) -> Result<Signature> {
        let checkpoint = self.rpc.latest_blockhash().await?;

        let transaction = build_transfer(signer, request, &checkpoint);

        let signature = self.rpc.submit(&transaction).await?;
        debug!(
            "Submitted {} lamports from {} to {} (sig: {})",
            request.lamports,
            signer.pubkey(),
            request.destination,
            signature
        );

        self.await_confirmation(&signature, &checkpoint).await?;

        info!(
            "Transfer confirmed: {} lamports to {} (sig: {})",
            request.lamports, request.destination, signature
        );
        Ok(signature)
    }

    /// Poll until confirmation, rejection, checkpoint expiry, or the poll cap
    ///
    /// Dropping the returned future abandons the poll without network side
    /// effects; a submitted transaction lives on independently.
    async fn await_confirmation(&self, signature: &Signature, checkpoint: &Checkpoint) -> Result<()> {
        for poll in 0..self.config.max_confirmation_polls {
            match self.rpc.signature_status(signature).await? {
                SignatureStatus::Confirmed => return Ok(()),
                SignatureStatus::Failed(reason) => return Err(Error::Rejected(reason)),
                SignatureStatus::Pending => {}
            }

            let height = self.rpc.block_height().await?;
            if height > checkpoint.last_valid_block_height {
                warn!(
                    "Checkpoint expired at height {} (last valid {}), sig {} is stale",
                    height, checkpoint.last_valid_block_height, signature
                );
                return Err(Error::Expired {
                    height,
                    last_valid_block_height: checkpoint.last_valid_block_height,
                });
            }

            debug!(
                "Awaiting confirmation of {} (poll {}, height {})",
                signature,
                poll + 1,
                height
            );
            tokio::time::sleep(self.config.poll_interval()).await;
        }

        Err(Error::ConfirmationTimeout(self.config.max_confirmation_polls))
    }
}

/// Convert lamports to SOL for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
