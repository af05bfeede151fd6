//! SOL transfer engine
//!
//! Validation, blockhash checkpointing, signing, submission, and bounded
//! confirmation polling against the ledger RPC boundary.

pub mod engine;
pub mod rpc;

pub use engine::{build_transfer, lamports_to_sol, TransferEngine, TransferRequest};
pub use rpc::{Checkpoint, LedgerRpc, SignatureStatus, SolanaRpc};
