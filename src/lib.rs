//! Solana Wallet Core
//!
//! Non-custodial wallet: BIP-39 mnemonic generation, SLIP-0010 hierarchical
//! key derivation, password-protected encrypted vault, and SOL transfers with
//! blockhash expiry handling.

pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod session;
pub mod transfer;
pub mod vault;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use session::{WalletContext, WalletSession};
