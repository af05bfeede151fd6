//! Key material: mnemonic generation and hierarchical key derivation
//!
//! # Architecture
//!
//! ```text
//! mnemonic (12 words) → 64-byte seed → SLIP-0010 path walk → ed25519 Keypair
//! ```
//!
//! The mnemonic is the only durable secret; the seed and keypair are
//! recomputed on demand and held in memory only.

pub mod derivation;
pub mod mnemonic;

pub use derivation::{keypair_from_phrase, DerivationPath, SOLANA_DERIVATION_PATH};
pub use mnemonic::{generate, parse, to_seed};
