//! Encrypted vault: password-protected mnemonic persistence
//!
//! # Architecture
//!
//! ```text
//! plaintext + password → cipher::seal → VaultRecord → blob → VaultStorage
//! ```
//!
//! Save always creates a fresh record (new salt and nonce); load of an empty
//! slot is the expected first-run state, not an error.

pub mod cipher;
pub mod record;
pub mod storage;

pub use cipher::PBKDF2_ROUNDS;
pub use record::{VaultRecord, VAULT_VERSION};
pub use storage::{FileStorage, MemoryStorage, VaultStorage};

use tracing::info;

use crate::error::Result;

/// Encrypt a plaintext under a password and write it to the slot
///
/// Overwrites any prior record at `storage_key`.
pub fn save<S: VaultStorage>(
    storage: &S,
    storage_key: &str,
    plaintext: &str,
    password: &str,
) -> Result<()> {
    let record = cipher::seal(plaintext, password)?;
    storage.put(storage_key, &record.encode()?)?;
    info!("Vault record saved under '{}'", storage_key);
    Ok(())
}

/// Read and decrypt the slot; `None` if no record was ever saved
pub fn load<S: VaultStorage>(
    storage: &S,
    storage_key: &str,
    password: &str,
) -> Result<Option<String>> {
    let Some(blob) = storage.get(storage_key)? else {
        return Ok(None);
    };

    let record = record::VaultRecord::decode(&blob)?;
    cipher::open(&record, password).map(Some)
}

/// Delete the record at the slot (irrecoverable)
pub fn wipe<S: VaultStorage>(storage: &S, storage_key: &str) -> Result<()> {
    storage.remove(storage_key)?;
    info!("Vault record wiped from '{}'", storage_key);
    Ok(())
}
