//! Versioned encrypted vault record
//!
//! Wire format: JSON `{v, salt, iv, ct}` with base64 field values, then the
//! whole document base64-encoded into a single opaque string for the storage
//! slot. The version tag keys future KDF/cipher parameter migrations.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current record format version
pub const VAULT_VERSION: u32 = 1;

/// Salt length fed to the password KDF
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length
pub const IV_LEN: usize = 12;

/// One encrypted vault record
///
/// Salt and iv are freshly random per encryption, so encrypting the same
/// plaintext under the same password twice yields different records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    /// Format version
    pub v: u32,
    /// KDF salt, base64
    pub salt: String,
    /// AES-GCM nonce, base64
    pub iv: String,
    /// Ciphertext plus auth tag, base64
    pub ct: String,
    /// Unix timestamp of encryption (informational, not authenticated)
    #[serde(default)]
    pub created_at: i64,
}

impl VaultRecord {
    pub fn new(salt: &[u8], iv: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            v: VAULT_VERSION,
            salt: BASE64.encode(salt),
            iv: BASE64.encode(iv),
            ct: BASE64.encode(ciphertext),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Serialize into the opaque string stored in the persistence slot
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(BASE64.encode(json))
    }

    /// Parse a stored blob back into a record
    ///
    /// Any structural corruption is reported as `DecryptionFailed`: the
    /// caller cannot distinguish a tampered blob from a wrong password, and
    /// should not be able to. Only a recognizable-but-newer version tag gets
    /// its own error, so upgrades can be diagnosed.
    pub fn decode(blob: &str) -> Result<Self> {
        let json = BASE64.decode(blob).map_err(|_| Error::DecryptionFailed)?;
        let record: VaultRecord =
            serde_json::from_slice(&json).map_err(|_| Error::DecryptionFailed)?;

        if record.v != VAULT_VERSION {
            return Err(Error::UnsupportedVaultVersion(record.v));
        }

        Ok(record)
    }

    pub fn salt_bytes(&self) -> Result<Vec<u8>> {
        BASE64.decode(&self.salt).map_err(|_| Error::DecryptionFailed)
    }

    pub fn iv_bytes(&self) -> Result<Vec<u8>> {
        BASE64.decode(&self.iv).map_err(|_| Error::DecryptionFailed)
    }

    pub fn ciphertext_bytes(&self) -> Result<Vec<u8>> {
        BASE64.decode(&self.ct).map_err(|_| Error::DecryptionFailed)
    }
}
