//! Password-based authenticated encryption
//!
//! PBKDF2-HMAC-SHA256 stretches the password into a 256-bit key; AES-256-GCM
//! provides confidentiality and tamper detection. The round count is part of
//! the record format: changing it requires bumping `VAULT_VERSION`.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

use super::record::{VaultRecord, IV_LEN, SALT_LEN};

/// PBKDF2 iteration count for vault records at `VAULT_VERSION` 1
pub const PBKDF2_ROUNDS: u32 = 200_000;

/// Stretch a password and salt into a 256-bit symmetric key
fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ROUNDS, key.as_mut());
    key
}

/// Encrypt a plaintext under a password into a fresh record
///
/// Salt and nonce are drawn fresh from the OS CSPRNG on every call.
pub fn seal(plaintext: &str, password: &str) -> Result<VaultRecord> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .and_then(|_| OsRng.try_fill_bytes(&mut iv))
        .map_err(|e| Error::Rng(e.to_string()))?;

    let key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| Error::Internal(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|e| Error::Internal(format!("encryption failed: {e}")))?;

    Ok(VaultRecord::new(&salt, &iv, &ciphertext))
}

/// Decrypt a record with a password
///
/// Wrong password and tampered ciphertext both fail the GCM tag check and
/// surface as the same generic `DecryptionFailed`. No partial output.
pub fn open(record: &VaultRecord, password: &str) -> Result<String> {
    let salt = record.salt_bytes()?;
    let iv = record.iv_bytes()?;
    let ciphertext = record.ciphertext_bytes()?;

    if salt.len() != SALT_LEN || iv.len() != IV_LEN {
        return Err(Error::DecryptionFailed);
    }

    let key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|_| Error::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
        .map_err(|_| Error::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| Error::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    #[test]
    fn test_seal_open_round_trip() {
        let record = seal("secret words here", "hunter2").unwrap();
        assert_eq!(open(&record, "hunter2").unwrap(), "secret words here");
    }

    #[test]
    fn test_wrong_password_fails_generically() {
        let record = seal("secret", "correct-horse").unwrap();
        assert!(matches!(
            open(&record, "battery-staple"),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_generically() {
        let record = seal("secret", "pw").unwrap();

        let mut ct = record.ciphertext_bytes().unwrap();
        ct[0] ^= 0x01;
        let tampered = VaultRecord {
            ct: BASE64.encode(ct),
            ..record
        };

        assert!(matches!(
            open(&tampered, "pw"),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn test_records_are_nondeterministic() {
        let a = seal("same plaintext", "same password").unwrap();
        let b = seal("same plaintext", "same password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ct, b.ct);
    }
}
