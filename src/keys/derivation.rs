//! SLIP-0010 hierarchical key derivation for ed25519
//!
//! Ed25519 has no public (non-hardened) derivation, so every path segment
//! must be hardened. The derived 32-byte key is expanded into a Solana
//! keypair with the standard seed-to-keypair expansion.

use std::fmt;
use std::str::FromStr;

use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use solana_sdk::signature::{keypair_from_seed, Keypair};

use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Index offset marking a hardened segment
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-0010 master key HMAC domain for ed25519
const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

/// The fixed derivation path for this wallet (account 0, external chain 0)
pub const SOLANA_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// A parsed hardened-only derivation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    segments: Vec<u32>,
}

impl DerivationPath {
    /// Path segments without the hardened offset applied
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');

        if parts.next() != Some("m") {
            return Err(Error::InvalidPath(format!("{s}: must start with 'm/'")));
        }

        let mut segments = Vec::new();
        for part in parts {
            let index = part.strip_suffix('\'').ok_or_else(|| {
                Error::InvalidPath(format!(
                    "{s}: segment '{part}' is not hardened (ed25519 requires hardened-only paths)"
                ))
            })?;

            let index: u32 = index
                .parse()
                .map_err(|_| Error::InvalidPath(format!("{s}: segment '{part}' is not a number")))?;

            if index >= HARDENED_OFFSET {
                return Err(Error::InvalidPath(format!(
                    "{s}: segment index {index} out of range"
                )));
            }

            segments.push(index);
        }

        if segments.is_empty() {
            return Err(Error::InvalidPath(format!("{s}: empty path")));
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for segment in &self.segments {
            write!(f, "/{segment}'")?;
        }
        Ok(())
    }
}

/// Walk a SLIP-0010 path over a BIP-39 seed, yielding the derived 32-byte key
pub fn derive_key(seed: &[u8], path: &DerivationPath) -> [u8; 32] {
    // Master: I = HMAC-SHA512(Key="ed25519 seed", Data=seed)
    let mut mac = HmacSha512::new_from_slice(ED25519_CURVE_KEY)
        .expect("HMAC accepts any key length");
    mac.update(seed);
    let digest = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    chain_code.copy_from_slice(&digest[32..]);

    for &segment in path.segments() {
        // Child: I = HMAC-SHA512(Key=chain, Data=0x00 || key || be32(index'))
        let mut mac = HmacSha512::new_from_slice(&chain_code)
            .expect("HMAC accepts any key length");
        mac.update(&[0x00]);
        mac.update(&key);
        mac.update(&(segment | HARDENED_OFFSET).to_be_bytes());

        let digest = mac.finalize().into_bytes();
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
    }

    key
}

/// Derive the signing keypair for a seed along a path
pub fn keypair_from_seed_and_path(seed: &[u8], path: &DerivationPath) -> Result<Keypair> {
    let derived = derive_key(seed, path);
    keypair_from_seed(&derived).map_err(|e| Error::InvalidKeypair(e.to_string()))
}

/// Derive the wallet keypair for a mnemonic along the fixed Solana path
pub fn keypair_from_phrase(mnemonic: &Mnemonic) -> Result<Keypair> {
    let path: DerivationPath = SOLANA_DERIVATION_PATH.parse()?;
    let seed = super::mnemonic::to_seed(mnemonic, "");
    keypair_from_seed_and_path(&seed, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    fn slip10_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_path_parsing() {
        let path: DerivationPath = SOLANA_DERIVATION_PATH.parse().unwrap();
        assert_eq!(path.segments(), &[44, 501, 0, 0]);
        assert_eq!(path.to_string(), SOLANA_DERIVATION_PATH);
    }

    #[test]
    fn test_path_rejects_malformed() {
        assert!(matches!(
            "44'/501'/0'/0'".parse::<DerivationPath>(),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            "m/44/501'/0'/0'".parse::<DerivationPath>(),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            "m/44'/abc'".parse::<DerivationPath>(),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            "m".parse::<DerivationPath>(),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_slip10_vector_1_child() {
        // SLIP-0010 test vector 1 for ed25519, chain m/0'
        let path: DerivationPath = "m/0'".parse().unwrap();
        let key = derive_key(&slip10_seed(), &path);
        assert_eq!(
            hex::encode(key),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_slip10_vector_1_deep_chain() {
        // SLIP-0010 test vector 1 for ed25519, chain m/0'/1'/2'/2'/1000000000'
        let path: DerivationPath = "m/0'/1'/2'/2'/1000000000'".parse().unwrap();
        let key = derive_key(&slip10_seed(), &path);
        assert_eq!(
            hex::encode(key),
            "8f94d394a8e8fd6b1bc2f3f49f5c47e385281d5c17e65324b0f62483e37e8793"
        );
    }

    #[test]
    fn test_keypair_is_deterministic() {
        let mnemonic = crate::keys::mnemonic::parse(
            "abandon abandon abandon abandon abandon abandon \
             abandon abandon abandon abandon abandon about",
        )
        .unwrap();

        let a = keypair_from_phrase(&mnemonic).unwrap();
        let b = keypair_from_phrase(&mnemonic).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_different_paths_yield_different_keys() {
        let mnemonic = crate::keys::mnemonic::generate().unwrap();
        let seed = crate::keys::mnemonic::to_seed(&mnemonic, "");

        let account0: DerivationPath = "m/44'/501'/0'/0'".parse().unwrap();
        let account1: DerivationPath = "m/44'/501'/1'/0'".parse().unwrap();

        let a = keypair_from_seed_and_path(&seed, &account0).unwrap();
        let b = keypair_from_seed_and_path(&seed, &account1).unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
    }
}
