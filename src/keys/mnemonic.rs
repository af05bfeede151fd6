//! BIP-39 mnemonic generation and seed derivation

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// Entropy for a 12-word phrase (128 bits)
const ENTROPY_BYTES: usize = 16;

/// Word count this wallet generates and accepts on import
pub const WORD_COUNT: usize = 12;

/// Generate a fresh 12-word mnemonic from OS randomness
///
/// Failure to obtain secure randomness is surfaced as an error, never
/// degraded to a weaker source.
pub fn generate() -> Result<Mnemonic> {
    let mut entropy = [0u8; ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| Error::Rng(e.to_string()))?;

    Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Parse and validate a user-supplied phrase
///
/// Checks dictionary membership, the embedded checksum, and the 12-word
/// count. Used on import; spending does not require it (see [`to_seed`]).
pub fn parse(phrase: &str) -> Result<Mnemonic> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

    if mnemonic.word_count() != WORD_COUNT {
        return Err(Error::InvalidMnemonic(format!(
            "expected {} words, got {}",
            WORD_COUNT,
            mnemonic.word_count()
        )));
    }

    Ok(mnemonic)
}

/// Derive the 64-byte BIP-39 seed from a mnemonic
///
/// PBKDF2-HMAC-SHA512, 2048 rounds, salted with "mnemonic" + passphrase.
/// Pure function; checksum validation is a separate concern and an invalid
/// but well-formed phrase still derives a key (just not the expected one).
pub fn to_seed(mnemonic: &Mnemonic, passphrase: &str) -> [u8; 64] {
    mnemonic.to_seed(passphrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_12_words_and_valid() {
        let mnemonic = generate().unwrap();
        assert_eq!(mnemonic.word_count(), 12);

        // Round-trips through full validation (dictionary + checksum)
        parse(&mnemonic.to_string()).unwrap();
    }

    #[test]
    fn test_generate_no_collisions() {
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let mnemonic = generate().unwrap();
            assert_eq!(mnemonic.word_count(), 12);
            assert!(
                seen.insert(mnemonic.to_string()),
                "duplicate mnemonic generated"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        // All-"abandon" x12 has an invalid checksum word at the end
        let phrase = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon abandon";
        assert!(matches!(parse(phrase), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_word() {
        let phrase = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon zzzzzz";
        assert!(matches!(parse(phrase), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        // Valid 24-word checksum phrase, but this wallet only accepts 12
        let phrase = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon art";
        assert!(matches!(parse(phrase), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_seed_matches_bip39_vector() {
        // Trezor reference vector: zero entropy, passphrase "TREZOR"
        let mnemonic = parse(
            "abandon abandon abandon abandon abandon abandon \
             abandon abandon abandon abandon abandon about",
        )
        .unwrap();

        let seed = to_seed(&mnemonic, "TREZOR");
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f\
             09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mnemonic = generate().unwrap();
        assert_eq!(to_seed(&mnemonic, ""), to_seed(&mnemonic, ""));
        assert_ne!(to_seed(&mnemonic, ""), to_seed(&mnemonic, "other"));
    }
}
