//! Wallet session and context
//!
//! The context replaces process-wide wallet state with an explicit object the
//! presentation layer passes around. One unlock yields one session owning the
//! derived keypair; the private key never leaves it.

use bip39::Mnemonic;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use tracing::info;
use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::keys;
use crate::vault::{self, FileStorage, VaultStorage};

/// An unlocked wallet: the in-memory signing keypair for one session
///
/// Never serialized, never logged, never transmitted.
pub struct WalletSession {
    keypair: Keypair,
}

impl WalletSession {
    fn from_mnemonic(mnemonic: &Mnemonic) -> Result<Self> {
        Ok(Self {
            keypair: keys::keypair_from_phrase(mnemonic)?,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

/// Wallet lifecycle over a persistence slot
///
/// Unlock is idempotent: a live session short-circuits, so repeated calls
/// from the presentation layer are safe. The session option itself is the
/// initialization flag.
pub struct WalletContext<S: VaultStorage> {
    storage: S,
    storage_key: String,
    session: Option<WalletSession>,
}

impl WalletContext<FileStorage> {
    pub fn open(config: &Config) -> Self {
        Self::with_storage(
            FileStorage::new(&config.vault.path),
            config.vault.storage_key.clone(),
        )
    }
}

impl<S: VaultStorage> WalletContext<S> {
    pub fn with_storage(storage: S, storage_key: String) -> Self {
        Self {
            storage,
            storage_key,
            session: None,
        }
    }

    /// Whether a vault record exists (regardless of password)
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.storage.get(&self.storage_key)?.is_some())
    }

    /// Generate a fresh wallet, persist it encrypted, and unlock it
    ///
    /// Returns the phrase exactly once so the caller can display it for
    /// backup; it is not retrievable again without the password.
    pub fn create(&mut self, password: &str) -> Result<Zeroizing<String>> {
        let mnemonic = keys::generate()?;
        let phrase = Zeroizing::new(mnemonic.to_string());

        vault::save(&self.storage, &self.storage_key, &phrase, password)?;
        let session = WalletSession::from_mnemonic(&mnemonic)?;
        info!("Created wallet {}", session.pubkey());
        self.session = Some(session);

        Ok(phrase)
    }

    /// Import an existing phrase, persist it encrypted, and unlock it
    ///
    /// Overwrites any previously stored wallet.
    pub fn import(&mut self, phrase: &str, password: &str) -> Result<Pubkey> {
        let mnemonic = keys::parse(phrase)?;

        vault::save(&self.storage, &self.storage_key, &mnemonic.to_string(), password)?;
        let session = WalletSession::from_mnemonic(&mnemonic)?;
        let pubkey = session.pubkey();
        info!("Imported wallet {}", pubkey);
        self.session = Some(session);

        Ok(pubkey)
    }

    /// Decrypt the stored phrase and derive the session keypair
    ///
    /// No-op if already unlocked. `WalletNotFound` on an empty slot (the
    /// expected first-run state); `DecryptionFailed` on a wrong password.
    pub fn unlock(&mut self, password: &str) -> Result<&WalletSession> {
        if self.session.is_none() {
            let phrase = vault::load(&self.storage, &self.storage_key, password)?
                .ok_or(Error::WalletNotFound)?;
            let phrase = Zeroizing::new(phrase);

            let mnemonic = keys::parse(&phrase)?;
            let session = WalletSession::from_mnemonic(&mnemonic)?;
            info!("Unlocked wallet {}", session.pubkey());
            self.session = Some(session);
        }

        self.session.as_ref().ok_or(Error::WalletLocked)
    }

    /// Drop the in-memory keypair
    pub fn lock(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Result<&WalletSession> {
        self.session.as_ref().ok_or(Error::WalletLocked)
    }

    pub fn address(&self) -> Result<Pubkey> {
        Ok(self.session()?.pubkey())
    }

    /// Decrypt and return the stored phrase for backup display
    pub fn export_phrase(&self, password: &str) -> Result<Zeroizing<String>> {
        vault::load(&self.storage, &self.storage_key, password)?
            .map(Zeroizing::new)
            .ok_or(Error::WalletNotFound)
    }

    /// Delete the stored record and drop the session (irrecoverable)
    pub fn wipe(&mut self) -> Result<()> {
        vault::wipe(&self.storage, &self.storage_key)?;
        self.lock();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::MemoryStorage;

    fn context() -> WalletContext<MemoryStorage> {
        WalletContext::with_storage(MemoryStorage::new(), "wallet.mnemonic".to_string())
    }

    #[test]
    fn test_create_save_load_scenario() {
        let mut ctx = context();
        assert!(!ctx.is_initialized().unwrap());

        let phrase = ctx.create("correct-horse").unwrap();
        let address = ctx.address().unwrap();
        assert!(ctx.is_initialized().unwrap());

        // Correct password returns the original phrase unchanged
        let exported = ctx.export_phrase("correct-horse").unwrap();
        assert_eq!(*exported, *phrase);

        // Wrong password is a generic decryption failure
        assert!(matches!(
            ctx.export_phrase("wrong"),
            Err(Error::DecryptionFailed)
        ));

        // Re-unlock from storage derives the same keypair
        ctx.lock();
        assert!(matches!(ctx.address(), Err(Error::WalletLocked)));
        ctx.unlock("correct-horse").unwrap();
        assert_eq!(ctx.address().unwrap(), address);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut ctx = context();
        ctx.create("pw").unwrap();
        let address = ctx.address().unwrap();

        // Second unlock is a no-op on the live session, even with a
        // different password string
        let session = ctx.unlock("anything").unwrap();
        assert_eq!(session.pubkey(), address);
    }

    #[test]
    fn test_unlock_empty_slot_is_not_found() {
        let mut ctx = context();
        assert!(matches!(ctx.unlock("pw"), Err(Error::WalletNotFound)));
    }

    #[test]
    fn test_unlock_wrong_password_fails() {
        let mut ctx = context();
        ctx.create("right").unwrap();
        ctx.lock();
        assert!(matches!(ctx.unlock("wrong"), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_import_known_phrase_is_deterministic() {
        let phrase = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon about";

        let mut a = context();
        let mut b = context();
        let addr_a = a.import(phrase, "pw-a").unwrap();
        let addr_b = b.import(phrase, "pw-b").unwrap();
        assert_eq!(addr_a, addr_b);
    }

    #[test]
    fn test_import_rejects_invalid_phrase() {
        let mut ctx = context();
        assert!(matches!(
            ctx.import("definitely not a mnemonic", "pw"),
            Err(Error::InvalidMnemonic(_))
        ));
        assert!(!ctx.is_initialized().unwrap());
    }

    #[test]
    fn test_wipe_clears_record_and_session() {
        let mut ctx = context();
        ctx.create("pw").unwrap();
        ctx.wipe().unwrap();

        assert!(!ctx.is_initialized().unwrap());
        assert!(matches!(ctx.address(), Err(Error::WalletLocked)));
        assert!(matches!(ctx.unlock("pw"), Err(Error::WalletNotFound)));
    }
}
