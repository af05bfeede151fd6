//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_endpoint")]
    pub endpoint: String,

    /// Commitment level used for confirmation polling
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Commitment level used for the blockhash checkpoint fetch.
    /// Finalized gives the longest validity window.
    #[serde(default = "default_checkpoint_commitment")]
    pub checkpoint_commitment: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// File backing the persistence slot
    #[serde(default = "default_vault_path")]
    pub path: String,

    /// Storage key the encrypted mnemonic record lives under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    /// Interval between confirmation polls
    #[serde(default = "default_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,

    /// Hard cap on confirmation polls per attempt
    #[serde(default = "default_max_polls")]
    pub max_confirmation_polls: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rpc_endpoint(),
            commitment: default_commitment(),
            checkpoint_commitment: default_checkpoint_commitment(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
            storage_key: default_storage_key(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            confirm_poll_interval_ms: default_poll_interval_ms(),
            max_confirmation_polls: default_max_polls(),
        }
    }
}

impl TransferConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix WALLET_)
            .add_source(
                config::Environment::with_prefix("WALLET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.rpc.endpoint.is_empty() {
            anyhow::bail!("rpc.endpoint must not be empty");
        }

        if self.transfer.confirm_poll_interval_ms == 0 {
            anyhow::bail!("transfer.confirm_poll_interval_ms must be positive");
        }

        if self.transfer.max_confirmation_polls == 0 {
            anyhow::bail!("transfer.max_confirmation_polls must be positive");
        }

        if self.vault.storage_key.is_empty() {
            anyhow::bail!("vault.storage_key must not be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            vault: VaultConfig::default(),
            transfer: TransferConfig::default(),
        }
    }
}

fn default_rpc_endpoint() -> String {
    "https://api.devnet.solana.com".to_string()
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_checkpoint_commitment() -> String {
    "finalized".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_vault_path() -> String {
    "wallet-vault.json".to_string()
}

fn default_storage_key() -> String {
    "wallet.mnemonic".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_polls() -> u32 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rpc.endpoint, "https://api.devnet.solana.com");
        assert_eq!(config.rpc.checkpoint_commitment, "finalized");
        assert_eq!(config.vault.storage_key, "wallet.mnemonic");
        assert_eq!(config.transfer.max_confirmation_polls, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("does-not-exist.toml").unwrap();
        assert_eq!(config.transfer.confirm_poll_interval_ms, 1_000);
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = Config::default();
        config.transfer.confirm_poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
