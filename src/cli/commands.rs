//! CLI command implementations
//!
//! Thin glue over the wallet core: prompts, formatting, and wiring. No key
//! material handling beyond passing prompts through to the context.

use dialoguer::{Confirm, Input, Password};
use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::WalletContext;
use crate::transfer::{lamports_to_sol, LedgerRpc, SolanaRpc, TransferEngine, TransferRequest};

fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| Error::Io(e.to_string()))
}

fn prompt_new_password() -> Result<String> {
    Password::new()
        .with_prompt("Choose a password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| Error::Io(e.to_string()))
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Io(e.to_string()))
}

fn confirm_overwrite(context: &WalletContext<crate::vault::FileStorage>) -> Result<bool> {
    if !context.is_initialized()? {
        return Ok(true);
    }
    warn!("A wallet already exists in storage; continuing replaces it");
    confirm("Overwrite the existing wallet? The old phrase will be lost")
}

/// Generate a new wallet and print the backup phrase once
pub async fn create(config: &Config) -> Result<()> {
    let mut context = WalletContext::open(config);
    if !confirm_overwrite(&context)? {
        println!("Aborted");
        return Ok(());
    }

    let password = prompt_new_password()?;
    let phrase = context.create(&password)?;

    println!("Address: {}", context.address()?);
    println!();
    println!("Recovery phrase (write it down, it is shown only once):");
    println!("  {}", *phrase);
    Ok(())
}

/// Import an existing recovery phrase
pub async fn import(config: &Config) -> Result<()> {
    let mut context = WalletContext::open(config);
    if !confirm_overwrite(&context)? {
        println!("Aborted");
        return Ok(());
    }

    let phrase: String = Input::new()
        .with_prompt("Recovery phrase (12 words)")
        .interact_text()
        .map_err(|e| Error::Io(e.to_string()))?;

    let password = prompt_new_password()?;
    let address = context.import(&phrase, &password)?;

    println!("Address: {address}");
    Ok(())
}

/// Show the wallet address
pub async fn address(config: &Config) -> Result<()> {
    let mut context = WalletContext::open(config);
    let password = prompt_password("Password")?;
    let session = context.unlock(&password)?;

    println!("{}", session.pubkey());
    Ok(())
}

/// Show the wallet balance
pub async fn balance(config: &Config) -> Result<()> {
    let mut context = WalletContext::open(config);
    let password = prompt_password("Password")?;
    let session = context.unlock(&password)?;

    let rpc = SolanaRpc::new(&config.rpc)?;
    let lamports = rpc.balance(&session.pubkey()).await?;

    println!("{} SOL ({} lamports)", lamports_to_sol(lamports), lamports);
    Ok(())
}

/// Send SOL to a destination address
pub async fn send(
    config: &Config,
    destination: &str,
    amount_sol: f64,
    skip_confirm: bool,
) -> Result<()> {
    // Validate before prompting for anything
    let request = TransferRequest::parse(destination, amount_sol)?;

    let mut context = WalletContext::open(config);
    let password = prompt_password("Password")?;
    let session = context.unlock(&password)?;

    if !skip_confirm {
        let prompt = format!(
            "Send {amount_sol} SOL from {} to {}?",
            session.pubkey(),
            request.destination
        );
        if !confirm(&prompt)? {
            println!("Aborted");
            return Ok(());
        }
    }

    let engine = TransferEngine::new(SolanaRpc::new(&config.rpc)?, config.transfer.clone());

    match engine.transfer(session.keypair(), &request).await {
        Ok(signature) => {
            println!("Confirmed: {signature}");
            Ok(())
        }
        Err(e @ Error::Expired { .. }) => {
            // The signed payload is stale; only a fresh attempt can succeed
            eprintln!("The network window for this transaction closed before confirmation.");
            eprintln!("Run the send again to retry with a fresh blockhash.");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Reveal the stored recovery phrase
pub async fn export(config: &Config) -> Result<()> {
    let context = WalletContext::open(config);
    let password = prompt_password("Password")?;
    let phrase = context.export_phrase(&password)?;

    println!("Recovery phrase (keep it secret):");
    println!("  {}", *phrase);
    Ok(())
}

/// Delete the stored wallet
pub async fn wipe(config: &Config, force: bool) -> Result<()> {
    let mut context = WalletContext::open(config);
    if !context.is_initialized()? {
        println!("No wallet stored");
        return Ok(());
    }

    if !force
        && !confirm("Delete the stored wallet? Without the recovery phrase this is irreversible")?
    {
        println!("Aborted");
        return Ok(());
    }

    context.wipe()?;
    println!("Wallet wiped");
    Ok(())
}

/// Print the active configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("RPC endpoint:            {}", config.rpc.endpoint);
    println!("Commitment:              {}", config.rpc.commitment);
    println!("Checkpoint commitment:   {}", config.rpc.checkpoint_commitment);
    println!("Vault path:              {}", config.vault.path);
    println!("Storage key:             {}", config.vault.storage_key);
    println!(
        "Confirmation polling:    every {}ms, max {} polls",
        config.transfer.confirm_poll_interval_ms, config.transfer.max_confirmation_polls
    );
    Ok(())
}
