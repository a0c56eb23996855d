//! Faucet claim command

use anyhow::Result;
use tz_wallet::{amount::format_minor, ClientConfig, FAUCET_AMOUNT};

use super::{open_registry, print_receipt, print_success, unlock_session, Unlock};

/// Run the faucet command
pub async fn run(config: &ClientConfig, name: &str, unlock: Unlock) -> Result<()> {
    let registry = open_registry(config)?;
    let session = unlock_session(&registry, name, unlock)?;
    let client = session.client(config.gateway()?)?;

    println!();
    println!("Claiming {} from the faucet...", format_minor(FAUCET_AMOUNT));

    let receipt = client.faucet().await?;

    print_success("Faucet claim injected");
    print_receipt(&receipt);

    Ok(())
}
