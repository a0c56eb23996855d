//! Balance check command

use anyhow::Result;
use tz_wallet::{amount::format_minor, ClientConfig};

use super::{open_registry, print_success, unlock_session, Unlock};

/// Run the balance command
pub async fn run(
    config: &ClientConfig,
    name: &str,
    unlock: Unlock,
    address: Option<&str>,
) -> Result<()> {
    let registry = open_registry(config)?;
    let mut session = unlock_session(&registry, name, unlock)?;
    let gateway = config.gateway()?;

    println!();
    println!("Querying {}...", gateway.host());

    let balance = match address {
        Some(address) => session.client(gateway)?.balance(Some(address)).await?,
        None => session.refresh_balance(&gateway).await?,
    };

    print_success(&format!("Balance: {}", format_minor(balance)));

    Ok(())
}
