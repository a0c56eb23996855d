//! Account listing command

use anyhow::Result;
use tz_wallet::ClientConfig;

use super::open_registry;

/// Run the accounts command
pub async fn run(config: &ClientConfig) -> Result<()> {
    let registry = open_registry(config)?;
    let accounts = registry.accounts()?;

    if accounts.is_empty() {
        println!("No accounts. Run 'tz-wallet generate <name>' to create one.");
        return Ok(());
    }

    for name in accounts.keys() {
        println!("  {}", name);
    }
    if let Some(record) = registry.access_code()? {
        println!();
        println!("Access code: generated for '{}'", record.name);
    }

    Ok(())
}
