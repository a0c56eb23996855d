//! Contract origination command

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tz_wallet::{ClientConfig, OriginationRequest};

use super::{open_registry, print_receipt, print_success, unlock_session, Unlock};

/// Arguments of the originate command
pub struct OriginateArgs {
    pub balance: f64,
    pub fee: f64,
    pub spendable: bool,
    pub delegatable: bool,
    pub script: Option<PathBuf>,
}

/// Run the originate command
pub async fn run(
    config: &ClientConfig,
    name: &str,
    unlock: Unlock,
    args: OriginateArgs,
) -> Result<()> {
    let script = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read script {}: {}", path.display(), e))?;
            Some(serde_json::from_str(&text)?)
        }
        None => None,
    };

    let registry = open_registry(config)?;
    let session = unlock_session(&registry, name, unlock)?;
    let client = session.client(config.gateway()?)?;

    let receipt = client
        .originate(OriginationRequest {
            balance: args.balance,
            fee: args.fee,
            spendable: args.spendable,
            delegatable: args.delegatable,
            script,
        })
        .await?;

    println!();
    print_success("Origination injected");
    print_receipt(&receipt);

    Ok(())
}
