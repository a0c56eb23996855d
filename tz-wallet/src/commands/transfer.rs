//! Transfer command

use anyhow::{anyhow, Result};
use tz_wallet::{
    amount::{format_minor, to_minor},
    keys::validate_address,
    ClientConfig, TransferRequest,
};

use super::{
    open_registry, print_receipt, print_success, prompt_confirm, unlock_session, Unlock,
};

/// Arguments of the transfer command
pub struct TransferArgs {
    pub destination: String,
    pub amount: f64,
    pub fee: f64,
    pub source: Option<String>,
    pub skip_confirm: bool,
}

/// Run the transfer command
pub async fn run(
    config: &ClientConfig,
    name: &str,
    unlock: Unlock,
    args: TransferArgs,
) -> Result<()> {
    validate_address(&args.destination)?;
    let amount = to_minor(args.amount)?;
    let fee = to_minor(args.fee)?;
    if amount == 0 {
        return Err(anyhow!("Amount must be greater than 0"));
    }

    let registry = open_registry(config)?;
    let session = unlock_session(&registry, name, unlock)?;
    let client = session.client(config.gateway()?)?;

    println!();
    println!("Transfer summary:");
    let from = args
        .source
        .as_deref()
        .unwrap_or(client.keypair().public_key_hash());
    println!("  From:   {}", from);
    println!("  To:     {}", args.destination);
    println!("  Amount: {}", format_minor(amount));
    println!("  Fee:    {}", format_minor(fee));
    println!();

    if !args.skip_confirm && !prompt_confirm("Send this transfer?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let receipt = client
        .transfer(TransferRequest {
            destination: args.destination,
            amount: args.amount,
            fee: args.fee,
            source: args.source,
            parameters: None,
        })
        .await?;

    println!();
    print_success("Transfer injected");
    print_receipt(&receipt);

    Ok(())
}
