//! Account creation command

use anyhow::Result;
use tz_wallet::ClientConfig;

use super::{open_registry, print_success, print_warning, prompt_confirm, prompt_new_password};

/// Run the generate command
pub async fn run(config: &ClientConfig, name: &str) -> Result<()> {
    let mut registry = open_registry(config)?;
    registry.validate_name(name)?;

    let password = prompt_new_password()?;
    let (mnemonic, keypair) = registry.create_account(name, &password)?;

    println!();
    println!("Your recovery phrase:");
    println!();
    for (i, word) in mnemonic.split_whitespace().enumerate() {
        print!("{:>2}. {:<12}", i + 1, word);
        if (i + 1) % 5 == 0 {
            println!();
        }
    }
    println!();
    print_warning("The phrase only restores this account together with the password.");
    print_warning("Write both down and store them safely!");

    println!();
    if !prompt_confirm("Have you written down your recovery phrase?")? {
        print_warning("The account was saved anyway; export its secret with 'tz-wallet show --secret'.");
    }

    println!();
    print_success(&format!("Account '{}' created", name));
    println!("Address: {}", keypair.public_key_hash());
    println!("Saved to: {}", config.store_path.display());

    Ok(())
}
