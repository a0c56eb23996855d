//! Account import command

use anyhow::Result;
use std::io::{self, Write};
use tz_wallet::{keys::validate_mnemonic, ClientConfig, Keypair};
use zeroize::Zeroizing;

use super::{open_registry, print_success, prompt_new_password, prompt_password};

/// Run the import command
pub async fn run(config: &ClientConfig, name: &str, secret: bool) -> Result<()> {
    let mut registry = open_registry(config)?;
    registry.validate_name(name)?;

    let keypair = if secret {
        let encoded = prompt_password("Enter encoded seed or secret key: ")?;
        let keypair = Keypair::from_encoded_secret(&encoded)?;
        let password = prompt_new_password()?;
        registry.import_account(name, &keypair, &password)?;
        keypair
    } else {
        let mnemonic = prompt_mnemonic()?;
        validate_mnemonic(&mnemonic)?;
        let passphrase = prompt_password("Enter recovery passphrase (empty if none): ")?;
        let password = prompt_new_password()?;
        registry.import_mnemonic(name, &mnemonic, &passphrase, &password)?
    };

    println!();
    print_success(&format!("Account '{}' imported", name));
    println!("Address: {}", keypair.public_key_hash());

    Ok(())
}

/// Prompt for a mnemonic phrase
fn prompt_mnemonic() -> Result<Zeroizing<String>> {
    print!("Enter your recovery phrase: ");
    io::stdout().flush()?;

    let mut input = Zeroizing::new(String::new());
    io::stdin().read_line(&mut input)?;

    Ok(Zeroizing::new(
        input.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}
