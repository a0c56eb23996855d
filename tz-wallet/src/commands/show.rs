//! Show account keys command

use anyhow::Result;
use tz_wallet::ClientConfig;

use super::{open_registry, print_warning, unlock_session, Unlock};

/// Run the show command
pub async fn run(config: &ClientConfig, name: &str, unlock: Unlock, secret: bool) -> Result<()> {
    let registry = open_registry(config)?;
    let session = unlock_session(&registry, name, unlock)?;
    let keypair = session.keypair()?;

    println!();
    println!("Address:    {}", keypair.public_key_hash());
    println!("Public key: {}", keypair.public_key());
    if secret {
        print_warning("Anyone with the secret key controls this account.");
        println!("Secret key: {}", keypair.secret_key());
    }

    Ok(())
}
