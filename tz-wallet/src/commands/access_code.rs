//! Access code generation command

use anyhow::Result;
use tz_wallet::{generate_access_code, CipherBlob, ClientConfig};

use super::{open_registry, print_success, print_warning, unlock_session, Unlock};

/// Run the access-code command
pub async fn run(config: &ClientConfig, name: &str) -> Result<()> {
    let mut registry = open_registry(config)?;
    let session = unlock_session(&registry, name, Unlock::Password)?;
    let keypair = session.keypair()?;

    if let Some(previous) = registry.access_code()? {
        print_warning(&format!(
            "Replacing the access code previously generated for '{}'.",
            previous.name
        ));
    }

    let code = generate_access_code();
    let blob = CipherBlob::seal(&keypair.secret_key_bytes()[..], &code)?;
    registry.set_access_code(name, blob)?;

    println!();
    print_success("Access code generated");
    println!("  {}", code.as_str());
    println!();
    println!("Unlock '{}' with it using --access-code.", name);

    Ok(())
}
