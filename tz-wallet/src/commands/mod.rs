//! CLI Commands
//!
//! Each subcommand opens the account store, unlocks an account if it needs
//! one and calls into the library.

pub mod access_code;
pub mod accounts;
pub mod balance;
pub mod faucet;
pub mod generate;
pub mod import;
pub mod originate;
pub mod show;
pub mod transfer;

use anyhow::{anyhow, Result};
use std::io::{self, Write};
use tz_wallet::{
    AccountRegistry, ClientConfig, JsonFileStore, OperationReceipt, Session, WalletError,
};
use zeroize::Zeroizing;

/// Which sealed blob an unlock reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    /// The named account, with its password
    Password,
    /// The access-code blob, with the access code
    AccessCode,
}

/// Open the configured account store.
pub fn open_registry(config: &ClientConfig) -> Result<AccountRegistry<JsonFileStore>> {
    let store = JsonFileStore::open(&config.store_path)?;
    Ok(AccountRegistry::open(store)?)
}

/// Unlock `name` (or the access-code blob) into a fresh session.
pub fn unlock_session(
    registry: &AccountRegistry<JsonFileStore>,
    name: &str,
    unlock: Unlock,
) -> Result<Session> {
    let (blob, prompt) = match unlock {
        Unlock::Password => (registry.account(name)?.cipherdata, "Enter account password: "),
        Unlock::AccessCode => (registry.access_code_blob(name)?, "Enter access code: "),
    };

    let secret = prompt_password(prompt)?;
    let mut session = Session::new();
    match session.unlock(&blob, &secret) {
        Ok(_) => Ok(session),
        Err(WalletError::WrongPassword) => Err(anyhow!("Password incorrect")),
        Err(e) => Err(e.into()),
    }
}

/// Prompt for password input (hidden)
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let password = rpassword::read_password()?;
    Ok(Zeroizing::new(password))
}

/// Prompt for a new password twice
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    let password = prompt_password("Enter new password: ")?;
    if password.is_empty() {
        return Err(anyhow!("Please input your password"));
    }

    let confirm = prompt_password("Confirm password: ")?;
    if *password != *confirm {
        return Err(anyhow!("The two passwords are not equal"));
    }

    Ok(password)
}

/// Prompt for confirmation
pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("\x1b[33mWarning:\x1b[0m {}", message);
}

/// Print the outcome of an injected operation
pub fn print_receipt(receipt: &OperationReceipt) {
    println!("Operation hash: {}", receipt.operation_hash);
    println!("Injected:       {}", receipt.injected_operation);
    for contract in &receipt.contracts {
        println!("Contract:       {}", contract);
    }
}
