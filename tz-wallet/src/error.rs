//! Error types for the wallet library.

use displaydoc::Display;
use thiserror::Error;
use tz_crypto_b58check::B58Error;

/// Errors surfaced by wallet operations.
///
/// Encoding and cryptographic failures are returned directly by the
/// synchronous calls that hit them; network and node failures come back from
/// the `async` pipeline. Nothing here is retried automatically.
#[derive(Debug, Display, Error)]
pub enum WalletError {
    /// Decode error: {0}
    Decode(#[from] B58Error),

    /// Password incorrect
    WrongPassword,

    /// Invalid seed length: expected 32 bytes, got {0}
    InvalidSeedLength(usize),

    /// Invalid mnemonic: {0}
    InvalidMnemonic(String),

    /// Invalid secret key: {0}
    InvalidSecretKey(String),

    /// Invalid amount: {0}
    InvalidAmount(String),

    /// Network error: {0}
    Network(String),

    /// Node rejected the operation: {0}
    RemoteValidation(String),

    /// Forge context is stale: {0}
    StaleContext(String),

    /// Malformed node response: {0}
    MalformedResponse(String),

    /// Wallet is locked
    Locked,

    /// Unsupported cipher blob version: {0}
    UnsupportedBlobVersion(u32),

    /// Cryptographic failure: {0}
    Crypto(String),

    /// Account error: {0}
    Account(String),

    /// Storage error: {0}
    Storage(String),

    /// Configuration error: {0}
    Config(String),
}

impl WalletError {
    /// True for failures reported by the remote node rather than locally.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            WalletError::RemoteValidation(_) | WalletError::StaleContext(_)
        )
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::Storage(err.to_string())
    }
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;
