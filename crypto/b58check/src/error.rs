//! Error types for prefixed Base58Check decoding.

use displaydoc::Display;
use thiserror::Error;

/// Errors that can occur while decoding a checksum-encoded string.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum B58Error {
    /// Malformed base58 input: {0}
    MalformedInput(String),

    /// Checksum mismatch
    ChecksumMismatch,

    /// Expected prefix for {expected}, found bytes {found:?}
    PrefixMismatch {
        /// Name of the class the caller asked for
        expected: &'static str,
        /// Leading bytes actually present in the decoded string
        found: Vec<u8>,
    },

    /// Invalid payload length for {class}: expected {expected} bytes, got {actual}
    InvalidLength {
        /// Name of the class the caller asked for
        class: &'static str,
        /// Fixed payload length of the class
        expected: usize,
        /// Length actually decoded
        actual: usize,
    },
}

/// Result type for codec operations.
pub type B58Result<T> = Result<T, B58Error>;
