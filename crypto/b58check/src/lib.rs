//! Prefixed Base58Check Encoding
//!
//! Account identities, keys, signatures and operation hashes travel as
//! base-58 text carrying a class prefix and a 4-byte integrity checksum:
//!
//! ```text
//! base58( prefix || payload || sha256(sha256(prefix || payload))[..4] )
//! ```
//!
//! Two decoding modes are provided:
//!
//! - [`decode`] verifies the checksum and strips `prefix.len()` bytes from the
//!   front without comparing them. Decoding with the wrong class silently
//!   yields the wrong bytes.
//! - [`decode_checked`] additionally requires the prefix bytes and the payload
//!   length to match the class. Use it wherever the class is known.
//!
//! # Example
//!
//! ```rust
//! use tz_crypto_b58check::{decode_checked, encode, Prefix};
//!
//! let encoded = encode(Prefix::Identity, &[0u8; 20]);
//! assert!(encoded.starts_with("tz1"));
//! assert_eq!(decode_checked(Prefix::Identity, &encoded).unwrap(), vec![0u8; 20]);
//! ```

mod error;
mod prefix;

pub use error::{B58Error, B58Result};
pub use prefix::Prefix;

use sha2::{Digest, Sha256};

/// Number of checksum bytes appended before encoding.
pub const CHECKSUM_LEN: usize = 4;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encode raw bytes with a trailing checksum.
pub fn check_encode(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&checksum(data));
    bs58::encode(buf).into_string()
}

/// Decode a checksummed string back to raw bytes (prefix included).
pub fn check_decode(s: &str) -> B58Result<Vec<u8>> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| B58Error::MalformedInput(e.to_string()))?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(B58Error::MalformedInput(
            "data too short for checksum".to_string(),
        ));
    }
    let (data, sum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if sum != checksum(data) {
        return Err(B58Error::ChecksumMismatch);
    }
    Ok(data.to_vec())
}

/// Encode `payload` under the class `prefix`.
pub fn encode(prefix: Prefix, payload: &[u8]) -> String {
    encode_with_prefix(prefix.bytes(), payload)
}

/// Encode `payload` under arbitrary prefix bytes.
pub fn encode_with_prefix(prefix: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len());
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    check_encode(&data)
}

/// Decode `s`, verify its checksum and strip the length of `prefix`.
///
/// The prefix bytes themselves are not compared.
pub fn decode(prefix: Prefix, s: &str) -> B58Result<Vec<u8>> {
    decode_with_prefix(prefix.bytes(), s)
}

/// Lenient decoding under arbitrary prefix bytes.
pub fn decode_with_prefix(prefix: &[u8], s: &str) -> B58Result<Vec<u8>> {
    let data = check_decode(s)?;
    if data.len() < prefix.len() {
        return Err(B58Error::MalformedInput(format!(
            "decoded {} bytes, shorter than the {}-byte prefix",
            data.len(),
            prefix.len()
        )));
    }
    Ok(data[prefix.len()..].to_vec())
}

/// Decode `s`, requiring both the prefix bytes and the payload length of
/// `prefix`'s class.
pub fn decode_checked(prefix: Prefix, s: &str) -> B58Result<Vec<u8>> {
    let data = check_decode(s)?;
    let head = prefix.bytes();
    if !data.starts_with(head) {
        let found = data[..head.len().min(data.len())].to_vec();
        return Err(B58Error::PrefixMismatch {
            expected: prefix.name(),
            found,
        });
    }
    let payload = &data[head.len()..];
    if payload.len() != prefix.payload_len() {
        return Err(B58Error::InvalidLength {
            class: prefix.name(),
            expected: prefix.payload_len(),
            actual: payload.len(),
        });
    }
    Ok(payload.to_vec())
}

/// Decode `s` into a fixed-size payload of `prefix`'s class.
pub fn decode_array<const N: usize>(prefix: Prefix, s: &str) -> B58Result<[u8; N]> {
    let payload = decode_checked(prefix, s)?;
    payload.try_into().map_err(|bytes: Vec<u8>| B58Error::InvalidLength {
        class: prefix.name(),
        expected: N,
        actual: bytes.len(),
    })
}
