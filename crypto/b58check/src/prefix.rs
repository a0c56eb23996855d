//! Prefix table for the checksum-encoded classes.
//!
//! Every class carries a fixed byte prefix chosen so that the encoded text
//! starts with a recognisable head (`tz1`, `edpk`, `edsk`, ...) and a fixed
//! payload length.

/// A checksum-encoded class of value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// 20-byte hash of an ed25519 public key (`tz1...`).
    Identity,
    /// 32-byte ed25519 public key (`edpk...`).
    PublicKey,
    /// 64-byte ed25519 secret key, seed followed by public key (`edsk...`, 98 chars).
    SecretKey,
    /// 32-byte ed25519 seed (`edsk...`, 54 chars).
    Seed,
    /// 64-byte detached ed25519 signature (`edsig...`).
    Signature,
    /// 32-byte operation content hash (`o...`).
    Operation,
    /// 20-byte originated contract hash (`KT1...`).
    Contract,
}

impl Prefix {
    /// All classes, in table order.
    pub const ALL: [Prefix; 7] = [
        Prefix::Identity,
        Prefix::PublicKey,
        Prefix::SecretKey,
        Prefix::Seed,
        Prefix::Signature,
        Prefix::Operation,
        Prefix::Contract,
    ];

    /// The prefix bytes prepended before checksumming.
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Prefix::Identity => &[6, 161, 159],
            Prefix::PublicKey => &[13, 15, 37, 217],
            Prefix::SecretKey => &[43, 246, 78, 7],
            Prefix::Seed => &[13, 15, 58, 7],
            Prefix::Signature => &[9, 245, 205, 134, 18],
            Prefix::Operation => &[5, 116],
            Prefix::Contract => &[2, 90, 121],
        }
    }

    /// Fixed payload length of the class.
    pub const fn payload_len(self) -> usize {
        match self {
            Prefix::Identity | Prefix::Contract => 20,
            Prefix::PublicKey | Prefix::Seed | Prefix::Operation => 32,
            Prefix::SecretKey | Prefix::Signature => 64,
        }
    }

    /// Human-readable class name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Prefix::Identity => "identity",
            Prefix::PublicKey => "public key",
            Prefix::SecretKey => "secret key",
            Prefix::Seed => "seed",
            Prefix::Signature => "signature",
            Prefix::Operation => "operation hash",
            Prefix::Contract => "contract",
        }
    }

    /// Identify the class of an encoded string from its decoded bytes.
    ///
    /// Both the prefix and the payload length must match, which is what
    /// separates a seed from a secret key.
    pub fn detect(raw: &[u8]) -> Option<Prefix> {
        Self::ALL.into_iter().find(|prefix| {
            let head = prefix.bytes();
            raw.len() == head.len() + prefix.payload_len() && raw.starts_with(head)
        })
    }
}
