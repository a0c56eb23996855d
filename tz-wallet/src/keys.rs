//! Key Management
//!
//! Derives ed25519 account keys from a 32-byte seed, from a BIP39 mnemonic
//! plus passphrase, or from an encoded secret key, and renders the three
//! checksum-encoded strings an account is known by:
//!
//! - `public_key_hash`: 20-byte BLAKE2b of the public key (`tz1...`)
//! - `public_key`: the 32-byte public key (`edpk...`)
//! - `secret_key`: seed followed by public key, 64 bytes (`edsk...`)
//!
//! Security: the seed is held in a `Zeroizing` buffer and the signing key is
//! only rebuilt for the duration of a single `sign` call.

use bip39::{Language, Mnemonic, MnemonicType, Seed};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use tz_crypto_b58check::{check_decode, decode_array, decode_checked, encode, Prefix};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::hash::blake2b_160;

/// Length of an ed25519 seed.
pub const SEED_LEN: usize = 32;

/// Length of an ed25519 secret key (seed || public key).
pub const SECRET_KEY_LEN: usize = 64;

/// Number of words in a generated mnemonic phrase.
pub const MNEMONIC_WORDS: usize = 15;

/// An unlocked account keypair.
#[derive(Clone)]
pub struct Keypair {
    seed: Zeroizing<[u8; SEED_LEN]>,
    public_key: [u8; 32],
    public_key_hash: String,
    encoded_public_key: String,
    encoded_secret_key: Zeroizing<String>,
}

impl Keypair {
    /// Derive a keypair from raw seed bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed: [u8; SEED_LEN] = seed
            .try_into()
            .map_err(|_| WalletError::InvalidSeedLength(seed.len()))?;
        let seed = Zeroizing::new(seed);

        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = signing_key.verifying_key().to_bytes();
        let secret_key = Zeroizing::new(signing_key.to_keypair_bytes());

        Ok(Self {
            public_key_hash: encode(Prefix::Identity, &blake2b_160(&public_key)),
            encoded_public_key: encode(Prefix::PublicKey, &public_key),
            encoded_secret_key: Zeroizing::new(encode(Prefix::SecretKey, &secret_key[..])),
            seed,
            public_key,
        })
    }

    /// Derive a keypair from a checksum-encoded seed (`edsk...`, 54 chars).
    pub fn from_seed_str(seed: &str) -> Result<Self> {
        let seed = Zeroizing::new(decode_checked(Prefix::Seed, seed)?);
        Self::from_seed(&seed)
    }

    /// Rebuild a keypair from a 64-byte secret key.
    ///
    /// The trailing public key must match the one derived from the seed half.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self> {
        if secret_key.len() != SECRET_KEY_LEN {
            return Err(WalletError::InvalidSecretKey(format!(
                "expected {} bytes, got {}",
                SECRET_KEY_LEN,
                secret_key.len()
            )));
        }
        let (seed, embedded_public) = secret_key.split_at(SEED_LEN);
        let keypair = Self::from_seed(seed)?;
        if keypair.public_key[..] != *embedded_public {
            return Err(WalletError::InvalidSecretKey(
                "embedded public key does not match seed".to_string(),
            ));
        }
        Ok(keypair)
    }

    /// Rebuild a keypair from either an encoded seed or an encoded secret key.
    pub fn from_encoded_secret(s: &str) -> Result<Self> {
        let raw = Zeroizing::new(check_decode(s.trim())?);
        match Prefix::detect(&raw) {
            Some(Prefix::Seed) => Self::from_seed(&raw[Prefix::Seed.bytes().len()..]),
            Some(Prefix::SecretKey) => {
                Self::from_secret_key(&raw[Prefix::SecretKey.bytes().len()..])
            }
            _ => Err(WalletError::InvalidSecretKey(
                "expected an encoded seed or secret key".to_string(),
            )),
        }
    }

    /// Derive a keypair from a mnemonic phrase and passphrase.
    ///
    /// The first 32 bytes of the BIP39 seed are used as the ed25519 seed.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::from_phrase(phrase.trim(), Language::English)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        let seed = Seed::new(&mnemonic, passphrase);
        Self::from_seed(&seed.as_bytes()[..SEED_LEN])
    }

    /// The account address (`tz1...`).
    pub fn public_key_hash(&self) -> &str {
        &self.public_key_hash
    }

    /// The encoded public key (`edpk...`).
    pub fn public_key(&self) -> &str {
        &self.encoded_public_key
    }

    /// The encoded secret key (`edsk...`).
    pub fn secret_key(&self) -> &str {
        &self.encoded_secret_key
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key
    }

    /// Raw 64-byte secret key (seed || public key).
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(SigningKey::from_bytes(&self.seed).to_keypair_bytes())
    }

    /// Produce a detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signing_key = SigningKey::from_bytes(&self.seed);
        signing_key.sign(message).to_bytes()
    }

    /// Produce a detached signature, checksum-encoded (`edsig...`).
    pub fn sign_encoded(&self, message: &[u8]) -> String {
        encode(Prefix::Signature, &self.sign(message))
    }

    /// Check a detached signature made by this keypair.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        verify_signature(&self.public_key, message, signature)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key_hash", &self.public_key_hash)
            .field("public_key", &self.encoded_public_key)
            .finish_non_exhaustive()
    }
}

/// Generate a new random mnemonic phrase.
pub fn generate_mnemonic() -> Zeroizing<String> {
    let mnemonic = Mnemonic::new(MnemonicType::Words15, Language::English);
    Zeroizing::new(mnemonic.phrase().to_string())
}

/// Validate a mnemonic phrase without deriving keys.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::validate(phrase.trim(), Language::English)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

/// Identity hash (`tz1...`) of an encoded public key.
pub fn public_key_hash_of(public_key: &str) -> Result<String> {
    let public_key: [u8; 32] = decode_array(Prefix::PublicKey, public_key)?;
    Ok(encode(Prefix::Identity, &blake2b_160(&public_key)))
}

/// Check a detached ed25519 signature against a raw public key.
pub fn verify_signature(public_key: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .is_ok()
}

/// Check that `address` is a well-formed implicit account or contract address.
pub fn validate_address(address: &str) -> Result<()> {
    decode_checked(Prefix::Identity, address)
        .or_else(|_| decode_checked(Prefix::Contract, address))?;
    Ok(())
}
