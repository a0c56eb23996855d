//! Encrypted Key Storage
//!
//! Seals secret key bytes under a password (or access code) using:
//! - Argon2id for password-based key derivation
//! - ChaCha20-Poly1305 for authenticated encryption
//!
//! The resulting [`CipherBlob`] carries everything needed to open it again
//! except the password. Opening with any other password fails with
//! [`WalletError::WrongPassword`]; it never yields garbage.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};

/// Current cipher blob format version
pub const BLOB_VERSION: u32 = 1;

/// Argon2 parameters, fixed for blob version 1
const ARGON2_MEMORY_KB: u32 = 65536; // 64 MB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 4;

const NONCE_LEN: usize = 12;
const ACCESS_CODE_BYTES: usize = 12;

/// Password-encrypted secret key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherBlob {
    /// Format version
    version: u32,

    /// Argon2 salt (base64, PHC string encoding)
    salt: String,

    /// ChaCha20-Poly1305 nonce (12 bytes, hex encoded)
    nonce: String,

    /// Encrypted secret key (hex encoded)
    ciphertext: String,
}

impl CipherBlob {
    /// Encrypt `secret` under `password`.
    pub fn seal(secret: &[u8], password: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let key = derive_key(password, salt.as_str())?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
            .map_err(|_| WalletError::Crypto("failed to create cipher".to_string()))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), secret)
            .map_err(|_| WalletError::Crypto("encryption failed".to_string()))?;

        Ok(Self {
            version: BLOB_VERSION,
            salt: salt.to_string(),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Decrypt the blob, returning the original secret bytes.
    pub fn open(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        if self.version != BLOB_VERSION {
            return Err(WalletError::UnsupportedBlobVersion(self.version));
        }

        // A damaged salt, nonce or ciphertext is indistinguishable from a
        // wrong password to the caller.
        let key = derive_key(password, &self.salt).map_err(|_| WalletError::WrongPassword)?;
        let nonce_bytes = hex::decode(&self.nonce).map_err(|_| WalletError::WrongPassword)?;
        let ciphertext = hex::decode(&self.ciphertext).map_err(|_| WalletError::WrongPassword)?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(WalletError::WrongPassword);
        }

        let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
            .map_err(|_| WalletError::Crypto("failed to create cipher".to_string()))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| WalletError::WrongPassword)?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Re-encrypt the blob under a new password.
    pub fn reseal(&self, old_password: &str, new_password: &str) -> Result<Self> {
        let secret = self.open(old_password)?;
        Self::seal(&secret, new_password)
    }

    /// Format version of this blob.
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// Generate a random access code, usable in place of a password.
pub fn generate_access_code() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; ACCESS_CODE_BYTES]);
    rand::thread_rng().fill(&mut bytes[..]);
    Zeroizing::new(STANDARD.encode(&bytes[..]))
}

/// Derive a 32-byte encryption key from password using Argon2id
fn derive_key(password: &str, salt: &str) -> Result<Zeroizing<[u8; 32]>> {
    let salt = SaltString::from_b64(salt)
        .map_err(|_| WalletError::Crypto("invalid salt format".to_string()))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(
            ARGON2_MEMORY_KB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(32),
        )
        .map_err(|_| WalletError::Crypto("invalid Argon2 parameters".to_string()))?,
    );

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| WalletError::Crypto("key derivation failed".to_string()))?;
    let output = hash
        .hash
        .ok_or_else(|| WalletError::Crypto("no hash output".to_string()))?;

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&output.as_bytes()[..32]);
    Ok(key)
}
