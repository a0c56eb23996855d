//! Generic (BLAKE2b) hashing used for identities and operation hashes.

use blake2::{
    digest::consts::{U20, U32},
    Blake2b, Digest,
};

/// 20-byte BLAKE2b digest, the identity hash of a public key.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    Blake2b::<U20>::digest(data).into()
}

/// 32-byte BLAKE2b digest, the operation content hash.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b::<U32>::digest(data).into()
}
