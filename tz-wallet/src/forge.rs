//! Operation Forging
//!
//! Typed operation contents, the forge request sent to the node, and the
//! local half of the pipeline: signing the forged bytes and hashing the
//! result into an operation hash.
//!
//! ```text
//! signed = forged_hex || hex(ed25519_sign(forged_bytes))
//! operation_hash = b58check(o, blake2b_256(signed))
//! ```

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use tz_crypto_b58check::{encode, Prefix};

use crate::amount::serialize_minor;
use crate::error::{Result, WalletError};
use crate::hash::blake2b_256;
use crate::keys::Keypair;

/// A single operation content, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    /// Disclose the source's public key.
    Reveal { public_key: String },

    /// Move `amount` minor units to `destination`.
    Transaction {
        #[serde(serialize_with = "serialize_minor")]
        amount: u64,
        destination: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<Value>,
    },

    /// Create a new contract managed by `manager_pubkey`.
    Origination {
        #[serde(rename = "managerPubkey")]
        manager_pubkey: String,
        #[serde(serialize_with = "serialize_minor")]
        balance: u64,
        spendable: bool,
        delegatable: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        script: Option<Value>,
    },

    /// Claim test funds for `id`.
    Faucet { id: String, nonce: String },
}

/// Header fields placed alongside the operations in a forge request.
///
/// `fee` goes on the wire as a decimal string, `counter` as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeHeader {
    /// Regular manager operation, paid for by `source`.
    Manager {
        source: String,
        fee: u64,
        counter: u64,
    },

    /// Faucet claim: no source, fee or counter.
    FaucetProbe,
}

/// Body of a `forge/operations` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgeRequest {
    pub branch: String,
    pub header: ForgeHeader,
    pub operations: Vec<Operation>,
}

impl Serialize for ForgeRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("branch", &self.branch)?;
        if let ForgeHeader::Manager {
            source,
            fee,
            counter,
        } = &self.header
        {
            map.serialize_entry("kind", "manager")?;
            map.serialize_entry("source", source)?;
            map.serialize_entry("fee", &fee.to_string())?;
            map.serialize_entry("counter", counter)?;
        }
        map.serialize_entry("operations", &self.operations)?;
        map.end()
    }
}

/// Forged bytes ready for validation and injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOperation {
    /// Hex of the bytes returned by the forge call.
    pub forged_hex: String,

    /// Checksum-encoded signature, absent for unsigned flows.
    pub signature: Option<String>,

    /// Hex submitted for injection: forged bytes plus signature, if any.
    pub contents_hex: String,

    /// Checksum-encoded hash of `contents_hex`.
    pub operation_hash: String,
}

impl SignedOperation {
    /// Sign forged bytes with `keypair`.
    pub fn sign(forged_hex: &str, keypair: &Keypair) -> Result<Self> {
        let forged = decode_forged(forged_hex)?;
        let signature = keypair.sign(&forged);

        let mut contents = forged;
        contents.extend_from_slice(&signature);

        Ok(Self {
            forged_hex: forged_hex.to_string(),
            signature: Some(encode(Prefix::Signature, &signature)),
            contents_hex: hex::encode(&contents),
            operation_hash: operation_hash(&contents),
        })
    }

    /// Wrap forged bytes without a signature.
    pub fn unsigned(forged_hex: &str) -> Result<Self> {
        let forged = decode_forged(forged_hex)?;
        Ok(Self {
            forged_hex: forged_hex.to_string(),
            signature: None,
            contents_hex: hex::encode(&forged),
            operation_hash: operation_hash(&forged),
        })
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReceipt {
    /// Contracts created by the operation, as reported by validation.
    pub contracts: Vec<String>,

    /// Locally computed operation hash.
    pub operation_hash: String,

    /// Identifier the node returned on injection.
    pub injected_operation: String,
}

/// Checksum-encoded operation hash of raw operation bytes.
pub fn operation_hash(contents: &[u8]) -> String {
    encode(Prefix::Operation, &blake2b_256(contents))
}

fn decode_forged(forged_hex: &str) -> Result<Vec<u8>> {
    hex::decode(forged_hex)
        .map_err(|e| WalletError::MalformedResponse(format!("forged operation is not hex: {}", e)))
}
