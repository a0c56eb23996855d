//! Thin Wallet Client
//!
//! Manages account keys locally and drives a remote node through its JSON
//! RPC to forge, validate and inject operations.
//!
//! ## Security Model
//!
//! - Secret keys never leave the wallet; forging is remote, signing is local
//! - Keys at rest are sealed with Argon2id + ChaCha20-Poly1305
//! - Key material is only held while a [`Session`] is unlocked
//!
//! ## Example
//!
//! ```rust,no_run
//! use tz_wallet::{ClientConfig, Keypair, TransferRequest, TzClient};
//!
//! # async fn run() -> tz_wallet::Result<()> {
//! let config = ClientConfig::default();
//! let keypair = Keypair::from_seed_str("edsk3iQYm63d83jdgNpciMAKW1tgUyr2uJDJESAwbADhg8LTdumoF9")?;
//! let client = TzClient::new(config.gateway()?, keypair);
//!
//! let receipt = client
//!     .transfer(TransferRequest {
//!         destination: "tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU".to_string(),
//!         amount: 13.001001,
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("injected {}", receipt.injected_operation);
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod client;
pub mod config;
pub mod error;
pub mod forge;
pub mod hash;
pub mod keys;
pub mod registry;
pub mod rpc;
pub mod session;
pub mod storage;

pub use client::{ForgeTemplate, OriginationRequest, TransferRequest, TzClient, FAUCET_AMOUNT};
pub use config::ClientConfig;
pub use error::{Result, WalletError};
pub use forge::{ForgeHeader, ForgeRequest, Operation, OperationReceipt, SignedOperation};
pub use keys::Keypair;
pub use registry::{AccountRecord, AccountRegistry, JsonFileStore, KeyValueStore, MemoryStore};
pub use rpc::{HttpTransport, Network, RpcGateway, RpcResponse, RpcTransport};
pub use session::{Session, SessionState};
pub use storage::{generate_access_code, CipherBlob};
