//! Account Client
//!
//! Read queries against an account and the forge/sign/validate/inject
//! pipeline behind transfers, originations and faucet claims.

use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::amount::{parse_integer, to_minor};
use crate::error::{Result, WalletError};
use crate::forge::{ForgeHeader, ForgeRequest, Operation, OperationReceipt, SignedOperation};
use crate::hash::blake2b_256;
use crate::keys::{validate_address, Keypair};
use crate::rpc::RpcGateway;

/// Amount sent to the caller by a faucet claim, in minor units.
pub const FAUCET_AMOUNT: u64 = 100_000;

const FORGE_PATH: &str = "/blocks/prevalidation/proto/helpers/forge/forge/operations";
const APPLY_PATH: &str = "/blocks/prevalidation/proto/helpers/apply_operation";
const INJECT_PATH: &str = "/inject_operation";

/// How the forge header is filled in for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeTemplate {
    /// Manager operation paid by `source` (self when `None`), fee in minor units.
    Manager { source: Option<String>, fee: u64 },

    /// Unsigned faucet claim.
    FaucetProbe,
}

/// Parameters of a transfer, amounts in display units.
#[derive(Debug, Clone, Default)]
pub struct TransferRequest {
    pub destination: String,
    pub amount: f64,
    pub fee: f64,
    /// Pay from this contract instead of the caller's own account.
    pub source: Option<String>,
    pub parameters: Option<Value>,
}

/// Parameters of an origination, amounts in display units.
#[derive(Debug, Clone, Default)]
pub struct OriginationRequest {
    pub balance: f64,
    pub fee: f64,
    pub spendable: bool,
    pub delegatable: bool,
    pub script: Option<Value>,
}

/// Client bound to one unlocked account.
#[derive(Debug, Clone)]
pub struct TzClient {
    gateway: RpcGateway,
    keypair: Keypair,
}

impl TzClient {
    pub fn new(gateway: RpcGateway, keypair: Keypair) -> Self {
        Self { gateway, keypair }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn gateway(&self) -> &RpcGateway {
        &self.gateway
    }

    /// POST an arbitrary path with an empty body.
    pub async fn call(&self, path: &str) -> Result<Value> {
        self.gateway.call(path, &json!({})).await
    }

    /// Hash of the block new operations are anchored to.
    pub async fn predecessor(&self) -> Result<String> {
        let reply = self.call("/blocks/prevalidation/predecessor").await?;
        string_field(&reply, "predecessor")
    }

    pub async fn prevalidation(&self) -> Result<Value> {
        self.call("/blocks/prevalidation").await
    }

    pub async fn head(&self) -> Result<Value> {
        self.call("/blocks/head").await
    }

    /// Balance in minor units of `contract`, or of the caller when `None`.
    pub async fn balance(&self, contract: Option<&str>) -> Result<u64> {
        let reply = self.call(&self.contract_path(contract, "balance")).await?;
        field(&reply, "balance").and_then(|v| parse_integer(v, "balance"))
    }

    /// Current counter of `contract`, or of the caller when `None`.
    pub async fn counter(&self, contract: Option<&str>) -> Result<u64> {
        let reply = self.call(&self.contract_path(contract, "counter")).await?;
        field(&reply, "counter").and_then(|v| parse_integer(v, "counter"))
    }

    /// Script of an originated contract.
    pub async fn script(&self, contract: &str) -> Result<Value> {
        self.call(&self.contract_path(Some(contract), "script")).await
    }

    /// Reveal the caller's key and transfer funds.
    pub async fn transfer(&self, request: TransferRequest) -> Result<OperationReceipt> {
        let amount = to_minor(request.amount)?;
        let fee = to_minor(request.fee)?;
        self.transfer_minor(
            &request.destination,
            amount,
            fee,
            request.source,
            request.parameters,
        )
        .await
    }

    /// Originate a new contract managed by the caller.
    pub async fn originate(&self, request: OriginationRequest) -> Result<OperationReceipt> {
        let operations = vec![Operation::Origination {
            manager_pubkey: self.keypair.public_key_hash().to_string(),
            balance: to_minor(request.balance)?,
            spendable: request.spendable,
            delegatable: request.delegatable,
            script: request.script,
        }];
        let template = ForgeTemplate::Manager {
            source: None,
            fee: to_minor(request.fee)?,
        };
        self.submit(operations, template, true).await
    }

    /// Claim test funds: an unsigned faucet probe creates a funded contract,
    /// then [`FAUCET_AMOUNT`] is transferred from it to the caller.
    pub async fn faucet(&self) -> Result<OperationReceipt> {
        let operations = vec![Operation::Faucet {
            id: self.keypair.public_key_hash().to_string(),
            nonce: faucet_nonce(),
        }];
        let probe = self
            .submit(operations, ForgeTemplate::FaucetProbe, false)
            .await?;

        let funding = probe.contracts.first().cloned().ok_or_else(|| {
            WalletError::MalformedResponse("faucet claim created no contract".to_string())
        })?;
        debug!("Faucet funded contract {}", funding);

        let destination = self.keypair.public_key_hash().to_string();
        self.transfer_minor(&destination, FAUCET_AMOUNT, 0, Some(funding), None)
            .await
    }

    /// Forge, sign, validate and inject `operations`.
    pub async fn submit(
        &self,
        operations: Vec<Operation>,
        template: ForgeTemplate,
        require_signature: bool,
    ) -> Result<OperationReceipt> {
        let result = self
            .run_pipeline(operations, template, require_signature)
            .await;
        if let Err(e) = &result {
            warn!("Operation pipeline aborted: {}", e);
        }
        result
    }

    async fn transfer_minor(
        &self,
        destination: &str,
        amount: u64,
        fee: u64,
        source: Option<String>,
        parameters: Option<Value>,
    ) -> Result<OperationReceipt> {
        validate_address(destination)?;
        if let Some(source) = &source {
            validate_address(source)?;
        }

        let operations = vec![
            Operation::Reveal {
                public_key: self.keypair.public_key().to_string(),
            },
            Operation::Transaction {
                amount,
                destination: destination.to_string(),
                parameters,
            },
        ];
        self.submit(operations, ForgeTemplate::Manager { source, fee }, true)
            .await
    }

    async fn run_pipeline(
        &self,
        operations: Vec<Operation>,
        template: ForgeTemplate,
        require_signature: bool,
    ) -> Result<OperationReceipt> {
        let (branch, header) = match template {
            ForgeTemplate::Manager { source, fee } => {
                let (branch, counter) =
                    tokio::try_join!(self.predecessor(), self.counter(source.as_deref()))?;
                let counter = counter.checked_add(1).ok_or_else(|| {
                    WalletError::MalformedResponse("counter overflow".to_string())
                })?;
                let source =
                    source.unwrap_or_else(|| self.keypair.public_key_hash().to_string());
                (
                    branch,
                    ForgeHeader::Manager {
                        source,
                        fee,
                        counter,
                    },
                )
            }
            ForgeTemplate::FaucetProbe => (self.predecessor().await?, ForgeHeader::FaucetProbe),
        };
        debug!("Forging {} operation(s) on branch {}", operations.len(), branch);

        let request = ForgeRequest {
            branch,
            header,
            operations,
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| WalletError::MalformedResponse(e.to_string()))?;
        let forged = self.gateway.call(FORGE_PATH, &body).await?;
        let forged_hex = string_field(&forged, "operation")?;

        let signed = if require_signature {
            SignedOperation::sign(&forged_hex, &self.keypair)?
        } else {
            SignedOperation::unsigned(&forged_hex)?
        };
        debug!("Validating operation {}", signed.operation_hash);

        let mut apply_body = json!({
            "pred_block": &request.branch,
            "operation_hash": &signed.operation_hash,
            "forged_operation": &signed.forged_hex,
        });
        if let Some(signature) = &signed.signature {
            apply_body["signature"] = json!(signature);
        }
        let applied = self.gateway.call(APPLY_PATH, &apply_body).await?;
        let contracts = contracts_field(&applied)?;

        let injected = self
            .gateway
            .call(
                INJECT_PATH,
                &json!({ "signedOperationContents": &signed.contents_hex }),
            )
            .await?;
        let injected_operation = string_field(&injected, "injectedOperation")?;
        info!("Injected operation {}", injected_operation);

        Ok(OperationReceipt {
            contracts,
            operation_hash: signed.operation_hash,
            injected_operation,
        })
    }

    fn contract_path(&self, contract: Option<&str>, leaf: &str) -> String {
        let id = contract.unwrap_or_else(|| self.keypair.public_key_hash());
        format!("/blocks/prevalidation/proto/context/contracts/{}/{}", id, leaf)
    }
}

/// Fresh nonce for a faucet claim: hex of BLAKE2b over the time and randomness.
fn faucet_nonce() -> String {
    let entropy = format!("{}{}", chrono::Utc::now(), rand::thread_rng().gen::<f64>());
    hex::encode(blake2b_256(entropy.as_bytes()))
}

fn field<'a>(reply: &'a Value, name: &str) -> Result<&'a Value> {
    reply
        .get(name)
        .ok_or_else(|| WalletError::MalformedResponse(format!("missing field `{}`", name)))
}

fn string_field(reply: &Value, name: &str) -> Result<String> {
    field(reply, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| WalletError::MalformedResponse(format!("field `{}` is not a string", name)))
}

fn contracts_field(reply: &Value) -> Result<Vec<String>> {
    match reply.get("contracts") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    WalletError::MalformedResponse("contract id is not a string".to_string())
                })
            })
            .collect(),
        Some(other) => Err(WalletError::MalformedResponse(format!(
            "field `contracts` is not a list: {}",
            other
        ))),
    }
}
