//! Integration tests for tz-wallet
//!
//! These tests drive the operation pipeline against a scripted in-process
//! node and cover:
//! - Forge context (branch, counter + 1, source override)
//! - Transfer, origination and faucet call sequences
//! - Signing and operation hashing of the forged bytes
//! - Balance effects of transfers, originations and faucet claims
//! - Error classification and pipeline aborts
//! - Account store, session and client working together

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tz_crypto_b58check::{encode, Prefix};
use tz_wallet::{
    AccountRegistry, CipherBlob, JsonFileStore, Keypair, MemoryStore, OriginationRequest,
    Result, RpcGateway, RpcResponse, RpcTransport, Session, TransferRequest, TzClient,
    WalletError, FAUCET_AMOUNT,
};

const HOST: &str = "http://node.test";
const SEED: &str = "edsk3iQYm63d83jdgNpciMAKW1tgUyr2uJDJESAwbADhg8LTdumoF9";
const ADDRESS: &str = "tz1av74dAvq66ndhjCgSmp6RVA4qynAKpYeV";
const PUBLIC_KEY: &str = "edpkuV21jf5NJidZrQXaHs1yQjtqrR1j6WaPJ6iw5nSxoTQHznzzZh";
const TEST_PASSWORD: &str = "secure-test-password-123!";

// Forged bytes and the matching signature under SEED
const FORGED: &str = "deadbeef";
const SIGNATURE_HEX: &str = "992a0c6f380e8f8d42dbddb5b1a1e38863252ec35fc41fbf724144926948870d042a335a96991a9fcda4934eb404b20721e0ab25e8610f0cfea231afbbf04c0d";
const SIGNATURE: &str = "edsigtsqyqPXgTYU1xp5zDB272pcLZSGeviG4TNwKjmXmRTQPWEkB1AGCej6kNqZSwTajh15wG4isHVDm9UuC2cbGeCKWeWgjPA";
const SIGNED_HASH: &str = "ongP4EefE6JtHjmGAR673YLpLEqLjzNSx46mZaXFUem7J8SSty5";
const UNSIGNED_HASH: &str = "opVdeGyRvpkoc9BW74RbQ7C5Hsqyx6GvexPw9x9SqqXW6veM8mS";

const BRANCH: &str = "BLockBranch";
const INJECTED: &str = "ooInjected";

const PREDECESSOR_PATH: &str = "/blocks/prevalidation/predecessor";
const FORGE_PATH: &str = "/blocks/prevalidation/proto/helpers/forge/forge/operations";
const APPLY_PATH: &str = "/blocks/prevalidation/proto/helpers/apply_operation";
const INJECT_PATH: &str = "/inject_operation";

fn contract_path(id: &str, leaf: &str) -> String {
    format!("/blocks/prevalidation/proto/context/contracts/{}/{}", id, leaf)
}

fn contract_address(byte: u8) -> String {
    encode(Prefix::Contract, &[byte; 20])
}

// ============================================================================
// Scripted Node
// ============================================================================

/// Answers each path with a fixed reply and records every request.
#[derive(Default)]
struct ScriptedNode {
    replies: Mutex<HashMap<String, std::result::Result<RpcResponse, String>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedNode {
    /// A node that accepts any well-formed pipeline run.
    fn healthy() -> Arc<Self> {
        let node = Arc::new(Self::default());
        node.reply(PREDECESSOR_PATH, json!({ "predecessor": BRANCH }));
        node.reply(&contract_path(ADDRESS, "counter"), json!({ "counter": 7 }));
        node.reply(&contract_path(ADDRESS, "balance"), json!({ "balance": "2500000" }));
        node.reply(FORGE_PATH, json!({ "operation": FORGED }));
        node.reply(APPLY_PATH, json!({ "contracts": [] }));
        node.reply(INJECT_PATH, json!({ "injectedOperation": INJECTED }));
        node
    }

    fn reply(&self, path: &str, body: Value) {
        self.respond(path, RpcResponse::ok(body.to_string()));
    }

    fn respond(&self, path: &str, response: RpcResponse) {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(response));
    }

    fn fail(&self, path: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(message.to_string()));
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|(path, _)| path).collect()
    }

    fn bodies(&self, path: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body)
            .collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedNode {
    async fn post(&self, url: &str, body: &Value) -> Result<RpcResponse> {
        let path = url.strip_prefix(HOST).unwrap_or(url).to_string();
        self.calls.lock().unwrap().push((path.clone(), body.clone()));

        match self.replies.lock().unwrap().get(&path) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(WalletError::Network(message.clone())),
            None => Ok(RpcResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

fn client_for(node: &Arc<ScriptedNode>) -> TzClient {
    let gateway = RpcGateway::new(HOST, node.clone());
    TzClient::new(gateway, Keypair::from_seed_str(SEED).unwrap())
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use super::*;

    #[tokio::test]
    async fn test_balance_defaults_to_own_account() {
        let node = ScriptedNode::healthy();
        let client = client_for(&node);

        assert_eq!(client.balance(None).await.unwrap(), 2_500_000);
        assert_eq!(node.paths(), vec![contract_path(ADDRESS, "balance")]);
        assert_eq!(node.calls()[0].1, json!({}));
    }

    #[tokio::test]
    async fn test_balance_of_other_contract_as_number() {
        let node = ScriptedNode::healthy();
        let other = contract_address(4);
        node.reply(&contract_path(&other, "balance"), json!({ "balance": 42 }));

        let client = client_for(&node);
        assert_eq!(client.balance(Some(&other)).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_counter_as_string() {
        let node = ScriptedNode::healthy();
        node.reply(&contract_path(ADDRESS, "counter"), json!({ "counter": "12" }));

        assert_eq!(client_for(&node).counter(None).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_block_reads() {
        let node = ScriptedNode::healthy();
        node.reply("/blocks/head", json!({ "hash": "BLhead" }));
        node.reply("/blocks/prevalidation", json!({ "hash": "BLpre" }));
        let contract = contract_address(1);
        node.reply(&contract_path(&contract, "script"), json!({ "code": [] }));

        let client = client_for(&node);
        assert_eq!(client.predecessor().await.unwrap(), BRANCH);
        assert_eq!(client.head().await.unwrap()["hash"], "BLhead");
        assert_eq!(client.prevalidation().await.unwrap()["hash"], "BLpre");
        assert_eq!(client.script(&contract).await.unwrap(), json!({ "code": [] }));
    }

    #[tokio::test]
    async fn test_missing_balance_field() {
        let node = ScriptedNode::healthy();
        node.reply(&contract_path(ADDRESS, "balance"), json!({}));

        assert!(matches!(
            client_for(&node).balance(None).await,
            Err(WalletError::MalformedResponse(_))
        ));
    }
}

// ============================================================================
// Transfer Pipeline
// ============================================================================

mod transfer {
    use super::*;

    fn request(destination: &str) -> TransferRequest {
        TransferRequest {
            destination: destination.to_string(),
            amount: 13.001001,
            fee: 0.05,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_transfer_call_sequence() {
        let node = ScriptedNode::healthy();
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        let receipt = client_for(&node).transfer(request(&destination)).await.unwrap();

        assert_eq!(receipt.operation_hash, SIGNED_HASH);
        assert_eq!(receipt.injected_operation, INJECTED);
        assert!(receipt.contracts.is_empty());

        // Branch and counter may arrive in either order, the rest is sequential.
        let paths = node.paths();
        assert_eq!(paths.len(), 5);
        assert!(paths[..2].contains(&PREDECESSOR_PATH.to_string()));
        assert!(paths[..2].contains(&contract_path(ADDRESS, "counter")));
        assert_eq!(&paths[2..], &[FORGE_PATH, APPLY_PATH, INJECT_PATH]);
    }

    #[tokio::test]
    async fn test_forge_request_carries_next_counter() {
        let node = ScriptedNode::healthy();
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        client_for(&node).transfer(request(&destination)).await.unwrap();

        let forge = &node.bodies(FORGE_PATH)[0];
        assert_eq!(
            forge,
            &json!({
                "branch": BRANCH,
                "kind": "manager",
                "source": ADDRESS,
                "fee": "50000",
                "counter": 8,
                "operations": [
                    { "kind": "reveal", "public_key": PUBLIC_KEY },
                    { "kind": "transaction", "amount": "13001001", "destination": destination }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_signed_operation_is_validated_and_injected() {
        let node = ScriptedNode::healthy();
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        client_for(&node).transfer(request(&destination)).await.unwrap();

        assert_eq!(
            node.bodies(APPLY_PATH)[0],
            json!({
                "pred_block": BRANCH,
                "operation_hash": SIGNED_HASH,
                "forged_operation": FORGED,
                "signature": SIGNATURE
            })
        );
        assert_eq!(
            node.bodies(INJECT_PATH)[0],
            json!({ "signedOperationContents": format!("{}{}", FORGED, SIGNATURE_HEX) })
        );
    }

    #[tokio::test]
    async fn test_source_override() {
        let node = ScriptedNode::healthy();
        let source = contract_address(3);
        node.reply(&contract_path(&source, "counter"), json!({ "counter": "41" }));
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        let mut req = request(&destination);
        req.source = Some(source.clone());
        client_for(&node).transfer(req).await.unwrap();

        assert!(node.paths().contains(&contract_path(&source, "counter")));
        assert!(!node.paths().contains(&contract_path(ADDRESS, "counter")));

        let forge = &node.bodies(FORGE_PATH)[0];
        assert_eq!(forge["source"], json!(source));
        assert_eq!(forge["counter"], json!(42));
    }

    #[tokio::test]
    async fn test_parameters_are_forwarded() {
        let node = ScriptedNode::healthy();
        let destination = contract_address(5);

        let mut req = request(&destination);
        req.parameters = Some(json!({ "string": "hello" }));
        client_for(&node).transfer(req).await.unwrap();

        let forge = &node.bodies(FORGE_PATH)[0];
        assert_eq!(forge["operations"][1]["parameters"], json!({ "string": "hello" }));
    }

    #[tokio::test]
    async fn test_invalid_destination_makes_no_calls() {
        let node = ScriptedNode::healthy();

        let result = client_for(&node).transfer(request("tz1invalid")).await;
        assert!(matches!(result, Err(WalletError::Decode(_))));

        let result = client_for(&node).transfer(request(PUBLIC_KEY)).await;
        assert!(matches!(result, Err(WalletError::Decode(_))));

        assert!(node.calls().is_empty());
    }

    #[tokio::test]
    async fn test_negative_amount_makes_no_calls() {
        let node = ScriptedNode::healthy();
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        let mut req = request(&destination);
        req.amount = -1.0;
        let result = client_for(&node).transfer(req).await;

        assert!(matches!(result, Err(WalletError::InvalidAmount(_))));
        assert!(node.calls().is_empty());
    }
}

// ============================================================================
// Origination and Faucet
// ============================================================================

mod origination_and_faucet {
    use super::*;

    #[tokio::test]
    async fn test_originate() {
        let node = ScriptedNode::healthy();
        let created = contract_address(8);
        node.reply(APPLY_PATH, json!({ "contracts": [created] }));

        let receipt = client_for(&node)
            .originate(OriginationRequest {
                balance: 2.5,
                fee: 0.0,
                spendable: true,
                delegatable: false,
                script: None,
            })
            .await
            .unwrap();

        assert_eq!(receipt.contracts, vec![created]);

        let forge = &node.bodies(FORGE_PATH)[0];
        assert_eq!(forge["counter"], json!(8));
        assert_eq!(
            forge["operations"],
            json!([{
                "kind": "origination",
                "managerPubkey": ADDRESS,
                "balance": "2500000",
                "spendable": true,
                "delegatable": false
            }])
        );
    }

    #[tokio::test]
    async fn test_faucet_probe_then_transfer() {
        let node = ScriptedNode::healthy();
        let funding = contract_address(6);
        node.reply(APPLY_PATH, json!({ "contracts": [funding] }));
        node.reply(&contract_path(&funding, "counter"), json!({ "counter": 0 }));

        let receipt = client_for(&node).faucet().await.unwrap();
        assert_eq!(receipt.operation_hash, SIGNED_HASH);

        let forges = node.bodies(FORGE_PATH);
        assert_eq!(forges.len(), 2);

        // Probe: no manager header, unsigned.
        let probe = forges[0].as_object().unwrap();
        assert_eq!(probe.len(), 2);
        assert_eq!(probe["branch"], json!(BRANCH));
        assert_eq!(probe["operations"][0]["kind"], json!("faucet"));
        assert_eq!(probe["operations"][0]["id"], json!(ADDRESS));
        assert_eq!(probe["operations"][0]["nonce"].as_str().unwrap().len(), 64);

        let applies = node.bodies(APPLY_PATH);
        assert_eq!(applies[0]["operation_hash"], json!(UNSIGNED_HASH));
        assert!(applies[0].get("signature").is_none());
        assert_eq!(
            node.bodies(INJECT_PATH)[0],
            json!({ "signedOperationContents": FORGED })
        );

        // Transfer from the funded contract back to self.
        let transfer = &forges[1];
        assert_eq!(transfer["source"], json!(funding));
        assert_eq!(transfer["counter"], json!(1));
        assert_eq!(transfer["fee"], json!("0"));
        assert_eq!(
            transfer["operations"][1],
            json!({ "kind": "transaction", "amount": "100000", "destination": ADDRESS })
        );
        assert_eq!(applies[1]["signature"], json!(SIGNATURE));
    }

    #[tokio::test]
    async fn test_faucet_probe_skips_counter() {
        let node = ScriptedNode::healthy();
        node.reply(APPLY_PATH, json!({ "contracts": [] }));

        let result = client_for(&node).faucet().await;
        assert!(matches!(result, Err(WalletError::MalformedResponse(_))));

        // Only the probe ran: no counter fetch, one forge.
        assert!(!node.paths().contains(&contract_path(ADDRESS, "counter")));
        assert_eq!(node.bodies(FORGE_PATH).len(), 1);
    }
}

// ============================================================================
// Ledger Node
// ============================================================================

mod ledger {
    use super::*;

    /// Funds a faucet probe puts on the contract it creates.
    const FAUCET_FUNDS: u64 = 10_000_000;
    const FORGED_LEN: usize = 8;

    /// A node that keeps balances and counters and settles injected
    /// operations against them.
    #[derive(Default)]
    struct LedgerNode {
        state: Mutex<Ledger>,
    }

    #[derive(Default)]
    struct Ledger {
        balances: HashMap<String, u64>,
        counters: HashMap<String, u64>,
        forged: HashMap<String, Value>,
        created: HashMap<String, String>,
        next_id: u8,
    }

    fn minor(value: &Value) -> u64 {
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| panic!("expected minor units as a decimal string: {}", value))
    }

    impl Ledger {
        fn credit(&mut self, id: &str, amount: u64) {
            *self.balances.entry(id.to_string()).or_default() += amount;
        }

        fn debit(&mut self, id: &str, amount: u64) {
            let balance = self.balances.entry(id.to_string()).or_default();
            *balance = balance.checked_sub(amount).expect("balance too low");
        }

        fn forge(&mut self, request: &Value) -> Value {
            self.next_id += 1;
            let forged = format!("{:0width$x}", self.next_id, width = FORGED_LEN);
            self.forged.insert(forged.clone(), request.clone());
            json!({ "operation": forged })
        }

        fn apply(&mut self, body: &Value) -> Value {
            let forged = body["forged_operation"].as_str().unwrap().to_string();
            let request = &self.forged[&forged];
            let creates = request["operations"]
                .as_array()
                .unwrap()
                .iter()
                .any(|op| op["kind"] == "origination" || op["kind"] == "faucet");
            if !creates {
                return json!({ "contracts": [] });
            }

            let contract = contract_address(0x80 + self.next_id);
            self.created.insert(forged, contract.clone());
            json!({ "contracts": [contract] })
        }

        fn inject(&mut self, body: &Value) -> Value {
            let contents = body["signedOperationContents"].as_str().unwrap();
            let forged = contents[..FORGED_LEN].to_string();
            let request = self.forged.remove(&forged).unwrap();

            let source = request["source"].as_str().map(str::to_string);
            if let Some(source) = &source {
                self.debit(source, minor(&request["fee"]));
                self.counters
                    .insert(source.clone(), request["counter"].as_u64().unwrap());
            }

            for op in request["operations"].as_array().unwrap() {
                match op["kind"].as_str().unwrap() {
                    "transaction" => {
                        let amount = minor(&op["amount"]);
                        self.debit(source.as_deref().unwrap(), amount);
                        self.credit(op["destination"].as_str().unwrap(), amount);
                    }
                    "origination" => {
                        let balance = minor(&op["balance"]);
                        let contract = self.created[&forged].clone();
                        self.debit(source.as_deref().unwrap(), balance);
                        self.credit(&contract, balance);
                    }
                    "faucet" => {
                        let contract = self.created[&forged].clone();
                        self.credit(&contract, FAUCET_FUNDS);
                    }
                    _ => {}
                }
            }
            json!({ "injectedOperation": format!("oo{}", forged) })
        }

        fn handle(&mut self, path: &str, body: &Value) -> Option<Value> {
            match path {
                PREDECESSOR_PATH => Some(json!({ "predecessor": BRANCH })),
                FORGE_PATH => Some(self.forge(body)),
                APPLY_PATH => Some(self.apply(body)),
                INJECT_PATH => Some(self.inject(body)),
                _ => {
                    let rest = path.strip_prefix("/blocks/prevalidation/proto/context/contracts/")?;
                    let (id, leaf) = rest.split_once('/')?;
                    match leaf {
                        "balance" => {
                            let balance = self.balances.get(id).copied().unwrap_or(0);
                            Some(json!({ "balance": balance.to_string() }))
                        }
                        "counter" => {
                            let counter = self.counters.get(id).copied().unwrap_or(0);
                            Some(json!({ "counter": counter }))
                        }
                        _ => None,
                    }
                }
            }
        }
    }

    #[async_trait]
    impl RpcTransport for LedgerNode {
        async fn post(&self, url: &str, body: &Value) -> Result<RpcResponse> {
            let path = url.strip_prefix(HOST).unwrap_or(url);
            let reply = self.state.lock().unwrap().handle(path, body);
            Ok(match reply {
                Some(value) => RpcResponse::ok(value.to_string()),
                None => RpcResponse {
                    status: 404,
                    body: String::new(),
                },
            })
        }
    }

    fn funded_client(balance: u64) -> TzClient {
        let node = LedgerNode::default();
        node.state.lock().unwrap().credit(ADDRESS, balance);
        TzClient::new(
            RpcGateway::new(HOST, Arc::new(node)),
            Keypair::from_seed_str(SEED).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_transfer_moves_exact_amount() {
        let client = funded_client(50_000_000);
        let destination = encode(Prefix::Identity, &[9u8; 20]);

        let own_before = client.balance(None).await.unwrap();
        let dest_before = client.balance(Some(&destination)).await.unwrap();

        client
            .transfer(TransferRequest {
                destination: destination.clone(),
                amount: 13.001001,
                fee: 0.05,
                ..Default::default()
            })
            .await
            .unwrap();

        let own_after = client.balance(None).await.unwrap();
        let dest_after = client.balance(Some(&destination)).await.unwrap();
        assert_eq!(dest_after - dest_before, 13_001_001);
        assert!(own_before - own_after >= 13_001_001 + 50_000);
        assert_eq!(client.counter(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_faucet_credits_fixed_amount() {
        let client = funded_client(0);

        let before = client.balance(None).await.unwrap();
        client.faucet().await.unwrap();
        let after = client.balance(None).await.unwrap();

        assert_eq!(after - before, FAUCET_AMOUNT);
    }

    #[tokio::test]
    async fn test_originated_contract_holds_initial_balance() {
        let client = funded_client(5_000_000);

        let receipt = client
            .originate(OriginationRequest {
                balance: 2.01,
                spendable: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(receipt.contracts.len(), 1);
        assert_eq!(
            client.balance(Some(&receipt.contracts[0])).await.unwrap(),
            2_010_000
        );
        assert_eq!(client.balance(None).await.unwrap(), 5_000_000 - 2_010_000);
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod errors {
    use super::*;

    fn destination() -> String {
        encode(Prefix::Identity, &[9u8; 20])
    }

    async fn transfer(node: &Arc<ScriptedNode>) -> Result<tz_wallet::OperationReceipt> {
        client_for(node)
            .transfer(TransferRequest {
                destination: destination(),
                amount: 1.0,
                ..Default::default()
            })
            .await
    }

    #[tokio::test]
    async fn test_stale_counter_aborts_before_injection() {
        let node = ScriptedNode::healthy();
        node.respond(
            APPLY_PATH,
            RpcResponse {
                status: 500,
                body: json!([{ "kind": "temporary", "id": "proto.alpha.counter_in_the_past" }])
                    .to_string(),
            },
        );

        let err = transfer(&node).await.unwrap_err();
        assert!(matches!(err, WalletError::StaleContext(_)));
        assert!(!node.paths().contains(&INJECT_PATH.to_string()));
    }

    #[tokio::test]
    async fn test_rejected_operation() {
        let node = ScriptedNode::healthy();
        node.reply(
            APPLY_PATH,
            json!({ "error": [{ "kind": "temporary", "id": "proto.alpha.balance_too_low" }] }),
        );

        let err = transfer(&node).await.unwrap_err();
        assert!(matches!(err, WalletError::RemoteValidation(ref m) if m.contains("balance_too_low")));
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_network_failure_on_forge() {
        let node = ScriptedNode::healthy();
        node.fail(FORGE_PATH, "connection reset");

        let err = transfer(&node).await.unwrap_err();
        assert!(matches!(err, WalletError::Network(_)));
        assert!(!err.is_remote());
        assert!(!node.paths().contains(&APPLY_PATH.to_string()));
    }

    #[tokio::test]
    async fn test_network_failure_on_context_fetch() {
        let node = ScriptedNode::healthy();
        node.fail(PREDECESSOR_PATH, "timed out");

        assert!(matches!(
            transfer(&node).await,
            Err(WalletError::Network(_))
        ));
        assert!(!node.paths().contains(&FORGE_PATH.to_string()));
    }

    #[tokio::test]
    async fn test_forged_bytes_must_be_hex() {
        let node = ScriptedNode::healthy();
        node.reply(FORGE_PATH, json!({ "operation": "not-hex" }));

        assert!(matches!(
            transfer(&node).await,
            Err(WalletError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unparsable_injection_reply() {
        let node = ScriptedNode::healthy();
        node.respond(INJECT_PATH, RpcResponse::ok("<html>bad gateway</html>"));

        assert!(matches!(
            transfer(&node).await,
            Err(WalletError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_path_is_remote_error() {
        let node = Arc::new(ScriptedNode::default());
        assert!(matches!(
            client_for(&node).head().await,
            Err(WalletError::RemoteValidation(_))
        ));
    }
}

// ============================================================================
// Accounts and Session
// ============================================================================

mod accounts {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_unlock_and_query() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        // 1. Import an account into a file-backed store
        let keypair = Keypair::from_seed_str(SEED).unwrap();
        let mut registry = AccountRegistry::open(JsonFileStore::open(&path).unwrap()).unwrap();
        registry.import_account("main", &keypair, TEST_PASSWORD).unwrap();
        drop(registry);

        // 2. Reopen and unlock
        let registry = AccountRegistry::open(JsonFileStore::open(&path).unwrap()).unwrap();
        let blob = registry.account("main").unwrap().cipherdata;
        let mut session = Session::new();
        assert!(matches!(
            session.unlock(&blob, "wrong"),
            Err(WalletError::WrongPassword)
        ));
        session.unlock(&blob, TEST_PASSWORD).unwrap();
        assert_eq!(session.keypair().unwrap().public_key_hash(), ADDRESS);

        // 3. Query through the session and cache the balance
        let node = ScriptedNode::healthy();
        let gateway = RpcGateway::new(HOST, node.clone());
        assert_eq!(session.refresh_balance(&gateway).await.unwrap(), 2_500_000);
        assert_eq!(session.cached_balance(), Some(2_500_000));

        // 4. Locking drops both the keys and the cached balance
        session.lock();
        assert_eq!(session.cached_balance(), None);
        assert!(matches!(
            session.client(gateway),
            Err(WalletError::Locked)
        ));
    }

    #[test]
    fn test_access_code_unlocks_same_account() {
        let keypair = Keypair::from_seed_str(SEED).unwrap();
        let mut registry = AccountRegistry::open(MemoryStore::new()).unwrap();
        registry.import_account("main", &keypair, TEST_PASSWORD).unwrap();

        let code = tz_wallet::generate_access_code();
        let blob = CipherBlob::seal(&keypair.secret_key_bytes()[..], &code).unwrap();
        registry.set_access_code("main", blob).unwrap();

        let stored = registry.access_code_blob("main").unwrap();
        let mut session = Session::new();
        session.unlock(&stored, &code).unwrap();
        assert_eq!(session.keypair().unwrap().public_key_hash(), ADDRESS);
    }

    #[test]
    fn test_mnemonic_account_restores_with_password() {
        let mut registry = AccountRegistry::open(MemoryStore::new()).unwrap();
        let (mnemonic, keypair) = registry.create_account("new", TEST_PASSWORD).unwrap();

        let restored = Keypair::from_mnemonic(&mnemonic, TEST_PASSWORD).unwrap();
        assert_eq!(restored.public_key_hash(), keypair.public_key_hash());

        let other = Keypair::from_mnemonic(&mnemonic, "different").unwrap();
        assert_ne!(other.public_key_hash(), keypair.public_key_hash());
    }
}

// ============================================================================
// Live Node
// ============================================================================

mod live_node {
    use super::*;
    use tz_wallet::{ClientConfig, Network};

    fn live_client() -> TzClient {
        let config = ClientConfig {
            network: Network::Zeronet,
            ..Default::default()
        };
        TzClient::new(
            config.gateway().unwrap(),
            Keypair::from_seed_str(SEED).unwrap(),
        )
    }

    #[tokio::test]
    #[ignore = "requires a reachable public node"]
    async fn test_live_transfer() {
        let client = live_client();
        let destination = "tz1fEYqu5SjJ8z22Y7U5vVqrJTsGJcv8dy1r";
        let fee = 0.05;

        let own_before = client.balance(None).await.unwrap();
        let dest_before = client.balance(Some(destination)).await.unwrap();
        client
            .transfer(TransferRequest {
                destination: destination.to_string(),
                amount: 13.001001,
                fee,
                ..Default::default()
            })
            .await
            .unwrap();
        let own_after = client.balance(None).await.unwrap();
        let dest_after = client.balance(Some(destination)).await.unwrap();

        assert_eq!(dest_after - dest_before, 13_001_001);
        assert!(own_before - own_after >= 13_001_001 + tz_wallet::amount::to_minor(fee).unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a reachable public node"]
    async fn test_live_faucet() {
        let client = live_client();

        let before = client.balance(None).await.unwrap();
        client.faucet().await.unwrap();
        let after = client.balance(None).await.unwrap();

        assert_eq!(after - before, FAUCET_AMOUNT);
    }

    #[tokio::test]
    #[ignore = "requires a reachable public node"]
    async fn test_live_origination() {
        let client = live_client();
        let receipt = client
            .originate(OriginationRequest {
                balance: 2.01,
                spendable: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(receipt.contracts.len(), 1);
        assert_eq!(
            client.balance(Some(&receipt.contracts[0])).await.unwrap(),
            2_010_000
        );
    }
}
