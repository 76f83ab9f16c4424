//! Shared utilities for integration tests: a programmable JSON-RPC node.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::{Transaction as _, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{hex, keccak256, Address, Bytes, Log as PrimitiveLog, LogData, B256};
use alloy::rpc::types::Log;
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use multisig_dashboard::blockchain::{BlockchainClient, Wallet};
use multisig_dashboard::config::{BlockchainConfig, DashboardConfig};

/// Anvil's chain id.
pub const CHAIN_ID: u64 = 31337;

pub const FACTORY: Address = Address::repeat_byte(0xfa);

/// Anvil's first development key.
pub const SIGNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Head block the node reports until a test moves it.
pub const START_BLOCK: u64 = 0x10;

/// What the mock node answers to one `eth_call`.
pub enum CallOutcome {
    Return(Vec<u8>),
    Revert(Vec<u8>),
}

/// A transaction received through `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SentTransaction {
    pub hash: B256,
    pub to: Address,
    pub input: Bytes,
}

impl SentTransaction {
    pub fn selector(&self) -> [u8; 4] {
        let mut selector = [0u8; 4];
        let len = self.input.len().min(4);
        selector[..len].copy_from_slice(&self.input[..len]);
        selector
    }
}

/// The receipt the node mines for a sent transaction.
pub struct Mined {
    pub success: bool,
    pub logs: Vec<PrimitiveLog>,
}

impl Mined {
    pub fn ok(logs: Vec<PrimitiveLog>) -> Self {
        Self { success: true, logs }
    }

    pub fn reverted() -> Self {
        Self {
            success: false,
            logs: Vec::new(),
        }
    }
}

/// Chain state shared between the node and the test.
#[derive(Default)]
pub struct NodeState {
    block_number: AtomicU64,
    logs: Mutex<Vec<Log>>,
    log_ranges: Mutex<Vec<(u64, u64)>>,
    sent: Mutex<Vec<SentTransaction>>,
    receipts: Mutex<HashMap<B256, Value>>,
}

impl NodeState {
    pub fn set_block_number(&self, block: u64) {
        self.block_number.store(block, Ordering::SeqCst);
    }

    /// Make a log visible to `eth_getLogs`.
    pub fn push_log(&self, log: Log) {
        self.logs.lock().unwrap().push(log);
    }

    /// Block ranges requested through `eth_getLogs`, oldest first.
    pub fn log_ranges(&self) -> Vec<(u64, u64)> {
        self.log_ranges.lock().unwrap().clone()
    }

    /// Transactions broadcast so far, in arrival order.
    pub fn sent(&self) -> Vec<SentTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

type CallHandler = Arc<dyn Fn(Address, &[u8]) -> CallOutcome + Send + Sync>;
type SendHandler = Arc<dyn Fn(&SentTransaction) -> Mined + Send + Sync>;

#[derive(Clone)]
struct Node {
    on_call: CallHandler,
    on_send: SendHandler,
    state: Arc<NodeState>,
}

/// A running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    pub state: Arc<NodeState>,
}

/// Builder for a mock node. `eth_call` is answered by `on_call(to, calldata)`,
/// raw transactions are mined by `on_send`.
pub struct MockRpc {
    on_call: CallHandler,
    on_send: SendHandler,
}

impl MockRpc {
    pub fn new<F>(on_call: F) -> Self
    where
        F: Fn(Address, &[u8]) -> CallOutcome + Send + Sync + 'static,
    {
        Self {
            on_call: Arc::new(on_call),
            on_send: Arc::new(|_| Mined::ok(Vec::new())),
        }
    }

    pub fn on_send<F>(mut self, on_send: F) -> Self
    where
        F: Fn(&SentTransaction) -> Mined + Send + Sync + 'static,
    {
        self.on_send = Arc::new(on_send);
        self
    }

    pub async fn start(self) -> MockNode {
        let state = Arc::new(NodeState::default());
        state.set_block_number(START_BLOCK);

        let node = Node {
            on_call: self.on_call,
            on_send: self.on_send,
            state: state.clone(),
        };
        let app = Router::new().route("/", post(rpc)).with_state(node);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        MockNode { addr, state }
    }
}

/// Start a read-only node answering `eth_call` with `on_call`.
pub async fn start_mock_rpc<F>(on_call: F) -> SocketAddr
where
    F: Fn(Address, &[u8]) -> CallOutcome + Send + Sync + 'static,
{
    MockRpc::new(on_call).start().await.addr
}

async fn rpc(State(node): State<Node>, Json(body): Json<Value>) -> Json<Value> {
    match body {
        Value::Array(requests) => Json(Value::Array(
            requests.iter().map(|r| answer(&node, r)).collect(),
        )),
        request => Json(answer(&node, &request)),
    }
}

fn quantity(value: u64) -> Value {
    json!(format!("0x{value:x}"))
}

fn answer(node: &Node, request: &Value) -> Value {
    let id = request["id"].clone();
    let params = &request["params"];
    let head = node.state.block_number.load(Ordering::SeqCst);

    let result = match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => Ok(quantity(CHAIN_ID)),
        "net_version" => Ok(json!(CHAIN_ID.to_string())),
        "eth_blockNumber" => Ok(quantity(head)),
        "eth_getBlockByNumber" => Ok(block(head)),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Ok(quantity(1_000_000_000)),
        "eth_feeHistory" => Ok(json!({
            "oldestBlock": quantity(head),
            "baseFeePerGas": [quantity(1_000_000_000), quantity(1_000_000_000)],
            "gasUsedRatio": [0.5],
            "reward": [[quantity(1_000_000_000)]],
        })),
        "eth_estimateGas" => Ok(quantity(200_000)),
        "eth_getTransactionCount" => Ok(quantity(node.state.sent.lock().unwrap().len() as u64)),
        "eth_getLogs" => Ok(get_logs(&node.state, &params[0])),
        "eth_call" => eth_call(&node.on_call, &params[0]),
        "eth_sendRawTransaction" => send_raw_transaction(node, &params[0], head),
        "eth_getTransactionReceipt" => {
            let receipt = params[0]
                .as_str()
                .and_then(|hash| hash.parse::<B256>().ok())
                .and_then(|hash| node.state.receipts.lock().unwrap().get(&hash).cloned());
            Ok(receipt.unwrap_or(Value::Null))
        }
        other => Err(json!({ "code": -32601, "message": format!("method {other} not found") })),
    };

    match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    }
}

fn eth_call(handler: &CallHandler, tx: &Value) -> Result<Value, Value> {
    let to: Address = tx["to"].as_str().and_then(|s| s.parse().ok()).unwrap_or_default();
    let input = tx["input"].as_str().or_else(|| tx["data"].as_str()).unwrap_or("0x");
    let calldata = hex::decode(input).unwrap_or_default();

    match handler(to, &calldata) {
        CallOutcome::Return(data) => Ok(json!(hex::encode_prefixed(data))),
        CallOutcome::Revert(data) => Err(json!({
            "code": 3,
            "message": "execution reverted",
            "data": hex::encode_prefixed(data),
        })),
    }
}

fn parse_block(value: &Value) -> Option<u64> {
    let hex = value.as_str()?.strip_prefix("0x")?;
    u64::from_str_radix(hex, 16).ok()
}

fn get_logs(state: &NodeState, filter: &Value) -> Value {
    let from = parse_block(&filter["fromBlock"]).unwrap_or_default();
    let to = parse_block(&filter["toBlock"]).unwrap_or(u64::MAX);
    state.log_ranges.lock().unwrap().push((from, to));

    let addresses: Vec<Address> = match &filter["address"] {
        Value::String(address) => address.parse().into_iter().collect(),
        Value::Array(list) => list
            .iter()
            .filter_map(|a| a.as_str().and_then(|a| a.parse().ok()))
            .collect(),
        _ => Vec::new(),
    };

    let stored = state.logs.lock().unwrap();
    let logs: Vec<&Log> = stored
        .iter()
        .filter(|log| {
            let block = log.block_number.unwrap_or_default();
            block >= from && block <= to
        })
        .filter(|log| addresses.is_empty() || addresses.contains(&log.inner.address))
        .collect();
    serde_json::to_value(logs).unwrap()
}

fn send_raw_transaction(node: &Node, raw: &Value, head: u64) -> Result<Value, Value> {
    let raw = raw
        .as_str()
        .and_then(|raw| hex::decode(raw).ok())
        .ok_or_else(|| json!({ "code": -32602, "message": "invalid raw transaction" }))?;
    let envelope = TxEnvelope::decode_2718(&mut raw.as_slice())
        .map_err(|e| json!({ "code": -32602, "message": e.to_string() }))?;

    let sent = SentTransaction {
        hash: keccak256(&raw),
        to: envelope.to().unwrap_or_default(),
        input: envelope.input().clone(),
    };
    let mined = (node.on_send)(&sent);

    let block_number = head + 1;
    let logs: Vec<Log> = mined
        .logs
        .into_iter()
        .enumerate()
        .map(|(index, inner)| Log {
            inner,
            block_number: Some(block_number),
            transaction_hash: Some(sent.hash),
            log_index: Some(index as u64),
            ..Default::default()
        })
        .collect();

    let receipt = json!({
        "type": "0x2",
        "status": if mined.success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": quantity(200_000),
        "logs": logs,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": sent.hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": quantity(block_number),
        "gasUsed": quantity(200_000),
        "effectiveGasPrice": quantity(1_000_000_000),
        "from": Address::ZERO,
        "to": sent.to,
        "contractAddress": Value::Null,
    });

    let hash = sent.hash;
    node.state.receipts.lock().unwrap().insert(hash, receipt);
    node.state.sent.lock().unwrap().push(sent);
    Ok(json!(hash))
}

/// An empty block at `number`.
fn block(number: u64) -> Value {
    json!({
        "hash": B256::with_last_byte(number as u8),
        "parentHash": B256::ZERO,
        "sha3Uncles": B256::ZERO,
        "miner": Address::ZERO,
        "stateRoot": B256::ZERO,
        "transactionsRoot": B256::ZERO,
        "receiptsRoot": B256::ZERO,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x0",
        "number": quantity(number),
        "gasLimit": quantity(30_000_000),
        "gasUsed": "0x0",
        "timestamp": quantity(1_700_000_000 + number),
        "extraData": "0x",
        "mixHash": B256::ZERO,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": quantity(1_000_000_000),
        "uncles": [],
        "transactions": [],
        "size": "0x200",
    })
}

/// An rpc log carrying `data`, emitted by `address` at `block`.
pub fn rpc_log(address: Address, data: LogData, block: u64) -> Log {
    Log {
        inner: PrimitiveLog { address, data },
        block_number: Some(block),
        transaction_hash: Some(B256::with_last_byte(block as u8)),
        log_index: Some(0),
        ..Default::default()
    }
}

/// Config pointing at the mock node, with the factory set and events off.
pub fn test_config(rpc: SocketAddr) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.blockchain = BlockchainConfig {
        rpc_url: format!("http://{rpc}"),
        failover_urls: Vec::new(),
        chain_id: CHAIN_ID,
        rpc_timeout_secs: 2,
        confirmation_blocks: 1,
        receipt_timeout_secs: 5,
    };
    config.contracts.wallet_factory = FACTORY.to_string();
    config.events.enabled = false;
    config
}

pub async fn test_client(config: &DashboardConfig) -> BlockchainClient {
    BlockchainClient::new(config.blockchain.clone()).await.unwrap()
}

/// A client with the development signer attached.
pub async fn test_signing_client(config: &DashboardConfig) -> BlockchainClient {
    let wallet = Wallet::from_private_key(SIGNER_KEY, CHAIN_ID).unwrap();
    test_client(config).await.with_wallet(&wallet).unwrap()
}
