//! Dashboard API tests against a mock JSON-RPC node.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::{SolCall, SolError, SolValue};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use multisig_dashboard::blockchain::BlockchainClient;
use multisig_dashboard::config::DashboardConfig;
use multisig_dashboard::contracts::abi::IWalletFactory;
use multisig_dashboard::dashboard::Dashboard;
use multisig_dashboard::events::ActivityFeed;
use multisig_dashboard::http::{router, AppState};

mod common;
use common::{CallOutcome, Mined, MockRpc};

const TEAM_WALLET: Address = Address::repeat_byte(0x11);
const ALICE: Address = Address::repeat_byte(0xa1);

fn team_wallet() -> IWalletFactory::WalletView {
    IWalletFactory::WalletView {
        name: "Team".to_string(),
        addr: TEAM_WALLET,
        signers: vec![ALICE, Address::repeat_byte(0xb0)],
        minimumApprovals: U256::from(2),
        totalBalanceInUsd: U256::from(1_500u64) * U256::from(10u64).pow(U256::from(18)),
        totalLockedBalanceInUsd: U256::ZERO,
        totalUnlockedBalanceInUsd: U256::from(1_500u64) * U256::from(10u64).pow(U256::from(18)),
    }
}

/// A factory that knows one wallet, signed by Alice.
fn factory_node(_to: Address, calldata: &[u8]) -> CallOutcome {
    let selector = &calldata[..4.min(calldata.len())];

    if selector == IWalletFactory::getNewestWalletsBySignerCall::SELECTOR {
        let call = IWalletFactory::getNewestWalletsBySignerCall::abi_decode(calldata).unwrap();
        let wallets = if call.signer == ALICE { vec![team_wallet()] } else { Vec::new() };
        return CallOutcome::Return(wallets.abi_encode());
    }

    if selector == IWalletFactory::getWalletCall::SELECTOR {
        let call = IWalletFactory::getWalletCall::abi_decode(calldata).unwrap();
        if call.walletAddress == TEAM_WALLET {
            return CallOutcome::Return(team_wallet().abi_encode());
        }
        return CallOutcome::Revert(IWalletFactory::WalletDoesNotExist::SELECTOR.to_vec());
    }

    CallOutcome::Revert(Vec::new())
}

async fn test_app() -> Router {
    let rpc = common::start_mock_rpc(factory_node).await;
    let config = common::test_config(rpc);
    let client = common::test_client(&config).await;
    app_with(client, config)
}

fn app_with(client: BlockchainClient, config: DashboardConfig) -> Router {
    let dashboard = Dashboard::from_config(client, &config).unwrap();

    router(AppState {
        dashboard: Arc::new(dashboard),
        feed: Arc::new(ActivityFeed::new(config.events.feed_capacity)),
        config: Arc::new(config),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn connect_alice(app: &Router) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/session/connect",
        Some(json!({ "account": ALICE.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_guard_rejects_unconnected_requests() {
    let app = test_app().await;

    for uri in ["/api/wallets", "/api/tokens/metadata?addresses="] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "NOT_CONNECTED");
        assert_eq!(body["redirect"], "/connect");
    }
}

#[tokio::test]
async fn test_status_reports_watch_only_node() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain_id"], common::CHAIN_ID);
    assert_eq!(body["watch_only"], true);
    assert_eq!(body["connected"], false);
    assert_eq!(body["rpc_healthy"], true);
}

#[tokio::test]
async fn test_watch_only_connect_needs_account() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::POST, "/api/session/connect", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/session/connect",
        Some(json!({ "account": "0x1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_connect_then_list_wallets() {
    let app = test_app().await;
    connect_alice(&app).await;

    let (status, session) = send(&app, Method::GET, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["accounts"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/api/wallets?page=1", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["location"]["name"], "dashboard");
    assert_eq!(body["path"], "/?page=1");
    assert_eq!(body["current_page"], 1);
    let wallets = body["wallets"].as_array().unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0]["name"], "Team");
    assert_eq!(wallets[0]["minimum_approvals"], 2);
}

#[tokio::test]
async fn test_invalid_page_falls_back_to_first() {
    let app = test_app().await;
    connect_alice(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/wallets?page=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_page"], 1);
}

#[tokio::test]
async fn test_show_wallet_selects_it() {
    let app = test_app().await;
    connect_alice(&app).await;

    let uri = format!("/api/wallets/{TEAM_WALLET}");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["location"]["name"], "wallet.show");
    assert_eq!(body["path"], format!("/wallets/{TEAM_WALLET}"));
    assert_eq!(body["wallet"]["name"], "Team");
}

#[tokio::test]
async fn test_revert_is_normalized() {
    let app = test_app().await;
    connect_alice(&app).await;

    let uri = format!("/api/wallets/{}", Address::repeat_byte(0x99));
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CALL_EXCEPTION");
    assert_eq!(body["message"], "Wallet does not exist.");
}

#[tokio::test]
async fn test_malformed_address_is_rejected() {
    let app = test_app().await;
    connect_alice(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/wallets/not-an-address", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_writes_need_a_signer() {
    let app = test_app().await;
    connect_alice(&app).await;

    let uri = format!("/api/wallets/{TEAM_WALLET}/lock");
    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "usd_amount": "10" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "WALLET_ERROR");
}

#[tokio::test]
async fn test_reverted_write_is_transaction_failed() {
    let node = MockRpc::new(factory_node)
        .on_send(|_| Mined::reverted())
        .start()
        .await;
    let config = common::test_config(node.addr);
    let client = common::test_signing_client(&config).await;
    let signer = client.signer_address().unwrap();
    let app = app_with(client, config);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/session/connect",
        Some(json!({ "account": signer.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/wallets/{TEAM_WALLET}/lock");
    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "usd_amount": "10" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "TRANSACTION_FAILED");
    assert_eq!(body["message"], "Transaction Failed.");
    assert_eq!(node.state.sent().len(), 1);
}

#[tokio::test]
async fn test_unknown_transaction_action() {
    let app = test_app().await;
    connect_alice(&app).await;

    let uri = format!(
        "/api/wallets/{TEAM_WALLET}/transactions/0x{}/sign",
        "ab".repeat(32)
    );
    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_disconnect_closes_the_guard() {
    let app = test_app().await;
    connect_alice(&app).await;

    let (status, body) = send(&app, Method::POST, "/api/session/disconnect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["name"], "connect");

    let (status, _) = send(&app, Method::GET, "/api/wallets", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_events_feed() {
    let app = test_app().await;
    connect_alice(&app).await;

    let uri = format!("/api/wallets/{TEAM_WALLET}/events?limit=5");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["name"], "notification.index");
    assert_eq!(body["events"], json!([]));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = test_app().await;

    let request = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
