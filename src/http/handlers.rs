//! JSON handlers for the dashboard API.
//!
//! Every view handler answers with the [`RouteLocation`] the dashboard ended
//! up at plus the data that view shows. Addresses and hashes arrive as path
//! segments or strings and are parsed here so malformed input gets the same
//! error body as chain failures.

use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::contracts::{Token, TokenMetadata, Transaction, TransactionAction, Wallet};
use crate::dashboard::{parse_page, CreatedWallet, RouteLocation, RouteName, SessionState};
use crate::events::{WalletEvent, WalletEventKind};
use crate::http::error::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::utils::format::{
    format_eth_addr, format_eth_hash, format_usd, parse_address, parse_amount, EthereumUnit,
    USD_DECIMALS,
};

// =============================================================================
// Request parsing
// =============================================================================

fn address_arg(raw: &str) -> ApiResult<Address> {
    parse_address(raw.trim()).ok_or_else(|| ApiError::BadRequest(format!("invalid address '{raw}'")))
}

fn optional_address_arg(raw: Option<&str>) -> ApiResult<Address> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => address_arg(raw),
        None => Ok(Address::ZERO),
    }
}

fn hash_arg(raw: &str) -> ApiResult<B256> {
    let raw = raw.trim();
    if !raw.starts_with("0x") {
        return Err(ApiError::BadRequest(format!("invalid transaction hash '{raw}'")));
    }
    B256::from_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid transaction hash '{raw}'")))
}

/// Decimal count for an amount: a unit name or a plain decimal count. Wei when absent.
fn unit_decimals(unit: Option<&str>) -> ApiResult<u8> {
    let Some(unit) = unit.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(EthereumUnit::Wei.decimals());
    };
    if unit.bytes().all(|b| b.is_ascii_digit()) {
        return unit
            .parse::<u8>()
            .map_err(|_| ApiError::BadRequest(format!("invalid decimal count '{unit}'")));
    }
    Ok(EthereumUnit::from_str(unit)?.decimals())
}

fn amount_arg(amount: &str, unit: Option<&str>) -> ApiResult<U256> {
    Ok(parse_amount(amount, unit_decimals(unit)?)?)
}

fn usd_arg(amount: &str) -> ApiResult<U256> {
    Ok(parse_amount(amount, USD_DECIMALS)?)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetadataQuery {
    /// Comma-separated token addresses.
    #[serde(default)]
    pub addresses: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectRequest {
    pub account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub name: String,
    pub signers: Vec<String>,
    pub minimum_approvals: u64,
    pub password: String,
    #[serde(default)]
    pub salt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub usd_amount: String,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub usd_amount: String,
    pub password: String,
    pub salt: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub to: String,
    pub amount: String,
    #[serde(default)]
    pub unit: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// A view: where the dashboard is, and what it shows there.
#[derive(Debug, Serialize)]
pub struct ViewResponse<T: Serialize> {
    pub location: RouteLocation,
    pub path: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ViewResponse<T> {
    fn new(location: RouteLocation, data: T) -> Json<Self> {
        Json(Self {
            path: location.path(),
            location,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub chain_id: u64,
    pub signer: Option<Address>,
    pub watch_only: bool,
    pub connected: bool,
    pub active_account: Option<Address>,
    pub rpc_healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub state: SessionState,
    pub active_account: Option<Address>,
}

#[derive(Debug, Serialize)]
pub struct WalletListView {
    pub wallets: Vec<Wallet>,
    pub current_page: u64,
}

#[derive(Debug, Serialize)]
pub struct WalletView {
    pub wallet: Option<Wallet>,
}

#[derive(Debug, Serialize)]
pub struct BalanceView {
    pub wallet: Address,
    pub token: Address,
    pub balance: U256,
    pub balance_in_usd: U256,
    pub balance_in_usd_display: String,
}

#[derive(Debug, Serialize)]
pub struct TokenIndexView {
    pub tokens: Vec<Token>,
    pub selected: Option<Token>,
    pub current_page: u64,
}

#[derive(Debug, Serialize)]
pub struct TransactionIndexView {
    pub transactions: Vec<Transaction>,
    pub selected: Option<Transaction>,
    pub current_page: u64,
    pub token_metadatas: Vec<TokenMetadata>,
}

#[derive(Debug, Serialize)]
pub struct ActionDone {
    pub action: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TransactionCreated {
    pub transaction_hash: B256,
}

#[derive(Debug, Serialize)]
pub struct EventEntry {
    #[serde(flatten)]
    pub event: WalletEvent,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct EventsView {
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub metadatas: Vec<TokenMetadata>,
}

/// One line describing an event for the notification list.
pub fn summarize_event(event: &WalletEvent) -> String {
    let short = |addr: &Address| format_eth_addr(&addr.to_string());
    let hash = |h: &B256| format_eth_hash(&h.to_string());
    match &event.kind {
        WalletEventKind::Deposited { sender, .. } => format!("Deposit from {}", short(sender)),
        WalletEventKind::TransactionCreated { tx_hash, to, .. } => {
            format!("Transaction {} created to {}", hash(tx_hash), short(to))
        }
        WalletEventKind::TransactionApproved { tx_hash, approver } => {
            format!("Transaction {} approved by {}", hash(tx_hash), short(approver))
        }
        WalletEventKind::TransactionRevoked { tx_hash, revoker } => {
            format!("Transaction {} revoked by {}", hash(tx_hash), short(revoker))
        }
        WalletEventKind::TransactionCancelled { tx_hash, canceller } => {
            format!("Transaction {} cancelled by {}", hash(tx_hash), short(canceller))
        }
        WalletEventKind::TransactionExecuted { tx_hash, executor } => {
            format!("Transaction {} executed by {}", hash(tx_hash), short(executor))
        }
    }
}

// =============================================================================
// Session
// =============================================================================

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let dashboard = &state.dashboard;
    let signer = dashboard.client().signer_address();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        chain_id: state.config.blockchain.chain_id,
        signer,
        watch_only: signer.is_none(),
        connected: dashboard.session().is_connected(),
        active_account: dashboard.session().active_account(),
        rpc_healthy: dashboard.client().is_healthy().await,
    })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.dashboard.session();
    Json(SessionView {
        state: session.state(),
        active_account: session.active_account(),
    })
}

/// Connect the signer account, or a watch-only account when no signer is loaded.
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> ApiResult<Json<ViewResponse<SessionView>>> {
    let requested = request
        .account
        .as_deref()
        .map(address_arg)
        .transpose()?;
    let signer = state.dashboard.client().signer_address();

    let account = match (signer, requested) {
        (Some(signer), Some(account)) if account != signer => {
            return Err(ApiError::BadRequest(format!(
                "account {account} is not the loaded signer"
            )));
        }
        (Some(signer), _) => signer,
        (None, Some(account)) => account,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "no signer loaded; pass a watch-only account".to_string(),
            ));
        }
    };

    let session = state.dashboard.session();
    state.dashboard.reset_stores();
    session.connect(vec![account])?;
    tracing::info!(account = %account, watch_only = signer.is_none(), "Account connected");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::Dashboard),
        SessionView {
            state: session.state(),
            active_account: session.active_account(),
        },
    ))
}

pub async fn disconnect(State(state): State<AppState>) -> ApiResult<Json<ViewResponse<SessionView>>> {
    let session = state.dashboard.session();
    session.disconnect()?;
    state.dashboard.reset_stores();
    tracing::info!("Account disconnected");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::Connect),
        SessionView {
            state: session.state(),
            active_account: None,
        },
    ))
}

// =============================================================================
// Wallets
// =============================================================================

/// `?page=` lists that page; without it the current page is reloaded.
pub async fn list_wallets(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ViewResponse<WalletListView>>> {
    let dashboard = &state.dashboard;
    let location = match query.page.as_deref() {
        Some(raw) => {
            let page = parse_page(Some(raw));
            dashboard.sync_wallets_with_route(page, None).await?;
            RouteLocation::new(RouteName::Dashboard).with_page(page)
        }
        None => dashboard.navigate_to_dashboard().await?,
    };

    Ok(ViewResponse::new(
        location,
        WalletListView {
            wallets: dashboard.wallets().items(),
            current_page: dashboard.wallets().current_page(),
        },
    ))
}

pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> ApiResult<(StatusCode, Json<ViewResponse<CreatedWallet>>)> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("wallet name is required".to_string()));
    }
    let signers = request
        .signers
        .iter()
        .map(|s| address_arg(s))
        .collect::<ApiResult<Vec<_>>>()?;

    let created = state
        .dashboard
        .create_wallet(
            name,
            signers,
            request.minimum_approvals,
            &request.password,
            request.salt,
        )
        .await?;
    tracing::info!(wallet = %created.address, "Wallet created");

    let location = RouteLocation::new(RouteName::WalletShow).with_wallet(created.address);
    Ok((StatusCode::CREATED, ViewResponse::new(location, created)))
}

pub async fn show_wallet(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> ApiResult<Json<ViewResponse<WalletView>>> {
    let wallet = address_arg(&wallet)?;
    let location = state.dashboard.navigate_to_wallet_show(Some(wallet)).await?;
    Ok(ViewResponse::new(
        location,
        WalletView {
            wallet: state.dashboard.wallets().selected(),
        },
    ))
}

pub async fn wallet_balance(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<Json<BalanceView>> {
    let wallet = address_arg(&wallet)?;
    let token = optional_address_arg(query.token.as_deref())?;
    let balance = state
        .dashboard
        .fetch_wallet_balance(wallet, Some(token))
        .await?;

    Ok(Json(BalanceView {
        wallet,
        token: balance.token,
        balance: balance.balance,
        balance_in_usd: balance.balance_in_usd,
        balance_in_usd_display: format_usd(balance.balance_in_usd, true),
    }))
}

pub async fn deposit(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Json(request): Json<DepositRequest>,
) -> ApiResult<Json<ViewResponse<ActionDone>>> {
    let wallet = address_arg(&wallet)?;
    let token = optional_address_arg(request.token.as_deref())?;
    let value = amount_arg(&request.amount, request.unit.as_deref())?;

    state.dashboard.deposit_wallet(wallet, token, value).await?;
    tracing::info!(wallet = %wallet, token = %token, "Deposit confirmed");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::WalletShow).with_wallet(wallet),
        ActionDone { action: "deposit" },
    ))
}

pub async fn lock_balance(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Json(request): Json<LockRequest>,
) -> ApiResult<Json<ViewResponse<ActionDone>>> {
    let wallet = address_arg(&wallet)?;
    let usd_amount = usd_arg(&request.usd_amount)?;

    state.dashboard.lock_wallet_balance(wallet, usd_amount).await?;
    tracing::info!(wallet = %wallet, "Balance locked");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::WalletShow).with_wallet(wallet),
        ActionDone { action: "lock" },
    ))
}

pub async fn unlock_balance(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Json(request): Json<UnlockRequest>,
) -> ApiResult<Json<ViewResponse<ActionDone>>> {
    let wallet = address_arg(&wallet)?;
    let usd_amount = usd_arg(&request.usd_amount)?;

    state
        .dashboard
        .unlock_wallet_balance(wallet, usd_amount, request.password, request.salt)
        .await?;
    tracing::info!(wallet = %wallet, "Balance unlocked");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::WalletShow).with_wallet(wallet),
        ActionDone { action: "unlock" },
    ))
}

// =============================================================================
// Tokens
// =============================================================================

pub async fn list_tokens(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ViewResponse<TokenIndexView>>> {
    let wallet = address_arg(&wallet)?;
    let tokens = state.dashboard.tokens();
    let page = match query.page.as_deref() {
        Some(raw) => parse_page(Some(raw)),
        None => tokens.current_page(),
    };

    state
        .dashboard
        .sync_tokens_with_route(Some(wallet), page, None)
        .await?;

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::TokenIndex)
            .with_wallet(wallet)
            .with_page(page),
        token_index_view(&state),
    ))
}

pub async fn show_token(
    State(state): State<AppState>,
    Path((wallet, token)): Path<(String, String)>,
) -> ApiResult<Json<ViewResponse<TokenIndexView>>> {
    let wallet = address_arg(&wallet)?;
    let token = address_arg(&token)?;
    let location = state
        .dashboard
        .navigate_to_token_index(Some(wallet), Some(token))
        .await?;
    Ok(ViewResponse::new(location, token_index_view(&state)))
}

fn token_index_view(state: &AppState) -> TokenIndexView {
    let tokens = state.dashboard.tokens().snapshot();
    TokenIndexView {
        tokens: tokens.items.clone(),
        selected: tokens.selected_item().cloned(),
        current_page: tokens.current_page,
    }
}

pub async fn add_token(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Json(request): Json<AddTokenRequest>,
) -> ApiResult<(StatusCode, Json<ViewResponse<ActionDone>>)> {
    let wallet = address_arg(&wallet)?;
    let token = address_arg(&request.token)?;

    state.dashboard.add_token(wallet, token).await?;
    tracing::info!(wallet = %wallet, token = %token, "Token added");

    let location = RouteLocation::new(RouteName::TokenIndex)
        .with_wallet(wallet)
        .with_token(token);
    Ok((StatusCode::CREATED, ViewResponse::new(location, ActionDone { action: "add_token" })))
}

pub async fn remove_token(
    State(state): State<AppState>,
    Path((wallet, token)): Path<(String, String)>,
) -> ApiResult<Json<ViewResponse<ActionDone>>> {
    let wallet = address_arg(&wallet)?;
    let token = address_arg(&token)?;

    state.dashboard.remove_token(wallet, token).await?;
    tracing::info!(wallet = %wallet, token = %token, "Token removed");

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::TokenIndex).with_wallet(wallet),
        ActionDone { action: "remove_token" },
    ))
}

pub async fn token_metadata(
    State(state): State<AppState>,
    Query(query): Query<MetadataQuery>,
) -> ApiResult<Json<MetadataResponse>> {
    let addresses = query
        .addresses
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(address_arg)
        .collect::<ApiResult<Vec<_>>>()?;

    let metadatas = state.dashboard.fetch_token_metadatas(&addresses).await?;
    Ok(Json(MetadataResponse { metadatas }))
}

// =============================================================================
// Transactions
// =============================================================================

pub async fn list_transactions(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ViewResponse<TransactionIndexView>>> {
    let wallet = address_arg(&wallet)?;
    let page = match query.page.as_deref() {
        Some(raw) => parse_page(Some(raw)),
        None => state.dashboard.transactions().current_page(),
    };

    state
        .dashboard
        .sync_transactions_with_route(Some(wallet), page, None)
        .await?;
    let token_metadatas = state.dashboard.load_transaction_token_metadatas().await?;

    Ok(ViewResponse::new(
        RouteLocation::new(RouteName::TransactionIndex)
            .with_wallet(wallet)
            .with_page(page),
        transaction_index_view(&state, token_metadatas),
    ))
}

pub async fn show_transaction(
    State(state): State<AppState>,
    Path((wallet, hash)): Path<(String, String)>,
) -> ApiResult<Json<ViewResponse<TransactionIndexView>>> {
    let wallet = address_arg(&wallet)?;
    let hash = hash_arg(&hash)?;
    let location = state
        .dashboard
        .navigate_to_transaction_index(Some(wallet), Some(hash))
        .await?;
    let token_metadatas = state.dashboard.cached_transaction_token_metadatas();
    Ok(ViewResponse::new(
        location,
        transaction_index_view(&state, token_metadatas),
    ))
}

fn transaction_index_view(state: &AppState, token_metadatas: Vec<TokenMetadata>) -> TransactionIndexView {
    let transactions = state.dashboard.transactions().snapshot();
    TransactionIndexView {
        transactions: transactions.items.clone(),
        selected: transactions.selected_item().cloned(),
        current_page: transactions.current_page,
        token_metadatas,
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<ViewResponse<TransactionCreated>>)> {
    let wallet = address_arg(&wallet)?;
    let token = optional_address_arg(request.token.as_deref())?;
    let to = address_arg(&request.to)?;
    let value = amount_arg(&request.amount, request.unit.as_deref())?;

    let hash = state
        .dashboard
        .create_wallet_transaction(wallet, token, to, value)
        .await?;
    tracing::info!(wallet = %wallet, tx_hash = %hash, "Wallet transaction created");

    let location = RouteLocation::new(RouteName::TransactionIndex)
        .with_wallet(wallet)
        .with_transaction(hash);
    Ok((
        StatusCode::CREATED,
        ViewResponse::new(location, TransactionCreated { transaction_hash: hash }),
    ))
}

/// `approve`, `revoke`, `cancel` or `execute`.
pub async fn act_on_transaction(
    State(state): State<AppState>,
    Path((wallet, hash, action)): Path<(String, String, String)>,
) -> ApiResult<Json<ViewResponse<ActionDone>>> {
    let wallet = address_arg(&wallet)?;
    let hash = hash_arg(&hash)?;
    let action = TransactionAction::from_str(&action)?;

    state
        .dashboard
        .act_on_wallet_transaction(wallet, action, hash)
        .await?;
    tracing::info!(wallet = %wallet, tx_hash = %hash, action = action.as_str(), "Wallet transaction updated");

    let location = RouteLocation::new(RouteName::TransactionIndex)
        .with_wallet(wallet)
        .with_transaction(hash);
    Ok(ViewResponse::new(location, ActionDone { action: action.as_str() }))
}

// =============================================================================
// Activity
// =============================================================================

pub async fn wallet_events(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<ViewResponse<EventsView>>> {
    let wallet = address_arg(&wallet)?;
    let location = state.dashboard.navigate_to_notifications(Some(wallet))?;
    let events = state
        .feed
        .recent(&wallet, query.limit)
        .into_iter()
        .map(|event| EventEntry {
            summary: summarize_event(&event),
            event,
        })
        .collect();

    Ok(ViewResponse::new(location, EventsView { events }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_unit_decimals() {
        assert_eq!(unit_decimals(None).unwrap(), 0);
        assert_eq!(unit_decimals(Some("ether")).unwrap(), 18);
        assert_eq!(unit_decimals(Some("gwei")).unwrap(), 9);
        assert_eq!(unit_decimals(Some("6")).unwrap(), 6);
        assert!(unit_decimals(Some("999")).is_err());
        assert!(unit_decimals(Some("finney")).is_err());
    }

    #[test]
    fn test_amount_arg() {
        assert_eq!(
            amount_arg("1.5", Some("ether")).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(amount_arg("250", Some("6")).unwrap(), U256::from(250_000_000u64));
        assert!(amount_arg("-1", None).is_err());
    }

    #[test]
    fn test_path_args() {
        assert!(address_arg("0x12").is_err());
        assert_eq!(optional_address_arg(None).unwrap(), Address::ZERO);
        assert_eq!(optional_address_arg(Some("  ")).unwrap(), Address::ZERO);

        let hash = B256::repeat_byte(0xab);
        assert_eq!(hash_arg(&hash.to_string()).unwrap(), hash);
        assert!(hash_arg("abab").is_err());
    }

    #[test]
    fn test_summarize_event() {
        let event = WalletEvent {
            id: Uuid::new_v4(),
            wallet: Address::repeat_byte(0x11),
            block_number: Some(7),
            transaction_hash: None,
            log_index: None,
            kind: WalletEventKind::TransactionApproved {
                tx_hash: B256::repeat_byte(0xab),
                approver: Address::repeat_byte(0x22),
            },
        };
        assert_eq!(
            summarize_event(&event),
            "Transaction 0xabababab...abababab approved by 0x2222...2222"
        );
    }

    #[test]
    fn test_view_response_flattens_data() {
        let location = RouteLocation::new(RouteName::WalletShow).with_wallet(Address::repeat_byte(0x11));
        let Json(view) = ViewResponse::new(location, ActionDone { action: "lock" });
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["action"], "lock");
        assert_eq!(value["location"]["name"], "wallet.show");
        assert!(value["path"].as_str().unwrap().starts_with("/wallets/0x"));
    }
}
