//! Display formatting, unit parsing and password hashing.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::utils::parse_units;
use alloy::primitives::{keccak256, Address, B256, U256};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Decimals carried by on-chain USD amounts.
pub const USD_DECIMALS: u8 = 18;

/// Length of generated password salts.
pub const SALT_LENGTH: usize = 16;

/// Format an 18-decimal USD amount as `1,234.57`, optionally with a `$`.
///
/// Rounds half-up to cents.
pub fn format_usd(amount: U256, with_symbol: bool) -> String {
    let cent = U256::from(10u64).pow(U256::from(USD_DECIMALS - 2));
    let half_cent = cent / U256::from(2u64);
    let cents = amount.saturating_add(half_cent) / cent;

    let hundred = U256::from(100u64);
    let whole = (cents / hundred).to_string();
    let fraction: u64 = (cents % hundred).to::<u64>();

    let symbol = if with_symbol { "$" } else { "" };
    format!("{symbol}{}.{fraction:02}", group_thousands(&whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Shorten an address to `0x1234...abcd`.
pub fn format_eth_addr(addr: &str) -> String {
    shorten(addr, 6, 4)
}

/// Shorten a hash to `0x12345678...12345678`.
pub fn format_eth_hash(hash: &str) -> String {
    shorten(hash, 10, 8)
}

fn shorten(value: &str, head: usize, tail: usize) -> String {
    if !value.is_ascii() || value.len() <= head + tail {
        return value.to_string();
    }
    format!("{}...{}", &value[..head], &value[value.len() - tail..])
}

/// Whether `addr` is a well-formed address equal to the zero address.
pub fn is_zero_address(addr: &str) -> bool {
    parse_address(addr).is_some_and(|a| a == Address::ZERO)
}

/// Parse a `0x`-prefixed, 20-byte hex address.
pub fn parse_address(addr: &str) -> Option<Address> {
    let addr = addr.trim();
    if !addr.starts_with("0x") || addr.len() != 42 {
        return None;
    }
    Address::from_str(addr).ok()
}

/// `TransactionLacksApprovals` → `Transaction lacks approvals`.
pub fn pascal_to_sentence_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut prev_lower = false;

    for (i, ch) in s.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() && prev_lower {
            out.push(' ');
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        prev_lower = ch.is_lowercase();
    }
    out
}

/// Denominations accepted for Ether amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EthereumUnit {
    #[default]
    Wei,
    Gwei,
    Ether,
}

impl EthereumUnit {
    pub const ALL: [EthereumUnit; 3] = [Self::Wei, Self::Gwei, Self::Ether];

    pub fn decimals(self) -> u8 {
        match self {
            Self::Wei => 0,
            Self::Gwei => 9,
            Self::Ether => 18,
        }
    }

    /// Unit with the given decimal count, falling back to Wei.
    pub fn from_decimals(decimals: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|unit| unit.decimals() == decimals)
            .unwrap_or_default()
    }
}

impl fmt::Display for EthereumUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Wei => "Wei",
            Self::Gwei => "Gwei",
            Self::Ether => "Ether",
        };
        f.write_str(text)
    }
}

impl FromStr for EthereumUnit {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wei" => Ok(Self::Wei),
            "gwei" => Ok(Self::Gwei),
            "ether" | "eth" => Ok(Self::Ether),
            other => Err(BlockchainError::InvalidArgument(format!("unknown unit '{other}'"))),
        }
    }
}

/// Parse a non-negative decimal string scaled by `decimals`.
pub fn parse_amount(value: &str, decimals: u8) -> BlockchainResult<U256> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('-') {
        return Err(BlockchainError::InvalidArgument(format!(
            "amount must be a non-negative number, got '{value}'"
        )));
    }
    parse_units(value, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| BlockchainError::InvalidArgument(format!("invalid amount '{value}': {e}")))
}

/// keccak256 over the packed `password ++ salt` bytes.
pub fn password_hash(password: &str, salt: &str) -> B256 {
    let mut packed = Vec::with_capacity(password.len() + salt.len());
    packed.extend_from_slice(password.as_bytes());
    packed.extend_from_slice(salt.as_bytes());
    keccak256(packed)
}

/// Random alphanumeric salt.
pub fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}
