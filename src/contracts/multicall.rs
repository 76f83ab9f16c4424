//! Batched reads through Multicall3.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::contracts::abi::IMulticall3::{self, Call3, Call3Result};
use crate::contracts::abi::IERC20;
use crate::contracts::types::TokenMetadata;

/// Calls issued per token by [`Multicall3Service::token_metadatas`].
const CALLS_PER_TOKEN: usize = 3;

#[derive(Debug, Clone)]
pub struct Multicall3Service {
    client: BlockchainClient,
    address: Address,
}

impl Multicall3Service {
    pub fn new(client: BlockchainClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Run `calls` in one `eth_call`; results come back in call order.
    pub async fn aggregate3(&self, calls: Vec<Call3>) -> BlockchainResult<Vec<Call3Result>> {
        let multicall = self.address;
        self.client
            .read("aggregate3", move |provider| {
                let calls = calls.clone();
                async move {
                    IMulticall3::new(multicall, provider)
                        .aggregate3(calls)
                        .call()
                        .await
                }
            })
            .await
    }

    /// `name`, `symbol` and `decimals` for every token, in input order.
    pub async fn token_metadatas(&self, tokens: &[Address]) -> BlockchainResult<Vec<TokenMetadata>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let calls = metadata_calls(tokens);
        let results = self.aggregate3(calls).await?;
        decode_metadatas(tokens, &results)
    }
}

fn call3(target: Address, call_data: Vec<u8>) -> Call3 {
    Call3 {
        target,
        allowFailure: false,
        callData: Bytes::from(call_data),
    }
}

fn metadata_calls(tokens: &[Address]) -> Vec<Call3> {
    tokens
        .iter()
        .flat_map(|&token| {
            [
                call3(token, IERC20::nameCall {}.abi_encode()),
                call3(token, IERC20::symbolCall {}.abi_encode()),
                call3(token, IERC20::decimalsCall {}.abi_encode()),
            ]
        })
        .collect()
}

fn decode_metadatas(
    tokens: &[Address],
    results: &[Call3Result],
) -> BlockchainResult<Vec<TokenMetadata>> {
    if results.len() != tokens.len() * CALLS_PER_TOKEN {
        return Err(BlockchainError::Unknown(format!(
            "multicall returned {} results for {} calls",
            results.len(),
            tokens.len() * CALLS_PER_TOKEN
        )));
    }

    tokens
        .iter()
        .zip(results.chunks_exact(CALLS_PER_TOKEN))
        .map(|(&address, chunk)| {
            let decode_err =
                |e: alloy::sol_types::Error| BlockchainError::Unknown(format!("{address}: {e}"));
            Ok(TokenMetadata {
                address,
                name: IERC20::nameCall::abi_decode_returns(&chunk[0].returnData).map_err(decode_err)?,
                symbol: IERC20::symbolCall::abi_decode_returns(&chunk[1].returnData)
                    .map_err(decode_err)?,
                decimals: IERC20::decimalsCall::abi_decode_returns(&chunk[2].returnData)
                    .map_err(decode_err)?,
            })
        })
        .collect()
}
