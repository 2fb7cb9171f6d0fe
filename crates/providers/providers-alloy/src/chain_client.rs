//! JSON-RPC [`ChainClient`] over HTTP.

use alloy_primitives::U64;
use alloy_rpc_client::RpcClient;
use alloy_transport::TransportError;
use alloy_transport_http::Http;
use async_trait::async_trait;
use std::time::Duration;
use txscan_protocol::{ChainClient, ChainClientError, ChainClientResult, RpcBlock};
use url::Url;

/// Default timeout for a single request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Formats a block index as the hex quantity expected by `eth_getBlockByNumber`.
pub fn block_tag(index: u64) -> String {
    format!("0x{index:x}")
}

/// Builder for an [`AlloyChainClient`].
#[derive(Debug, Clone)]
pub struct AlloyChainClientBuilder {
    /// The JSON-RPC endpoint.
    pub url: Url,
    /// The timeout applied to every request.
    pub timeout: Duration,
}

impl AlloyChainClientBuilder {
    /// Creates a new [`AlloyChainClientBuilder`] for `url` with the default timeout.
    pub const fn new(url: Url) -> Self {
        Self { url, timeout: DEFAULT_RPC_TIMEOUT }
    }

    /// Sets the timeout applied to every request.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`AlloyChainClient`].
    pub fn build(self) -> ChainClientResult<AlloyChainClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ChainClientError::HttpClientBuild(e.to_string()))?;

        let transport = Http::with_client(http_client, self.url.clone());
        let client = RpcClient::new(transport, false);

        debug!(target: "chain_client", url = %self.url, timeout = ?self.timeout, "Built chain client");
        Ok(AlloyChainClient { client, url: self.url })
    }
}

/// A [`ChainClient`] reading blocks from an Ethereum JSON-RPC endpoint.
///
/// The head comes from `eth_blockNumber` and blocks from `eth_getBlockByNumber` with full
/// transaction objects. A `null` block is reported as [`ChainClientError::BlockNotFound`].
#[derive(Debug, Clone)]
pub struct AlloyChainClient {
    /// The JSON-RPC client.
    client: RpcClient,
    /// The endpoint, kept for logging.
    url: Url,
}

impl AlloyChainClient {
    /// Returns the endpoint this client talks to.
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

fn transport_error(err: TransportError) -> ChainClientError {
    ChainClientError::Transport(err.to_string())
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn head_index(&self) -> ChainClientResult<u64> {
        let head: U64 =
            self.client.request_noparams("eth_blockNumber").await.map_err(transport_error)?;
        trace!(target: "chain_client", head = %head, "Fetched head");
        Ok(head.to::<u64>())
    }

    async fn block_by_index(&self, index: u64) -> ChainClientResult<RpcBlock> {
        let block: Option<RpcBlock> = self
            .client
            .request("eth_getBlockByNumber", (block_tag(index), true))
            .await
            .map_err(|e| {
                warn!(target: "chain_client", url = %self.url, index, error = %e, "Block request failed");
                transport_error(e)
            })?;

        block.ok_or(ChainClientError::BlockNotFound(index))
    }
}
