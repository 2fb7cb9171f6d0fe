use crate::RpcBlock;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// An error returned by a [`ChainClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainClientError {
    /// The underlying client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClientBuild(String),

    /// The remote call failed or returned an unusable response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The requested block does not exist (yet) on the remote source.
    #[error("Block {0} not found")]
    BlockNotFound(u64),
}

/// Result alias for [`ChainClient`] calls.
pub type ChainClientResult<T> = Result<T, ChainClientError>;

/// Read access to a remote, append-only sequence of blocks.
///
/// The scanner only needs the current head and the contents of a block by index. Timeouts and
/// retries of individual calls are the implementation's concern.
#[async_trait]
pub trait ChainClient: Debug + Send + Sync {
    /// Returns the index of the most recent block known to the remote source.
    async fn head_index(&self) -> ChainClientResult<u64>;

    /// Returns the block at `index` with its full transactions.
    ///
    /// Fails with [`ChainClientError::BlockNotFound`] if the index does not exist yet.
    async fn block_by_index(&self, index: u64) -> ChainClientResult<RpcBlock>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for std::sync::Arc<T> {
    async fn head_index(&self) -> ChainClientResult<u64> {
        (**self).head_index().await
    }

    async fn block_by_index(&self, index: u64) -> ChainClientResult<RpcBlock> {
        (**self).block_by_index(index).await
    }
}
