use thiserror::Error;
use txscan_protocol::ChainClientError;

/// An error that aborts a single scan step.
///
/// Only chain client failures abort a step; the scan position is left untouched so the same
/// block is retried by the next step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Querying the remote head failed.
    #[error("failed to query head block index: {0}")]
    HeadIndex(#[source] ChainClientError),

    /// Fetching the next block failed.
    #[error("failed to fetch block {index}: {source}")]
    BlockFetch {
        /// The block that could not be fetched.
        index: u64,
        /// The underlying client error.
        #[source]
        source: ChainClientError,
    },
}
