//! The [`BlockScanner`] advances through the remote block sequence one block at a time.

use crate::ScanError;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::Mutex;
use txscan_protocol::{ChainClient, Transaction, normalize_address, parse_transactions};
use txscan_storage::KeyValueStore;

/// Transactions matched in one block, grouped by the subscribed address they touch.
///
/// Within an address the transactions keep their block order.
pub type AddressBatches = HashMap<String, Vec<Transaction>>;

/// Returns the next block to scan given the last scanned block and the remote head.
///
/// - `None` when the scanner is already at the head, or the head is behind the scanner.
/// - The head itself when nothing has been scanned yet (`last_scanned == 0`): history older than
///   the head at startup is skipped.
/// - `last_scanned + 1` otherwise. The scanner never jumps ahead, so catching up after a gap is a
///   sequence of single steps.
pub const fn next_index(last_scanned: u64, head: u64) -> Option<u64> {
    if head == last_scanned {
        return None;
    }
    if last_scanned == 0 {
        return Some(head);
    }
    if head < last_scanned {
        return None;
    }
    Some(last_scanned + 1)
}

/// Scans blocks from a [`ChainClient`] and records transactions of subscribed addresses.
///
/// The scan position is published atomically once a block has been fully processed, so
/// [`BlockScanner::current_position`] never observes a partially scanned block. Steps are
/// serialized: concurrent calls to [`BlockScanner::advance`] run one after the other.
#[derive(Debug)]
pub struct BlockScanner<C, S> {
    /// Source of blocks.
    client: C,
    /// Subscriptions and recorded histories.
    store: Arc<S>,
    /// The last fully scanned block, zero before the first step.
    last_scanned: AtomicU64,
    /// Held for the duration of a step.
    step: Mutex<()>,
}

impl<C, S> BlockScanner<C, S>
where
    C: ChainClient,
    S: KeyValueStore,
{
    /// Creates a new [`BlockScanner`] resuming after `start_at`.
    ///
    /// A `start_at` of zero means the scanner has not started and will begin at the remote head.
    pub fn new(client: C, store: Arc<S>, start_at: u64) -> Self {
        info!(target: "scanner", start_at, "Block scanner set to start");
        Self { client, store, last_scanned: AtomicU64::new(start_at), step: Mutex::new(()) }
    }

    /// Returns the last fully scanned block.
    pub fn current_position(&self) -> u64 {
        self.last_scanned.load(Ordering::Acquire)
    }

    /// Returns the store the scanner records into.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Scans the next pending block.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(index))` with the newly scanned block.
    /// * `Ok(None)` if no block is pending.
    /// * `Err(_)` if the head query or the block fetch failed. The scan position is unchanged.
    ///
    /// Failing to persist one address's batch does not fail the step: the error is logged, the
    /// other addresses are still written and the position still advances.
    pub async fn advance(&self) -> Result<Option<u64>, ScanError> {
        let _step = self.step.lock().await;

        let last_scanned = self.current_position();
        let head = self.client.head_index().await.map_err(ScanError::HeadIndex)?;

        let Some(index) = next_index(last_scanned, head) else {
            trace!(target: "scanner", head, last_scanned, "No pending block");
            return Ok(None);
        };

        let batches = self.scan_block(index).await?;
        let recorded = self.save_transactions(batches);

        self.last_scanned.store(index, Ordering::Release);
        debug!(target: "scanner", block = index, head, recorded, "Scanned block");

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(crate::Metrics::BLOCKS_SCANNED).increment(1);
            metrics::gauge!(crate::Metrics::SCAN_POSITION).set(index as f64);
        }

        Ok(Some(index))
    }

    /// Fetches block `index` and returns its transactions that touch subscribed addresses.
    ///
    /// Nothing is written to the store.
    pub async fn scan_block(&self, index: u64) -> Result<AddressBatches, ScanError> {
        let block = self
            .client
            .block_by_index(index)
            .await
            .map_err(|source| ScanError::BlockFetch { index, source })?;

        Ok(self.pull(&parse_transactions(&block.transactions)))
    }

    /// Groups `txs` by the subscribed addresses they touch.
    ///
    /// Sender and recipient are checked independently, so a transaction from a subscribed
    /// address to itself appears twice in that address's batch. Only direct transfers are
    /// considered; internal calls made during contract execution are not traced.
    pub fn pull(&self, txs: &[Transaction]) -> AddressBatches {
        let mut batches = AddressBatches::new();
        for tx in txs {
            if let Some(from) = self.subscribed(&tx.from) {
                batches.entry(from).or_default().push(tx.clone());
            }
            if let Some(to) = tx.to.as_deref().and_then(|to| self.subscribed(to)) {
                batches.entry(to).or_default().push(tx.clone());
            }
        }
        batches
    }

    /// Appends every batch to the store, one write per address.
    ///
    /// Returns the number of records written. A failed write is logged and skipped.
    pub fn save_transactions(&self, batches: AddressBatches) -> usize {
        let mut written = 0;
        for (address, txs) in batches {
            let records = encode_batch(&txs);
            let count = records.len();
            match self.store.put(&address, records) {
                Ok(()) => written += count,
                Err(err) => {
                    warn!(target: "scanner", %address, %err, "Failed to save transactions");
                    #[cfg(feature = "metrics")]
                    metrics::counter!(crate::Metrics::STORE_WRITE_ERRORS).increment(1);
                }
            }
        }

        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::TRANSACTIONS_RECORDED).increment(written as u64);

        written
    }

    /// Returns the store key for `address` if it is subscribed.
    fn subscribed(&self, address: &str) -> Option<String> {
        let key = normalize_address(address)?;
        match self.store.has(&key) {
            Ok(true) => Some(key),
            Ok(false) => None,
            Err(err) => {
                warn!(target: "scanner", address = %key, %err, "Failed to check subscription");
                None
            }
        }
    }
}

fn encode_batch(txs: &[Transaction]) -> Vec<Vec<u8>> {
    txs.iter()
        .filter_map(|tx| match serde_json::to_vec(tx) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(target: "scanner", hash = %tx.hash, %err, "Failed to encode transaction");
                None
            }
        })
        .collect()
}
