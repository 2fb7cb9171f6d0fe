//! The [`TxParserService`] facade.

use crate::{BlockScanner, NodeActor, ScanActor, ScanActorError, ScannerConfig};
use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use txscan_protocol::{ChainClient, Transaction, normalize_address};
use txscan_storage::{InMemoryDatabase, KeyValueStore, StorageError};

/// Tracks transactions of subscribed addresses while tailing a remote chain.
///
/// The service owns the store, the [`BlockScanner`] and the lifecycle of the background
/// [`ScanActor`]. Subscriptions and queries may be issued from any task while the actor runs.
#[derive(Debug)]
pub struct TxParserService<C, S = InMemoryDatabase> {
    /// Subscriptions and recorded histories.
    store: Arc<S>,
    /// The scanner shared with the scan actor.
    scanner: Arc<BlockScanner<C, S>>,
    /// Configuration for the scan loop.
    config: ScannerConfig,
    /// Cancels the scan actor.
    cancellation: CancellationToken,
    /// Set by the first call to [`TxParserService::start`].
    started: AtomicBool,
    /// The running scan actor, taken by [`TxParserService::stop`].
    scan_task: Mutex<Option<JoinHandle<Result<(), ScanActorError>>>>,
}

impl<C> TxParserService<C, InMemoryDatabase>
where
    C: ChainClient + 'static,
{
    /// Creates a service backed by a fresh [`InMemoryDatabase`].
    pub fn new(client: C, config: ScannerConfig) -> Self {
        Self::with_store(client, Arc::new(InMemoryDatabase::new()), config)
    }
}

impl<C, S> TxParserService<C, S>
where
    C: ChainClient + 'static,
    S: KeyValueStore + 'static,
{
    /// Creates a service recording into `store`.
    pub fn with_store(client: C, store: Arc<S>, config: ScannerConfig) -> Self {
        let scanner = Arc::new(BlockScanner::new(client, Arc::clone(&store), config.start_block));
        Self {
            store,
            scanner,
            config,
            cancellation: CancellationToken::new(),
            started: AtomicBool::new(false),
            scan_task: Mutex::new(None),
        }
    }

    /// Ties the scan loop to `parent`: cancelling `parent` also stops this service.
    pub fn with_parent_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancellation = parent.child_token();
        self
    }

    /// Registers `address` so transactions touching it are recorded from the next scanned block.
    ///
    /// Subscribing an address that is already subscribed succeeds and keeps its history.
    /// Returns `false` if the address is blank or the store rejected the write.
    pub fn subscribe(&self, address: &str) -> bool {
        let Some(key) = normalize_address(address) else {
            warn!(target: "service", "Rejected blank address subscription");
            return false;
        };

        match self.store.put(&key, Vec::new()) {
            Ok(()) => {
                debug!(target: "service", address = %key, "Address subscribed");
                true
            }
            Err(err) => {
                error!(target: "service", address = %key, %err, "Error subscribing address");
                false
            }
        }
    }

    /// Returns every transaction recorded for `address`, in the order it was recorded.
    ///
    /// An unknown address, or a store that is no longer available, yields an empty history.
    pub fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        let Some(key) = normalize_address(address) else {
            return Vec::new();
        };

        let records = match self.store.get(&key) {
            Ok(records) => records,
            Err(StorageError::NotFound(_)) => {
                debug!(target: "service", address = %key, "No history for address");
                return Vec::new();
            }
            Err(err) => {
                error!(target: "service", address = %key, %err, "Error getting transactions");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| match serde_json::from_slice(record) {
                Ok(tx) => Some(tx),
                Err(err) => {
                    warn!(target: "service", address = %key, %err, "Skipping undecodable record");
                    None
                }
            })
            .collect()
    }

    /// Returns the last fully scanned block, zero if scanning has not started.
    pub fn current_scan_position(&self) -> u64 {
        self.scanner.current_position()
    }

    /// Spawns the scan loop on the current tokio runtime, ticking every `interval`.
    ///
    /// Only the first call has an effect; it returns `true`. Later calls, including calls after
    /// [`TxParserService::stop`], return `false` and leave the loop as it is. A zero `interval`
    /// is rejected with `false` and does not count as the first call.
    pub fn start(&self, interval: Duration) -> bool {
        if interval.is_zero() {
            error!(target: "service", "Scan interval must be non-zero");
            return false;
        }

        if self.started.swap(true, Ordering::AcqRel) {
            debug!(target: "service", "Scan loop already started");
            return false;
        }

        let actor = ScanActor::new(Arc::clone(&self.scanner), interval, self.cancellation.clone())
            .with_max_consecutive_failures(self.config.max_consecutive_failures);
        let handle = tokio::spawn(actor.start(()));
        *self.scan_task.lock() = Some(handle);
        true
    }

    /// Spawns the scan loop with the configured interval. See [`TxParserService::start`].
    pub fn start_default(&self) -> bool {
        self.start(self.config.scan_interval)
    }

    /// Stops the scan loop and waits for the step in flight, if any, to finish.
    ///
    /// The loop cannot be restarted afterwards.
    pub async fn stop(&self) {
        self.cancellation.cancel();

        let handle = self.scan_task.lock().take();
        let Some(handle) = handle else {
            return;
        };

        match handle.await {
            Ok(Ok(())) => info!(target: "service", "Scan loop stopped"),
            Ok(Err(err)) => error!(target: "service", %err, "Scan loop exited with error"),
            Err(err) => error!(target: "service", %err, "Scan loop task failed"),
        }
    }

    /// Returns true while the scan loop has been started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.cancellation.is_cancelled()
    }

    /// Returns the underlying scanner.
    pub const fn scanner(&self) -> &Arc<BlockScanner<C, S>> {
        &self.scanner
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the scanner configuration.
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }
}
