//! [`NodeActor`] implementation that periodically drives a [`BlockScanner`].

use crate::{
    BlockScanner, DEFAULT_MAX_CONSECUTIVE_FAILURES, NodeActor,
    actors::{CancellableContext, ScanActorError},
};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::{
    select,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use txscan_protocol::ChainClient;
use txscan_storage::KeyValueStore;

/// An actor that tails the chain by repeatedly advancing a [`BlockScanner`].
///
/// On every tick the actor drains all pending blocks, calling [`BlockScanner::advance`] until
/// it reports that nothing is pending, then idles until the next tick. A failed step is logged
/// and retried within the same drain; after `max_consecutive_failures` failures in a row the
/// drain ends early and the next tick tries again. Once the cancellation token fires no further
/// step is started, while a step already in flight is allowed to finish.
#[derive(Debug)]
pub struct ScanActor<C, S> {
    /// The scanner driven by this actor.
    scanner: Arc<BlockScanner<C, S>>,
    /// Time between two drain cycles.
    scan_interval: Duration,
    /// Failed steps in a row tolerated within one drain cycle.
    max_consecutive_failures: u32,
    /// The cancellation token, shared with the owning service.
    cancellation: CancellationToken,
}

impl<C, S> ScanActor<C, S>
where
    C: ChainClient,
    S: KeyValueStore,
{
    /// Creates a new [`ScanActor`] with the default failure budget.
    pub const fn new(
        scanner: Arc<BlockScanner<C, S>>,
        scan_interval: Duration,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            scanner,
            scan_interval,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            cancellation,
        }
    }

    /// Sets the number of consecutive failed steps after which a drain cycle ends early.
    ///
    /// A value of zero is treated as one.
    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max.max(1);
        self
    }

    /// Advances the scanner until no block is pending, the failure budget is spent or the actor
    /// is cancelled. Returns the number of blocks scanned.
    pub async fn drain(&self) -> u64 {
        let mut scanned = 0;
        let mut failures = 0;

        while !self.cancellation.is_cancelled() {
            match self.scanner.advance().await {
                Ok(None) => break,
                Ok(Some(_)) => {
                    scanned += 1;
                    failures = 0;
                }
                Err(err) => {
                    failures += 1;
                    warn!(target: "scan_actor", %err, failures, "Error scanning block");

                    #[cfg(feature = "metrics")]
                    metrics::counter!(crate::Metrics::SCAN_ERRORS).increment(1);

                    if failures >= self.max_consecutive_failures {
                        warn!(
                            target: "scan_actor",
                            failures,
                            "Too many consecutive failures, waiting for next tick"
                        );
                        break;
                    }
                }
            }
        }

        scanned
    }
}

#[async_trait]
impl<C, S> NodeActor for ScanActor<C, S>
where
    C: ChainClient + 'static,
    S: KeyValueStore + 'static,
{
    type Error = ScanActorError;
    type StartData = ();

    async fn start(self, _: Self::StartData) -> Result<(), Self::Error> {
        if self.scan_interval.is_zero() {
            return Err(ScanActorError::ZeroInterval);
        }

        let cancel = self.cancellation.clone();
        let mut ticker = interval(self.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            target: "scan_actor",
            interval_secs = ?self.scan_interval.as_secs_f64(),
            position = self.scanner.current_position(),
            "Starting scan actor"
        );

        loop {
            select! {
                biased;

                _ = cancel.cancelled() => {
                    info!(
                        target: "scan_actor",
                        position = self.scanner.current_position(),
                        "Received shutdown signal. Exiting scan actor task."
                    );
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let scanned = self.drain().await;
                    if scanned > 0 {
                        info!(
                            target: "scan_actor",
                            scanned,
                            last_scanned = self.scanner.current_position(),
                            "Drained pending blocks"
                        );
                    } else {
                        debug!(
                            target: "scan_actor",
                            last_scanned = self.scanner.current_position(),
                            "No pending blocks"
                        );
                    }
                }
            }
        }
    }
}

impl<C, S> CancellableContext for ScanActor<C, S>
where
    C: ChainClient,
    S: KeyValueStore,
{
    fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancellation.cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeChain, transfer};
    use tokio::time::sleep;
    use txscan_storage::InMemoryDatabase;

    const INTERVAL: Duration = Duration::from_secs(10);

    type TestScanner = BlockScanner<Arc<FakeChain>, InMemoryDatabase>;

    fn scanner(chain: &Arc<FakeChain>, start_at: u64) -> Arc<TestScanner> {
        Arc::new(BlockScanner::new(Arc::clone(chain), Arc::new(InMemoryDatabase::new()), start_at))
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_scans_every_pending_block() {
        let chain = Arc::new(FakeChain::new(105));
        let scanner = scanner(&chain, 100);
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, CancellationToken::new());

        assert_eq!(actor.drain().await, 5);
        assert_eq!(scanner.current_position(), 105);
        assert_eq!(actor.drain().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_retries_within_cycle_after_error() {
        let chain = Arc::new(FakeChain::new(102));
        chain.fail_head(2);
        let scanner = scanner(&chain, 100);
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, CancellationToken::new());

        assert_eq!(actor.drain().await, 2);
        assert_eq!(scanner.current_position(), 102);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_stops_after_failure_budget() {
        let chain = Arc::new(FakeChain::new(101));
        chain.fail_block(101);
        let scanner = scanner(&chain, 100);
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, CancellationToken::new())
            .with_max_consecutive_failures(3);

        assert_eq!(actor.drain().await, 0);
        assert_eq!(chain.fetched(), vec![101, 101, 101]);
        assert_eq!(scanner.current_position(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_does_nothing_once_cancelled() {
        let chain = Arc::new(FakeChain::new(110));
        let scanner = scanner(&chain, 100);
        let cancellation = CancellationToken::new();
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, cancellation.clone());

        cancellation.cancel();
        assert_eq!(actor.drain().await, 0);
        assert!(chain.fetched().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_actor_tails_new_blocks_on_each_tick() {
        let chain = Arc::new(FakeChain::new(50));
        chain.insert_block(52, vec![transfer(52, "0x01", "0xaa", "0xbb")]);
        let scanner = scanner(&chain, 0);
        scanner.store().put("0xaa", vec![]).unwrap();

        let cancellation = CancellationToken::new();
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, cancellation.clone());
        let handle = tokio::spawn(actor.start(()));

        // The first tick fires immediately and jumps to the head.
        sleep(Duration::from_secs(1)).await;
        assert_eq!(scanner.current_position(), 50);

        chain.set_head(53);
        sleep(INTERVAL).await;
        assert_eq!(scanner.current_position(), 53);
        assert_eq!(scanner.store().get("0xaa").unwrap().len(), 1);

        cancellation.cancel();
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_actor_survives_failing_ticks() {
        let chain = Arc::new(FakeChain::new(20));
        chain.fail_block(11);
        let scanner = scanner(&chain, 10);

        let cancellation = CancellationToken::new();
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, cancellation.clone())
            .with_max_consecutive_failures(2);
        let handle = tokio::spawn(actor.start(()));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(scanner.current_position(), 10);
        assert_eq!(chain.fetched().len(), 2);

        chain.heal_block(11);
        sleep(INTERVAL).await;
        assert_eq!(scanner.current_position(), 20);
        assert!(!handle.is_finished());

        cancellation.cancel();
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_actor_issues_no_steps_after_cancellation() {
        let chain = Arc::new(FakeChain::new(5));
        let scanner = scanner(&chain, 0);

        let cancellation = CancellationToken::new();
        let actor = ScanActor::new(Arc::clone(&scanner), INTERVAL, cancellation.clone());
        let handle = tokio::spawn(actor.start(()));

        sleep(Duration::from_secs(1)).await;
        cancellation.cancel();
        assert_eq!(handle.await.unwrap(), Ok(()));

        let fetched = chain.fetched();
        chain.set_head(9);
        sleep(INTERVAL * 3).await;
        assert_eq!(chain.fetched(), fetched);
        assert_eq!(scanner.current_position(), 5);
    }

    #[tokio::test]
    async fn test_actor_rejects_zero_interval() {
        let chain = Arc::new(FakeChain::new(5));
        let actor = ScanActor::new(scanner(&chain, 0), Duration::ZERO, CancellationToken::new());
        assert_eq!(actor.start(()).await, Err(ScanActorError::ZeroInterval));
    }
}
