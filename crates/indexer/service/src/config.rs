use std::time::Duration;

/// Default time between two scan loop ticks.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Default number of consecutive failed steps after which a drain cycle gives up until the next
/// tick.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Configuration for a [`crate::TxParserService`] and its scan loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Last scanned block to resume from. Zero means "not started": the first step jumps to the
    /// remote head instead of backfilling history.
    pub start_block: u64,
    /// Time between two scan loop ticks.
    pub scan_interval: Duration,
    /// Consecutive failed steps tolerated within one drain cycle.
    pub max_consecutive_failures: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            start_block: 0,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

impl ScannerConfig {
    /// Sets the block to resume from.
    pub const fn with_start_block(mut self, start_block: u64) -> Self {
        self.start_block = start_block;
        self
    }

    /// Sets the scan interval.
    pub const fn with_scan_interval(mut self, scan_interval: Duration) -> Self {
        self.scan_interval = scan_interval;
        self
    }

    /// Sets the number of consecutive failures tolerated per drain cycle.
    pub const fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max;
        self
    }
}
