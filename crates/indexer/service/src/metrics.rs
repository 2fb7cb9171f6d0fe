//! Metrics recorded by the scanner and the scan actor.

/// Container for the metric names recorded by this crate.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Blocks fully scanned.
    pub const BLOCKS_SCANNED: &'static str = "txscan_blocks_scanned_total";
    /// Failed scan steps, either a head query or a block fetch.
    pub const SCAN_ERRORS: &'static str = "txscan_scan_errors_total";
    /// Address batches the store refused to append.
    pub const STORE_WRITE_ERRORS: &'static str = "txscan_store_write_errors_total";
    /// Transaction records appended to subscribed histories.
    pub const TRANSACTIONS_RECORDED: &'static str = "txscan_transactions_recorded_total";
    /// The last fully scanned block.
    pub const SCAN_POSITION: &'static str = "txscan_scan_position";

    /// Describes and zeroes every metric.
    ///
    /// Call once at startup, after the global recorder is installed.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::BLOCKS_SCANNED,
            metrics::Unit::Count,
            "Total number of blocks scanned",
        );

        metrics::describe_counter!(
            Self::SCAN_ERRORS,
            metrics::Unit::Count,
            "Total number of failed scan steps",
        );

        metrics::describe_counter!(
            Self::STORE_WRITE_ERRORS,
            metrics::Unit::Count,
            "Total number of address batches that could not be written to the store",
        );

        metrics::describe_counter!(
            Self::TRANSACTIONS_RECORDED,
            metrics::Unit::Count,
            "Total number of transaction records appended for subscribed addresses",
        );

        metrics::describe_gauge!(
            Self::SCAN_POSITION,
            metrics::Unit::Count,
            "The number of the last fully scanned block",
        );
    }

    fn zero() {
        metrics::counter!(Self::BLOCKS_SCANNED).increment(0);
        metrics::counter!(Self::SCAN_ERRORS).increment(0);
        metrics::counter!(Self::STORE_WRITE_ERRORS).increment(0);
        metrics::counter!(Self::TRANSACTIONS_RECORDED).increment(0);
        metrics::gauge!(Self::SCAN_POSITION).set(0.0);
    }
}
