//! # txscan-service
//!
//! Tail-following ingestion of a remote block sequence into per-address transaction histories.
//!
//! - [`BlockScanner`] owns the scan position and advances it one block at a time, recording
//!   transactions that touch subscribed addresses into a [`KeyValueStore`].
//! - [`ScanActor`] drives a scanner from a background task: on every tick it drains all pending
//!   blocks, and it stops for good once its cancellation token fires.
//! - [`TxParserService`] ties both to a store and exposes subscribe / query operations.
//!
//! [`KeyValueStore`]: txscan_storage::KeyValueStore

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod actors;
pub use actors::{CancellableContext, NodeActor, ScanActor, ScanActorError};

mod config;
pub use config::{DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_SCAN_INTERVAL, ScannerConfig};

mod error;
pub use error::ScanError;

mod scanner;
pub use scanner::{AddressBatches, BlockScanner, next_index};

mod service;
pub use service::TxParserService;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
