//! Contains the txparser CLI.

use crate::prompt;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use txscan_cli::{LogArgs, MetricsArgs, cli_styles};
use txscan_providers_alloy::AlloyChainClientBuilder;
use txscan_service::{DEFAULT_MAX_CONSECUTIVE_FAILURES, Metrics, ScannerConfig, TxParserService};
use txscan_storage::KeyValueStore;
use url::Url;

/// Default JSON-RPC endpoint.
pub(crate) const DEFAULT_RPC_URL: &str = "https://cloudflare-eth.com";

/// Tails an Ethereum chain and records transactions of subscribed addresses.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub(crate) struct Cli {
    /// Logging arguments.
    #[command(flatten)]
    pub(crate) log_args: LogArgs,
    /// Prometheus arguments.
    #[command(flatten)]
    pub(crate) metrics: MetricsArgs,
    /// URL of the Ethereum JSON-RPC endpoint.
    #[arg(long, visible_alias = "rpc", default_value = DEFAULT_RPC_URL, env = "TXPARSER_RPC_URL")]
    pub(crate) rpc_url: Url,
    /// Last scanned block to resume from. Zero starts at the current head.
    #[arg(long, visible_alias = "block", default_value_t = 0, env = "TXPARSER_START_BLOCK")]
    pub(crate) start_block: u64,
    /// Seconds between two scan cycles.
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "TXPARSER_SCAN_INTERVAL"
    )]
    pub(crate) scan_interval: u64,
    /// Timeout of a single RPC request, in seconds.
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "TXPARSER_RPC_TIMEOUT"
    )]
    pub(crate) rpc_timeout: u64,
    /// Consecutive failed steps after which a scan cycle waits for the next tick.
    #[arg(long, default_value_t = DEFAULT_MAX_CONSECUTIVE_FAILURES, env = "TXPARSER_MAX_SCAN_FAILURES")]
    pub(crate) max_scan_failures: u32,
}

impl Cli {
    /// Runs the CLI.
    pub(crate) fn run(self) -> Result<()> {
        // Initialize the telemetry stack.
        self.init_stack()?;

        // Scan until exit or ctrl-c.
        let rt = Self::tokio_runtime()?;
        let result = rt.block_on(self.start());
        // A pending stdin read never completes on its own.
        rt.shutdown_background();
        result
    }

    /// Initializes the tracing stack and the Prometheus metrics recorder.
    fn init_stack(&self) -> Result<()> {
        self.log_args.init_tracing_subscriber(None)?;

        if let Some(addr) = self.metrics.init_metrics()? {
            Metrics::init();
            info!(target: "txparser", %addr, "Scanner metrics registered");
        }
        Ok(())
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }

    /// Returns the scanner configuration selected by the flags.
    pub(crate) fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig::default()
            .with_start_block(self.start_block)
            .with_scan_interval(Duration::from_secs(self.scan_interval))
            .with_max_consecutive_failures(self.max_scan_failures)
    }

    /// Starts scanning and serves the prompt until it exits or a shutdown signal arrives.
    async fn start(self) -> Result<()> {
        let client = AlloyChainClientBuilder::new(self.rpc_url.clone())
            .timeout(Duration::from_secs(self.rpc_timeout))
            .build()?;

        let config = self.scanner_config();
        let shutdown = CancellationToken::new();
        let service = TxParserService::new(client, config).with_parent_cancellation(&shutdown);

        info!(target: "txparser", rpc_url = %self.rpc_url, start_block = config.start_block, "Starting txparser");
        service.start_default();

        let signals = tokio::spawn(wait_for_shutdown(shutdown.clone()));
        let result = prompt::run(&service, tokio::io::stdin(), &shutdown).await;

        info!(target: "txparser", "Shutdown started");
        shutdown.cancel();
        service.stop().await;
        service.store().close();
        signals.abort();
        info!(target: "txparser", last_scanned = service.current_scan_position(), "Shutdown completed");

        result.map_err(Into::into)
    }
}

/// Cancels `shutdown` on ctrl-c or, on unix, SIGTERM.
async fn wait_for_shutdown(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(target: "txparser", %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = shutdown.cancelled() => return,
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!(target: "txparser", %err, "Failed to listen for ctrl-c");
                return;
            }
            info!(target: "txparser", "Received ctrl-c");
        }
        _ = terminate => info!(target: "txparser", "Received SIGTERM"),
    }
    shutdown.cancel();
}
