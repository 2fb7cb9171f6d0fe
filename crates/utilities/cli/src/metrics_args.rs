//! Prometheus metrics flags.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default port of the metrics server.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Configuration for the Prometheus metrics server.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Controls whether the Prometheus metrics server is started.
    #[arg(
        long = "metrics.enabled",
        global = true,
        default_value_t = false,
        env = "TXPARSER_METRICS_ENABLED"
    )]
    pub enabled: bool,

    /// Address the metrics server listens on.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value = "0.0.0.0",
        env = "TXPARSER_METRICS_ADDR"
    )]
    pub addr: IpAddr,

    /// Port the metrics server listens on.
    #[arg(
        long = "metrics.port",
        global = true,
        default_value_t = DEFAULT_METRICS_PORT,
        env = "TXPARSER_METRICS_PORT"
    )]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: DEFAULT_METRICS_PORT }
    }
}

impl MetricsArgs {
    /// Starts the metrics server if enabled.
    ///
    /// Returns the address the server is bound to, or `None` when metrics are disabled.
    pub fn init_metrics(&self) -> CliResult<Option<SocketAddr>> {
        if !self.enabled {
            return Ok(None);
        }
        init_prometheus_server(self.addr, self.port).map(Some).map_err(Into::into)
    }
}
