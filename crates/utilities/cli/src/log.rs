//! Logging flags and the global tracing subscriber.

use crate::CliResult;
use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Logging arguments.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. Repeat for more output: `-v` for debug, `-vv` for trace.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub v: u8,
    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "v")]
    pub quiet: bool,
}

impl LogArgs {
    /// Returns the default level selected by these flags: warn when quiet, otherwise info,
    /// then debug and trace for each `-v`.
    pub const fn level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.v {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Installs the global tracing subscriber for these flags.
    ///
    /// Without an explicit `env_filter`, directives are read from `RUST_LOG` on top of
    /// [`LogArgs::level`]. Logs are written to stderr.
    pub fn init_tracing_subscriber(&self, env_filter: Option<EnvFilter>) -> CliResult<()> {
        let filter = env_filter.unwrap_or_else(|| {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(self.level()).into())
                .from_env_lossy()
        });

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}
