//! The interactive prompt.

use crate::commands::{Command, HELP};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;
use txscan_protocol::ChainClient;
use txscan_service::TxParserService;
use txscan_storage::KeyValueStore;

/// Whether the prompt keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the prompt.
    Exit,
}

/// Runs `line` against `service`, writing the result to `out`.
pub(crate) fn execute<C, S, W>(
    service: &TxParserService<C, S>,
    line: &str,
    out: &mut W,
) -> io::Result<Flow>
where
    C: ChainClient + 'static,
    S: KeyValueStore + 'static,
    W: Write,
{
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(err) => {
            writeln!(out, "{err}\n{HELP}")?;
            return Ok(Flow::Continue);
        }
    };

    match command {
        Command::Empty => {}
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Exit => return Ok(Flow::Exit),
        Command::Stats => writeln!(out, "Current block: {}", service.current_scan_position())?,
        Command::Subscribe(address) => {
            if service.subscribe(&address) {
                writeln!(out, "Address [{address}] subscribed successfully")?;
            } else {
                writeln!(out, "Failed to subscribe address [{address}]")?;
            }
        }
        Command::Transactions(address) => {
            let txs = service.transactions_for(&address);
            writeln!(out, "Transactions ({}):", txs.len())?;
            for tx in txs {
                match serde_json::to_string(&tx) {
                    Ok(json) => writeln!(out, "{json}")?,
                    Err(err) => writeln!(out, "<unprintable transaction {}: {err}>", tx.hash)?,
                }
            }
        }
    }

    Ok(Flow::Continue)
}

/// Reads commands from `input` until `exit`, end of input or cancellation.
pub(crate) async fn run<C, S, R>(
    service: &TxParserService<C, S>,
    input: R,
    cancellation: &CancellationToken,
) -> io::Result<()>
where
    C: ChainClient + 'static,
    S: KeyValueStore + 'static,
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    loop {
        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        let line = tokio::select! {
            biased;

            _ = cancellation.cancelled() => return Ok(()),
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::debug!(target: "prompt", "End of input");
            return Ok(());
        };

        if execute(service, &line, &mut io::stdout().lock())? == Flow::Exit {
            return Ok(());
        }
    }
}
