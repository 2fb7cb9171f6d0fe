//! Commands accepted by the interactive prompt.

use std::str::FromStr;
use thiserror::Error;

/// Usage text printed by `help` and after an invalid command.
pub(crate) const HELP: &str = "\
Commands:
  subscribe <address>      track transactions sent or received by <address>
  transactions <address>   print the transactions recorded for <address>
  stats                    print the last scanned block
  help                     print this message
  exit                     stop scanning and quit";

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Subscribe an address.
    Subscribe(String),
    /// Print the history of an address.
    Transactions(String),
    /// Print the scan position.
    Stats,
    /// Print usage.
    Help,
    /// Quit.
    Exit,
    /// A blank line.
    Empty,
}

/// An error parsing a prompt line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CommandError {
    /// The command is not known.
    #[error("unknown command: {0}")]
    Unknown(String),
    /// The command needs an address.
    #[error("{0} requires an address")]
    MissingAddress(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Empty);
        };
        let address = words.next().map(str::to_string);

        match name {
            "subscribe" => address.map(Self::Subscribe).ok_or(CommandError::MissingAddress("subscribe")),
            "transactions" => {
                address.map(Self::Transactions).ok_or(CommandError::MissingAddress("transactions"))
            }
            "stats" => Ok(Self::Stats),
            "help" => Ok(Self::Help),
            "exit" | "quit" => Ok(Self::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
