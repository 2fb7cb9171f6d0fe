//! Types shared by the block scanner and its chain client adapters.
//!
//! - [`RpcBlock`] and [`RpcTransaction`] mirror the JSON-RPC wire format, where every numeric
//!   field is a hex quantity string.
//! - [`Transaction`] is the canonical record stored per subscribed address, with numeric fields
//!   decoded into [`U256`](alloy_primitives::U256).
//! - [`parse_transaction`] converts one into the other (see [`decode_quantity`] for the decoding
//!   policy).
//! - [`ChainClient`] is the contract the scanner consumes to read the remote block sequence.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod address;
pub use address::normalize_address;

mod client;
pub use client::{ChainClient, ChainClientError, ChainClientResult};

mod normalize;
pub use normalize::{decode_quantity, parse_transaction, parse_transactions};

mod transaction;
pub use transaction::Transaction;

mod wire;
pub use wire::{RpcBlock, RpcTransaction};
