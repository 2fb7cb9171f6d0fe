#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod chain_client;
pub use chain_client::{AlloyChainClient, AlloyChainClientBuilder, DEFAULT_RPC_TIMEOUT, block_tag};
