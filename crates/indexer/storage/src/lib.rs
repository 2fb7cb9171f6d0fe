//! Volatile, concurrent multi-value storage used to track subscribed addresses and the
//! transaction records observed for them.
//!
//! Every key maps to an ordered sequence of opaque byte records. Writes are additive: a
//! [`KeyValueStore::put`] appends to whatever the key already holds, and an empty write
//! materializes the key without recording anything. Closing a store is terminal; every
//! later access fails with [`StorageError::Unavailable`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod error;
pub use error::{StorageError, StorageResult};

mod traits;
pub use traits::KeyValueStore;

mod memory;
pub use memory::InMemoryDatabase;
