//! Test helpers: an in-memory [`ChainClient`] with a controllable head and injectable failures.

use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};
use txscan_protocol::{ChainClient, ChainClientError, ChainClientResult, RpcBlock, RpcTransaction};

/// Builds a wire transfer of one wei from `from` to `to` in block `block`.
pub fn transfer(block: u64, hash: &str, from: &str, to: &str) -> RpcTransaction {
    RpcTransaction {
        chain_id: "0x1".to_string(),
        block_number: format!("0x{block:x}"),
        hash: hash.to_string(),
        nonce: "0x0".to_string(),
        from: from.to_string(),
        to: Some(to.to_string()),
        value: "0x1".to_string(),
        gas: "0x5208".to_string(),
        gas_price: "0x3b9aca00".to_string(),
        input: "0x".to_string(),
    }
}

#[derive(Debug, Default)]
struct FakeChainState {
    head: u64,
    blocks: HashMap<u64, RpcBlock>,
    failing_blocks: HashSet<u64>,
    head_failures: u32,
    fetched: Vec<u64>,
}

/// A [`ChainClient`] backed by an in-memory block map.
///
/// Every index up to the head exists; indexes without an inserted block are empty blocks.
#[derive(Debug, Default)]
pub struct FakeChain {
    state: Mutex<FakeChainState>,
}

impl FakeChain {
    /// Creates a chain whose head is `head`.
    pub fn new(head: u64) -> Self {
        Self { state: Mutex::new(FakeChainState { head, ..Default::default() }) }
    }

    /// Moves the head to `head`.
    pub fn set_head(&self, head: u64) {
        self.state.lock().unwrap().head = head;
    }

    /// Stores a block at `index` with the given transactions.
    pub fn insert_block(&self, index: u64, transactions: Vec<RpcTransaction>) {
        let block = RpcBlock {
            number: format!("0x{index:x}"),
            hash: format!("0x{index:064x}"),
            transactions,
        };
        self.state.lock().unwrap().blocks.insert(index, block);
    }

    /// Makes every fetch of block `index` fail until [`FakeChain::heal_block`] is called.
    pub fn fail_block(&self, index: u64) {
        self.state.lock().unwrap().failing_blocks.insert(index);
    }

    /// Undoes [`FakeChain::fail_block`].
    pub fn heal_block(&self, index: u64) {
        self.state.lock().unwrap().failing_blocks.remove(&index);
    }

    /// Makes the next `count` head queries fail.
    pub fn fail_head(&self, count: u32) {
        self.state.lock().unwrap().head_failures = count;
    }

    /// Returns every index passed to a successful or failed block fetch, in call order.
    pub fn fetched(&self) -> Vec<u64> {
        self.state.lock().unwrap().fetched.clone()
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn head_index(&self) -> ChainClientResult<u64> {
        let mut state = self.state.lock().unwrap();
        if state.head_failures > 0 {
            state.head_failures -= 1;
            return Err(ChainClientError::Transport("head query failed".to_string()));
        }
        Ok(state.head)
    }

    async fn block_by_index(&self, index: u64) -> ChainClientResult<RpcBlock> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(index);
        if state.failing_blocks.contains(&index) {
            return Err(ChainClientError::Transport(format!("block {index} unavailable")));
        }
        if index > state.head {
            return Err(ChainClientError::BlockNotFound(index));
        }
        Ok(state.blocks.get(&index).cloned().unwrap_or_else(|| RpcBlock {
            number: format!("0x{index:x}"),
            ..Default::default()
        }))
    }
}
