use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// The canonical transaction record tracked for subscribed addresses.
///
/// Produced by [`crate::parse_transaction`]; numeric fields are decoded quantities while hashes,
/// addresses and call data are carried through unchanged from the wire record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The chain id, zero when the wire record carried none.
    pub chain_id: U256,
    /// Number of the block that includes this transaction.
    pub block_number: U256,
    /// The transaction hash.
    pub hash: String,
    /// The sender nonce.
    pub nonce: U256,
    /// The sender address.
    pub from: String,
    /// The recipient address, `None` for contract creations.
    pub to: Option<String>,
    /// Value transferred, in wei.
    pub value: U256,
    /// Gas limit.
    pub gas: U256,
    /// Gas price, in wei.
    pub gas_price: U256,
    /// Call data.
    pub input: String,
}
