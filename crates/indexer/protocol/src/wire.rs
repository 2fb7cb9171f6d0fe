use serde::{Deserialize, Serialize};

/// A block as returned by `eth_getBlockByNumber` with full transaction objects.
///
/// Only the fields the scanner consumes are kept; everything else in the response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    /// The block number as a hex quantity.
    #[serde(default)]
    pub number: String,
    /// The block hash.
    #[serde(default)]
    pub hash: String,
    /// The transactions included in the block, in block order.
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

/// A transaction in JSON-RPC wire format.
///
/// Numeric fields are hex quantity strings, optionally `0x` prefixed. Fields missing from the
/// response deserialize as empty strings, which normalize to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// The chain id. Absent for legacy pre-EIP-155 transactions.
    #[serde(default)]
    pub chain_id: String,
    /// Number of the block that includes this transaction.
    #[serde(default)]
    pub block_number: String,
    /// The transaction hash.
    #[serde(default)]
    pub hash: String,
    /// The sender nonce.
    #[serde(default)]
    pub nonce: String,
    /// The sender address.
    #[serde(default)]
    pub from: String,
    /// The recipient address. `None` for contract creations.
    #[serde(default)]
    pub to: Option<String>,
    /// Value transferred, in wei.
    #[serde(default)]
    pub value: String,
    /// Gas limit.
    #[serde(default)]
    pub gas: String,
    /// Gas price, in wei.
    #[serde(default)]
    pub gas_price: String,
    /// Call data.
    #[serde(default)]
    pub input: String,
}
