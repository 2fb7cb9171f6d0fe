//! Conversion from wire-format transactions to canonical [`Transaction`]s.

use crate::{RpcTransaction, Transaction};
use alloy_primitives::U256;

/// Decodes a hex quantity into a [`U256`].
///
/// An optional `0x`/`0X` prefix is stripped and the remaining digits are parsed as base 16.
/// Empty or malformed input (any non-hex digit, including signs and separators) decodes to
/// zero. Values are bounded by [`U256`]: a well-formed quantity wider than 256 bits also decodes
/// to zero rather than being truncated. Callers needing strict validation must check the raw
/// field themselves.
pub fn decode_quantity(raw: &str) -> U256 {
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return U256::ZERO;
    }
    U256::from_str_radix(digits, 16).unwrap_or(U256::ZERO)
}

/// Converts a wire-format [`RpcTransaction`] into the canonical [`Transaction`].
///
/// Pure and infallible; see [`decode_quantity`] for how numeric fields are decoded.
pub fn parse_transaction(tx: &RpcTransaction) -> Transaction {
    Transaction {
        chain_id: decode_quantity(&tx.chain_id),
        block_number: decode_quantity(&tx.block_number),
        hash: tx.hash.clone(),
        nonce: decode_quantity(&tx.nonce),
        from: tx.from.clone(),
        to: tx.to.clone(),
        value: decode_quantity(&tx.value),
        gas: decode_quantity(&tx.gas),
        gas_price: decode_quantity(&tx.gas_price),
        input: tx.input.clone(),
    }
}

/// Converts a batch of wire transactions, preserving their order.
pub fn parse_transactions(txs: &[RpcTransaction]) -> Vec<Transaction> {
    txs.iter().map(parse_transaction).collect()
}

impl From<&RpcTransaction> for Transaction {
    fn from(tx: &RpcTransaction) -> Self {
        parse_transaction(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::prefixed("0x2a", U256::from(42))]
    #[case::upper_prefix("0X2A", U256::from(42))]
    #[case::unprefixed("ff", U256::from(255))]
    #[case::leading_zeros("0x0000000001", U256::from(1))]
    #[case::zero("0x0", U256::ZERO)]
    #[case::one_ether("0xde0b6b3a7640000", U256::from(1_000_000_000_000_000_000u128))]
    #[case::max(
        "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        U256::MAX
    )]
    fn test_decode_quantity_valid(#[case] raw: &str, #[case] expected: U256) {
        assert_eq!(decode_quantity(raw), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::bare_prefix("0x")]
    #[case::not_hex("0xzz")]
    #[case::negative("-0x1")]
    #[case::signed_digits("0x-1")]
    #[case::underscore("0x1_000")]
    #[case::whitespace(" 0x1")]
    #[case::double_prefix("0x0x1")]
    #[case::overflow("0x1ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")]
    fn test_decode_quantity_malformed_is_zero(#[case] raw: &str) {
        assert_eq!(decode_quantity(raw), U256::ZERO);
    }

    #[test]
    fn test_decode_quantity_wider_than_u256_is_not_truncated() {
        let raw = format!("0x2{}1", "0".repeat(63));
        assert_eq!(raw.len(), 2 + 65);
        assert_eq!(decode_quantity(&raw), U256::ZERO);
        // The low 256 bits alone are one.
        assert_eq!(decode_quantity(&format!("0x{}", &raw[3..])), U256::from(1));
    }

    #[test]
    fn test_decode_quantity_exceeds_u64() {
        let value = decode_quantity("0x10000000000000000");
        assert_eq!(value, U256::from(u64::MAX) + U256::from(1));
    }

    #[test]
    fn test_parse_transaction_maps_every_field() {
        let wire = RpcTransaction {
            chain_id: "0x1".into(),
            block_number: "0x64".into(),
            hash: "0xabc".into(),
            nonce: "0x7".into(),
            from: "0xAA".into(),
            to: Some("0xBB".into()),
            value: "0x3e8".into(),
            gas: "0x5208".into(),
            gas_price: "bogus".into(),
            input: "0xa9059cbb".into(),
        };

        let tx = parse_transaction(&wire);
        assert_eq!(tx.chain_id, U256::from(1));
        assert_eq!(tx.block_number, U256::from(100));
        assert_eq!(tx.hash, "0xabc");
        assert_eq!(tx.nonce, U256::from(7));
        // Addresses are passed through unchanged, including their case.
        assert_eq!(tx.from, "0xAA");
        assert_eq!(tx.to.as_deref(), Some("0xBB"));
        assert_eq!(tx.value, U256::from(1000));
        assert_eq!(tx.gas, U256::from(21000));
        assert_eq!(tx.gas_price, U256::ZERO);
        assert_eq!(tx.input, "0xa9059cbb");
    }

    #[test]
    fn test_parse_transactions_preserves_order() {
        let wire: Vec<_> = (0..3)
            .map(|i| RpcTransaction { hash: format!("0x{i}"), ..Default::default() })
            .collect();
        let hashes: Vec<_> = parse_transactions(&wire).into_iter().map(|tx| tx.hash).collect();
        assert_eq!(hashes, vec!["0x0", "0x1", "0x2"]);
    }

    #[test]
    fn test_canonical_json_roundtrip() {
        let tx = parse_transaction(&RpcTransaction {
            value: "0xffffffffffffffffffffffff".into(),
            from: "0xaa".into(),
            ..Default::default()
        });
        let encoded = serde_json::to_vec(&tx).unwrap();
        let decoded: Transaction = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, tx);
    }
}
