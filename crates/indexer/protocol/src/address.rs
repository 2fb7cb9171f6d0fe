/// Returns the canonical form of an account address used as a store key.
///
/// Addresses are compared case-insensitively on chain, so the canonical form is the trimmed,
/// lowercased string. An address that is blank after trimming normalizes to `None`.
pub fn normalize_address(address: &str) -> Option<String> {
    let trimmed = address.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_ascii_lowercase())
}
