//! Address shape checks performed at the HTTP boundary.
//!
//! Addresses are opaque strings to the repositories; nothing here touches
//! the chain.

/// Normalizes an address for lookups keyed on user addresses.
pub fn normalize(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// Loose check used by the restaker endpoint: only the `0x` prefix.
pub fn has_hex_prefix(address: &str) -> bool {
    address.starts_with("0x") && address.len() > 2
}

/// Strict check: `0x` followed by exactly 40 hex digits.
pub fn is_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(body) => body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
