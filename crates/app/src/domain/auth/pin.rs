//! PIN hashing

use pestitele::forms::Pin;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hex SHA-256 of the PIN, salted with the normalised phone so equal PINs of
/// different growers never share a hash.
pub fn hash_pin(phone: &str, pin: &Pin) -> String {
    format!(
        "{:x}",
        Sha256::digest(format!("{phone}:{}", pin.expose()).as_bytes())
    )
}

/// Compares a PIN against a stored hash in constant time. A grower without
/// a stored hash never matches.
pub fn pin_matches(phone: &str, pin: &Pin, stored: Option<&str>) -> bool {
    stored.is_some_and(|stored| {
        hash_pin(phone, pin)
            .as_bytes()
            .ct_eq(stored.as_bytes())
            .into()
    })
}
