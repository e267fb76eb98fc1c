//! Cryptographic utilities for admin API key hashing.

use sha2::{Digest, Sha256};

/// Prefix carried by every admin API key.
pub const API_KEY_PREFIX: &str = "ra_";

/// Minimum number of characters after the prefix.
const MIN_KEY_BODY_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true if the key has the admin prefix and a long enough body.
pub fn is_well_formed_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.len() >= API_KEY_PREFIX.len() + MIN_KEY_BODY_LEN
}

/// Extracts the display prefix from an API key (first 8 characters after "ra_").
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if is_well_formed_key(key) {
        let start = API_KEY_PREFIX.len();
        key.get(start..start + MIN_KEY_BODY_LEN)
    } else {
        None
    }
}
