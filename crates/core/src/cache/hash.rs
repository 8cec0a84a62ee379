//! Cache key generation for validation results.

use sha2::{Digest, Sha256};

use crate::model::Depth;

/// Prefix shared by every validation cache key.
pub const CACHE_KEY_PREFIX: &str = "mailodds_";

/// Hex characters of the digest kept in the key.
const DIGEST_LEN: usize = 16;

/// Compute the cache key for an email/depth pair.
///
/// Case-insensitive in the email; distinct per depth.
pub fn cache_key(email: &str, depth: Depth) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.to_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(depth.as_str().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{CACHE_KEY_PREFIX}{}", &digest[..DIGEST_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = cache_key("user@example.com", Depth::Enhanced);
        let key2 = cache_key("user@example.com", Depth::Enhanced);
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_case_insensitive() {
        let lower = cache_key("user@example.com", Depth::Standard);
        let mixed = cache_key("User@Example.COM", Depth::Standard);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_key_different_depth() {
        let standard = cache_key("user@example.com", Depth::Standard);
        let enhanced = cache_key("user@example.com", Depth::Enhanced);
        assert_ne!(standard, enhanced);
    }

    #[test]
    fn test_key_format() {
        let key = cache_key("user@example.com", Depth::Enhanced);
        assert!(key.starts_with(CACHE_KEY_PREFIX));
        let digest = &key[CACHE_KEY_PREFIX.len()..];
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_matches_digest_formula() {
        let expected = hex::encode(Sha256::digest(b"user@example.com:enhanced"));
        assert_eq!(cache_key("USER@example.com", Depth::Enhanced), format!("mailodds_{}", &expected[..16]));
    }
}
