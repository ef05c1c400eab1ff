//! Bearer token generation and hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate an opaque bearer token (256 random bits, hex encoded).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// SHA-256 hex digest stored in place of the raw token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_generate_token_carries_32_bytes() {
        let bytes = hex::decode(generate_token()).expect("token should be hex");
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("sourdough"), hash_token("sourdough"));
        assert_ne!(hash_token("sourdough"), hash_token("rye"));
        assert_eq!(
            hash_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
