//! Question fingerprints for exact-match cache lookup.
//!
//! A fingerprint is the SHA-256 digest of the normalized question, rendered as 64 lowercase
//! hex chars, so records written by earlier deployments keep hitting the fast path.
//! Normalization lower-cases, drops everything except `a-z`, `0-9` and the space character,
//! then trims the ends. Interior runs of spaces are kept as-is.

use sha2::{Digest, Sha256};

/// Normalizes a question for fingerprinting.
pub fn normalize_question(question: &str) -> String {
    question
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Hashes the normalized question to a 32-byte SHA-256 digest.
#[inline]
pub fn hash_question(question: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(normalize_question(question).as_bytes());
    hasher.finalize().into()
}

/// Returns the hex fingerprint used as the exact-match cache key.
#[inline]
pub fn question_fingerprint(question: &str) -> String {
    hex::encode(hash_question(question))
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for feature hashing in the stub embedder. Not suitable for security.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
