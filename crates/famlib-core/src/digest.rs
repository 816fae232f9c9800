//! Content digests
//!
//! Identity of an artifact is the SHA-256 of its canonical bytes, encoded as
//! 64 lowercase hex characters.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 of `bytes`
///
/// ```
/// use famlib_core::digest::digest;
///
/// assert_eq!(
///     digest(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Whether `candidate` looks like a digest produced by [`digest`]
///
/// Case-insensitive: callers holding uppercase hashes are normalized with
/// [`normalize_digest`] before comparison.
pub fn is_hex_digest(candidate: &str) -> bool {
    candidate.len() == DIGEST_HEX_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether `candidate` is non-empty hex of any length
///
/// Looser than [`is_hex_digest`]: older clients may hold truncated or
/// pre-SHA-256 hashes, which must still reach lookup.
pub fn is_hex(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn normalize_digest(candidate: &str) -> String {
    candidate.trim().to_ascii_lowercase()
}
