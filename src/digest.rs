// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! SHA-256 helpers shared by the upper layers for content addressing.

use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest in bytes.
pub const SHA256_BLOCK_SIZE: usize = 32;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; SHA256_BLOCK_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data`, rendered as lower-case hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Incremental SHA-256 over multiple updates.
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Starts a new digest computation.
    pub fn new() -> Self {
        Self { inner: Sha256::new() }
    }

    /// Feeds `data` into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Completes the computation.
    pub fn finalize(self) -> [u8; SHA256_BLOCK_SIZE] {
        self.inner.finalize().into()
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sha256_hex(b"")
        );
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"abc");
        hasher.update(b"def");
        assert_eq!(sha256(b"abcdef"), hasher.finalize());
    }
}
