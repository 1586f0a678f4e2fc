//! The default key hash: a polynomial rolling hash over the key's bytes.
//!
//! `hash = hash * 65599 + byte`, left to right, in wrapping `u64`
//! arithmetic. Fast and well spread over identifier-like keys, but not
//! resistant to adversarially chosen keys.

use core::hash::{BuildHasher, Hasher};

/// Multiplier of the rolling hash.
pub const HASH_MULTIPLIER: u64 = 65599;

/// Streaming form of the rolling hash.
#[derive(Copy, Clone, Debug, Default)]
pub struct RollingHasher {
    hash: u64,
}

impl Hasher for RollingHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = self
                .hash
                .wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(u64::from(b));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

/// `BuildHasher` for [`RollingHasher`]; the default hasher of
/// [`HashSymTable`](crate::HashSymTable).
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildRollingHasher;

impl BuildHasher for BuildRollingHasher {
    type Hasher = RollingHasher;

    fn build_hasher(&self) -> Self::Hasher {
        RollingHasher::default()
    }
}

/// Rolling hash of `key`, before reduction to a bucket index.
pub fn rolling_hash(key: &str) -> u64 {
    let mut h = RollingHasher::default();
    h.write(key.as_bytes());
    h.finish()
}
