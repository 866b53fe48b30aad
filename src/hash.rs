use crate::constants::hashing::{FNV1A64_OFFSET, FNV1A64_PRIME};

/// FNV-1a 64 over explicitly framed bytes.
///
/// Unlike `std`'s `DefaultHasher`, the output is fixed across toolchains and
/// platforms, so values derived from it can be persisted.
#[derive(Clone, Copy, Debug)]
pub struct StableHasher {
    hash: u64,
}

impl StableHasher {
    pub fn new() -> Self {
        Self {
            hash: FNV1A64_OFFSET,
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash ^= u64::from(*byte);
            self.hash = self.hash.wrapping_mul(FNV1A64_PRIME);
        }
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Length-prefixed, so `("ab", "c")` and `("a", "bc")` hash differently.
    pub fn write_str(&mut self, value: &str) {
        self.write_u64(value.len() as u64);
        self.write_bytes(value.as_bytes());
    }

    pub fn finish(&self) -> u64 {
        self.hash
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stable_hash_with(f: impl FnOnce(&mut StableHasher)) -> u64 {
    let mut hasher = StableHasher::new();
    f(&mut hasher);
    hasher.finish()
}
