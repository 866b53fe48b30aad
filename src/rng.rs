//! Seedable RNG with a fixed, documented output sequence.
//!
//! Splits must reproduce the exact same draws across processes and dependency
//! upgrades, so they run on this small splitmix64 generator and draw indices
//! with [`floyd_sample`], which only consumes `next_u64`. Seeded pair
//! construction uses the same generator but samples through `rand`'s
//! sequence helpers, so it is reproducible for a given `rand` release.

use rand::RngCore;

/// Small deterministic RNG used for reproducible splits and pair subsampling.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Current internal state; `DeterministicRng::new(state)` resumes the sequence.
    pub fn state(&self) -> u64 {
        self.state
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Draw `amount` distinct indices from `0..total` with Floyd's algorithm.
///
/// Only `next_u64` is consumed and bounding is a widening multiply, so the
/// result depends on nothing but the generator's stream. `amount` is clamped
/// to `total`; the returned order is unspecified.
pub fn floyd_sample<R>(rng: &mut R, total: usize, amount: usize) -> Vec<usize>
where
    R: RngCore + ?Sized,
{
    let amount = amount.min(total);
    let mut taken = vec![false; total];
    let mut picked = Vec::with_capacity(amount);
    for upper in (total - amount)..total {
        let candidate = bounded_index(rng, upper + 1);
        let pick = if taken[candidate] { upper } else { candidate };
        taken[pick] = true;
        picked.push(pick);
    }
    picked
}

fn bounded_index<R>(rng: &mut R, bound: usize) -> usize
where
    R: RngCore + ?Sized,
{
    ((u128::from(rng.next_u64()) * bound as u128) >> 64) as usize
}
