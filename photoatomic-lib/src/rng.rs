// Per-history random number stream: PCG-LCG with an RXS-M-XS output
// permutation. One 64-bit word of state, so every particle can carry its own.

use rand::{RngCore, SeedableRng};

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;
/// Stride between the streams of consecutive histories
const PRN_STRIDE: u64 = 152917;

/// Fast per-particle RNG.
///
/// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast Space-Efficient
/// Statistically Good Algorithms for Random Number Generation"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FastRng {
    seed: u64,
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Stream for history `id` of a run seeded with `seed`, obtained by
    /// skipping ahead `id * PRN_STRIDE` draws.
    pub fn for_history(seed: u64, id: u64) -> Self {
        let mut rng = Self::new(seed);
        rng.skip(id.wrapping_mul(PRN_STRIDE));
        rng
    }

    /// Advance the LCG by `n` steps in O(log n).
    pub fn skip(&mut self, mut n: u64) {
        let mut g = PRN_MULT;
        let mut c = PRN_ADD;
        let mut g_new: u64 = 1;
        let mut c_new: u64 = 0;
        while n > 0 {
            if n & 1 == 1 {
                g_new = g_new.wrapping_mul(g);
                c_new = c_new.wrapping_mul(g).wrapping_add(c);
            }
            c = g.wrapping_add(1).wrapping_mul(c);
            g = g.wrapping_mul(g);
            n >>= 1;
        }
        self.seed = g_new.wrapping_mul(self.seed).wrapping_add(c_new);
    }

    #[inline(always)]
    fn next_word(&mut self) -> u64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);
        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    /// Uniform f64 in [0, 1)
    #[inline(always)]
    pub fn prn(&mut self) -> f64 {
        (self.next_word() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.next_word() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.next_word()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }
}
