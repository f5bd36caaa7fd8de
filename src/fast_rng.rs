// PCG-LCG random engine with per-event streams.
//
// Every event draws from its own stream, obtained by skipping the master LCG
// ahead by `event_id * STREAM_STRIDE` steps. Event results therefore depend
// only on (master seed, event id), not on how many draws earlier events made.

use rand::{RngCore, SeedableRng};

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;
/// PCG output multiplier (RXS-M-XS)
const PRN_OUT_MULT: u64 = 12605985483714917081;
/// LCG steps reserved per event stream
pub const STREAM_STRIDE: u64 = 152_917;

/// PCG random engine used for primary generation and the fast optical model.
///
/// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast Space-Efficient
/// Statistically Good Algorithms for Random Number Generation"
#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    state: u64,
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Stream for one event of a run seeded with `master_seed`.
    pub fn for_event(master_seed: u64, event_id: u64) -> Self {
        Self::new(skip_ahead(event_id.wrapping_mul(STREAM_STRIDE), master_seed))
    }

    /// Uniform f64 in [0, 1)
    #[inline(always)]
    pub fn uniform(&mut self) -> f64 {
        // top 53 bits, exact in f64
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed;
    }
}

/// LCG state after `n` steps from `seed`, in O(log n).
fn skip_ahead(mut n: u64, seed: u64) -> u64 {
    let mut g = PRN_MULT;
    let mut c = PRN_ADD;
    let mut g_new = 1u64;
    let mut c_new = 0u64;
    while n > 0 {
        if n & 1 == 1 {
            g_new = g_new.wrapping_mul(g);
            c_new = c_new.wrapping_mul(g).wrapping_add(c);
        }
        c = g.wrapping_add(1).wrapping_mul(c);
        g = g.wrapping_mul(g);
        n >>= 1;
    }
    g_new.wrapping_mul(seed).wrapping_add(c_new)
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.state = PRN_MULT.wrapping_mul(self.state).wrapping_add(PRN_ADD);
        let word = ((self.state >> ((self.state >> 59) + 5)) ^ self.state)
            .wrapping_mul(PRN_OUT_MULT);
        (word >> 43) ^ word
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rest = chunks.into_remainder();
        if !rest.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            rest.copy_from_slice(&bytes[..rest.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
