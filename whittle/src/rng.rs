//! Seeded random sources.
//!
//! Every property run draws from a single [`StdRng`]. Recording its seed is
//! enough to replay the run: the same seed and the same generators produce
//! the same samples.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Create a deterministic RNG from a seed
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw a fresh seed from the operating system
pub fn fresh_seed() -> u64 {
    StdRng::from_entropy().next_u64()
}

/// Create the RNG for a run, returning it with the seed actually used
pub fn create_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(fresh_seed);
    (seeded_rng(seed), seed)
}
