use rand::{rngs::StdRng, SeedableRng};

/// Independent generator for the `seq`-th dart of a seeded session, so any
/// dart replays without replaying the ones before it.
pub fn dart_rng(seed: u64, seq: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ seq.wrapping_mul(7919))
}
