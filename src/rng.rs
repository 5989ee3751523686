//! Injectable, seedable randomness.
//!
//! The solver never reaches for `rand::thread_rng()` directly; every
//! stochastic operation takes a `&mut SolverRng` so a whole solve (or a
//! single candidate, for parallel construction) can be pinned to a seed and
//! reproduced exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Wraps a `SmallRng` so solver code has one type to thread through instead
/// of a generic `R: Rng` bound everywhere.
#[derive(Clone)]
pub struct SolverRng(SmallRng);

impl SolverRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// A non-reproducible RNG, seeded from the OS.
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }

    /// Derives an independent child RNG for a parallel task (e.g. one
    /// population member under construction). Each child is deterministic
    /// given the parent's state and the task index, so a fixed top-level
    /// seed still yields reproducible per-task streams.
    pub fn fork(&mut self, task_index: u64) -> Self {
        let mixed = self.0.gen::<u64>() ^ task_index.wrapping_mul(0x9E3779B97F4A7C15);
        Self::from_seed(mixed)
    }

    pub fn inner(&mut self) -> &mut impl Rng {
        &mut self.0
    }

    pub fn gen_range(&mut self, range: std::ops::Range<usize>) -> usize {
        self.0.gen_range(range)
    }

    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
