//! Random source abstraction shared by every generator.
//!
//! Generators only ever need a uniformly distributed index into an alphabet,
//! so the seam is a single method. Every [`rand::Rng`] implements it, which
//! lets callers pass a seeded `ChaCha8Rng` directly.

use rand::Rng;

/// A source of uniformly distributed indices.
///
/// One source is shared across a whole resolution pass; each call consumes
/// exactly one draw.
pub trait RandomSource {
    /// Returns an index in `0..bound`.
    ///
    /// Callers never pass a `bound` of zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn indices_stay_within_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(1337);
        for _ in 0..1_000 {
            assert!(rng.next_index(7) < 7);
        }
    }

    #[test]
    fn identical_seeds_produce_identical_indices() {
        let mut first = ChaCha8Rng::seed_from_u64(42);
        let mut second = ChaCha8Rng::seed_from_u64(42);

        let a: Vec<usize> = (0..32).map(|_| first.next_index(62)).collect();
        let b: Vec<usize> = (0..32).map(|_| second.next_index(62)).collect();

        assert_eq!(a, b);
    }
}
