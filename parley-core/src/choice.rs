//! Injectable random choice.
//!
//! Reply selection goes through a [`Chooser`] so tests can swap the random
//! source for a deterministic one and assert exact output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index in `0..len`.
pub trait Chooser {
    /// Return an index in `0..len`. Only called with `len > 0`.
    fn pick(&mut self, len: usize) -> usize;

    /// Pick one element of `items`, `None` when empty.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let idx = self.pick(items.len()).min(items.len() - 1);
        items.get(idx)
    }
}

/// Uniform random choice backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    /// Seed from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Chooser for RandomChooser {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the same position (clamped to the last element).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl Chooser for FixedChooser {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_chooser_clamps() {
        let items = ["a", "b", "c"];
        assert_eq!(FixedChooser(0).choose(&items), Some(&"a"));
        assert_eq!(FixedChooser(9).choose(&items), Some(&"c"));
        assert_eq!(FixedChooser(0).choose::<&str>(&[]), None);
    }

    #[test]
    fn seeded_chooser_is_reproducible_and_in_range() {
        let mut a = RandomChooser::seeded(7);
        let mut b = RandomChooser::seeded(7);
        for _ in 0..50 {
            let x = a.pick(5);
            assert!(x < 5);
            assert_eq!(x, b.pick(5));
        }
    }
}
