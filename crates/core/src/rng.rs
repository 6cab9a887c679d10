//! RNG module - deterministic randomness for round setup and mole placement
//!
//! Everything random in a round (which items are drawn, which hole pops next,
//! the inter-mole jitter) goes through one seeded [`SimpleRng`], so the same
//! seed replays the same round. Tests rely on this.

use arrayvec::ArrayVec;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Low LCG bits have short periods; scale from the high bits instead.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick an index in `[0, len)` different from `previous`.
    ///
    /// Retries until the pick differs. With a single slot there is nothing
    /// else to pick, so slot 0 is returned.
    pub fn pick_other(&mut self, len: usize, previous: Option<usize>) -> usize {
        if len <= 1 {
            return 0;
        }
        loop {
            let index = self.next_range(len as u32) as usize;
            if Some(index) != previous {
                return index;
            }
        }
    }

    /// Draw up to `N` distinct entries from `pool`, uniformly without replacement.
    ///
    /// A pool smaller than `N` is returned whole (shuffled).
    pub fn sample<T: Copy, const N: usize>(&mut self, pool: &[T]) -> ArrayVec<T, N> {
        let mut indices: Vec<usize> = (0..pool.len()).collect();
        self.shuffle(&mut indices);
        indices.into_iter().take(N).map(|i| pool[i]).collect()
    }

    /// Get the current RNG state (for replaying from the same point)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        let v1 = rng1.next_u32();
        let v2 = rng2.next_u32();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(5) < 5);
        }
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.next_range(1), 0);
    }

    #[test]
    fn test_next_range_covers_all_values() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[rng.next_range(5) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_pick_other_never_repeats() {
        let mut rng = SimpleRng::new(3);
        let mut previous = None;
        for _ in 0..500 {
            let next = rng.pick_other(5, previous);
            assert!(next < 5);
            assert_ne!(Some(next), previous);
            previous = Some(next);
        }
    }

    #[test]
    fn test_pick_other_single_slot() {
        let mut rng = SimpleRng::new(3);
        assert_eq!(rng.pick_other(1, Some(0)), 0);
        assert_eq!(rng.pick_other(0, None), 0);
    }

    #[test]
    fn test_sample_is_distinct() {
        let mut rng = SimpleRng::new(42);
        let pool: Vec<u32> = (0..26).collect();
        let drawn: ArrayVec<u32, 5> = rng.sample(&pool);
        assert_eq!(drawn.len(), 5);
        let mut sorted = drawn.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
    }

    #[test]
    fn test_sample_small_pool_takes_all() {
        let mut rng = SimpleRng::new(42);
        let pool = [10u32, 20, 30];
        let drawn: ArrayVec<u32, 5> = rng.sample(&pool);
        assert_eq!(drawn.len(), 3);
        for v in pool {
            assert!(drawn.contains(&v));
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = SimpleRng::new(5);
        let mut v: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }
}
