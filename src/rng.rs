//! Random sources.
//!
//! The builders only need two draws: an integer in `[0, n)` (shuffling) and a
//! real in `[0, 1)` (the systematic sampling offset). Anything implementing
//! [`rand::Rng`] provides both.
//!
//! Notes:
//! - Entry points without a `_with_rng` suffix use `rand::rng()`, a
//!   thread-local generator seeded once per thread. They are convenient but not
//!   reproducible across processes.
//! - Pass your own seeded generator (e.g. `rand_chacha::ChaCha8Rng`) to the
//!   `*_with_rng` variants when determinism matters.

use rand::Rng;

/// Capability required by the builders: uniform integers and uniform reals.
pub trait RandomSource {
    /// Returns an integer in `[0, n)`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `n == 0`.
    fn uniform_int(&mut self, n: usize) -> usize;

    /// Returns a real in `[0, 1)`.
    fn uniform_01(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform_int(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }

    #[inline]
    fn uniform_01(&mut self) -> f64 {
        self.random::<f64>()
    }
}
