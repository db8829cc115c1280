//! Systematic sampling.
//!
//! Picture the population laid out along a line, each element occupying a
//! segment as long as its weight, for a total length `W`. Systematic sampling
//! draws one offset `u ~ Uniform[0, 1)` and picks the elements under the
//! arrows at `(u + k) * W / S` for `k = 0..S`. The pass is O(n), needs a single
//! random number, and every element is expected to be picked `S * w / W` times.
//! This is the resampling step of many particle filters.
//!
//! Systematic sampling can perform very badly when weights follow a pattern
//! aligned with the step `W / S`. If that is a risk, sample a random
//! permutation of the population instead (see
//! [`crate::sample::permuted_systematic_sample`]).
//!
//! ## References
//!
//! - Douc, Cappé, Moulines (2005): *Comparison of resampling schemes for
//!   particle filtering*.
//! - Hol, Schön, Gustafsson (2006): *On resampling algorithms for particle
//!   filters*.

use num_traits::{cast, Float};

use crate::persistent::Select;
use crate::rng::RandomSource;

/// Extracts a sampling weight from an element.
///
/// Every `Fn(&T) -> W` is a weight accessor.
pub trait WeightAccessor<T: ?Sized, W> {
    /// Weight of `item`; must be non-negative.
    fn weight(&self, item: &T) -> W;
}

impl<T: ?Sized, W, F> WeightAccessor<T, W> for F
where
    F: Fn(&T) -> W,
{
    #[inline]
    fn weight(&self, item: &T) -> W {
        self(item)
    }
}

/// Gives every element weight 1.
///
/// Pair it with a population weight equal to the population size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitWeight;

impl<T: ?Sized, W: Float> WeightAccessor<T, W> for UnitWeight {
    #[inline]
    fn weight(&self, _item: &T) -> W {
        W::one()
    }
}

/// Uses the element itself as its weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityWeight;

impl<T, W> WeightAccessor<T, W> for IdentityWeight
where
    T: Copy + Into<W>,
{
    #[inline]
    fn weight(&self, item: &T) -> W {
        (*item).into()
    }
}

/// Systematic sampling predicate.
///
/// Feed it the population elements in order. It decides, element by element,
/// how often each one belongs to a sample of `sample_size` picks out of a
/// population of total weight `population_weight`.
///
/// `W` must be a floating point type.
#[derive(Debug, Clone)]
pub struct Systematic<W, A> {
    weight_of: A,
    sample_size: usize,
    population_weight: W,
    step: W,
    position: W,
}

impl<W: Float, A> Systematic<W, A> {
    /// Predicate with a caller-provided offset `uniform01` in `[0, 1)`.
    ///
    /// With identical arguments and the same element sequence, two predicates
    /// make identical decisions.
    ///
    /// `population_weight` must be positive when `sample_size > 0`. Otherwise
    /// the predicate logs a warning and picks nothing.
    pub fn new(sample_size: usize, population_weight: W, uniform01: W, weight_of: A) -> Self {
        let step = if sample_size == 0 {
            W::zero()
        } else {
            population_weight / cast::<usize, W>(sample_size).unwrap_or_else(W::infinity)
        };

        if sample_size > 0 && !(step > W::zero()) {
            log::warn!(
                "systematic sampling of {sample_size} elements needs a positive population \
                 weight; nothing will be picked"
            );
        }

        Self {
            weight_of,
            sample_size,
            population_weight,
            step,
            position: uniform01 * step,
        }
    }

    /// Predicate whose offset is drawn from `rng`.
    pub fn with_rng<R>(sample_size: usize, population_weight: W, weight_of: A, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let uniform01 = cast::<f64, W>(rng.uniform_01()).unwrap_or_else(W::zero);
        Self::new(sample_size, population_weight, uniform01, weight_of)
    }

    /// Predicate whose offset is drawn from the thread-local generator.
    pub fn with_thread_rng(sample_size: usize, population_weight: W, weight_of: A) -> Self {
        let mut rng = rand::rng();
        Self::with_rng(sample_size, population_weight, weight_of, &mut rng)
    }

    /// Requested number of picks.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Total weight the predicate was built for.
    pub fn population_weight(&self) -> W {
        self.population_weight
    }

    /// Distance between two arrows, `W / S` (0 when `S == 0`).
    pub fn step(&self) -> W {
        self.step
    }

    /// Distance from the start of the next element to the next arrow.
    pub fn position(&self) -> W {
        self.position
    }

    /// The weight accessor.
    pub fn weight_accessor(&self) -> &A {
        &self.weight_of
    }

    #[inline]
    fn active(&self) -> bool {
        self.sample_size > 0 && self.step > W::zero()
    }

    /// Single decision step.
    ///
    /// If the next arrow falls inside `item`, returns `true` and moves to the
    /// following arrow. In that case `item` must be offered again, because it
    /// may hold several arrows. Otherwise returns `false` and moves past
    /// `item`.
    ///
    /// An element much heavier than the population weight (or infinite) is
    /// accepted about `weight / step` times (or forever); each call does O(1)
    /// work, so the caller decides when to stop.
    #[inline]
    pub fn accepts<T: ?Sized>(&mut self, item: &T) -> bool
    where
        A: WeightAccessor<T, W>,
    {
        if !self.active() {
            return false;
        }
        let weight = self.weight_of.weight(item);
        if self.position < weight {
            self.position = self.position + self.step;
            true
        } else {
            self.position = self.position - weight;
            false
        }
    }
}

impl<T: ?Sized, W, A> Select<T> for Systematic<W, A>
where
    W: Float,
    A: WeightAccessor<T, W>,
{
    #[inline]
    fn select(&mut self, item: &T) -> bool {
        self.accepts(item)
    }

    #[inline]
    fn select_again(&mut self, item: &T) -> bool {
        self.accepts(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Picks of `item`: offers it until it is rejected.
    fn copies<T, A>(p: &mut Systematic<f64, A>, item: &T) -> usize
    where
        A: WeightAccessor<T, f64>,
    {
        let mut copies = 0;
        while p.accepts(item) {
            copies += 1;
        }
        copies
    }

    fn total_picks<A>(mut p: Systematic<f64, A>, weights: &[f64]) -> usize
    where
        A: WeightAccessor<f64, f64>,
    {
        weights.iter().map(|w| copies(&mut p, w)).sum()
    }

    #[test]
    fn zero_sample_size_rejects_everything() {
        let mut p = Systematic::new(0, 1.0, 0.5, IdentityWeight);
        assert_eq!(p.step(), 0.0);
        for w in [0.1, 0.5, 2.0] {
            assert!(!p.accepts(&w));
            assert!(!p.select(&w));
        }
    }

    #[test]
    fn non_positive_population_weight_picks_nothing() {
        for population_weight in [0.0, -1.0, f64::NAN] {
            let mut p = Systematic::new(3, population_weight, 0.5, IdentityWeight);
            assert_eq!(copies(&mut p, &1.0), 0);
            assert_eq!(copies(&mut p, &f64::INFINITY), 0);
        }
    }

    #[test]
    fn single_accept_moves_by_step_minus_weight() {
        // step = 0.25, position starts at 0.1
        let mut p = Systematic::new(4, 1.0, 0.4, IdentityWeight);
        assert_eq!(p.step(), 0.25);
        let start = p.position();
        assert_eq!(copies(&mut p, &0.2), 1);
        assert_eq!(p.position(), start + 0.25 - 0.2);
    }

    #[test]
    fn rejection_consumes_weight() {
        let mut p = Systematic::new(2, 1.0, 0.9, IdentityWeight);
        // position = 0.45
        assert!(!p.accepts(&0.3));
        assert!((p.position() - 0.15).abs() < 1e-12);
        assert!(p.accepts(&0.3));
    }

    #[test]
    fn select_follows_the_raw_rule() {
        let weights = [0.05, 0.6, 0.05, 0.3];
        let mut by_select = Systematic::new(7, 1.0, 0.3, IdentityWeight);
        let mut by_accepts = by_select.clone();

        for w in &weights {
            let mut picked = by_select.select(w);
            assert_eq!(picked, by_accepts.accepts(w));
            while picked {
                picked = by_select.select_again(w);
                assert_eq!(picked, by_accepts.accepts(w));
            }
            assert_eq!(by_select.position(), by_accepts.position());
        }
    }

    #[test]
    fn infinite_weight_is_picked_one_step_at_a_time() {
        let mut p = Systematic::new(3, 1.0, 0.5, IdentityWeight);
        let heavy = f64::INFINITY;
        assert!(p.select(&heavy));
        for _ in 0..1_000 {
            assert!(p.select_again(&heavy));
        }
    }

    #[test]
    fn exact_sample_size_for_exact_weights() {
        let weights: Vec<f64> = (1..=40).map(f64::from).collect();
        let total: f64 = weights.iter().sum();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for sample_size in [1, 5, 13, 40, 100] {
            let p = Systematic::with_rng(sample_size, total, IdentityWeight, &mut rng);
            assert_eq!(total_picks(p, &weights), sample_size);
        }
    }

    #[test]
    fn heavy_elements_are_picked_repeatedly() {
        let weights = [8.0, 1.0, 1.0];
        let mut p = Systematic::new(10, 10.0, 0.5, IdentityWeight);
        assert_eq!(copies(&mut p, &weights[0]), 8);
        assert_eq!(copies(&mut p, &weights[1]) + copies(&mut p, &weights[2]), 2);
    }

    #[test]
    fn decisions_are_deterministic() {
        let weights: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64 + 0.5).collect();
        let total: f64 = weights.iter().sum();
        let decide = || {
            let mut p = Systematic::new(17, total, 0.3141, |w: &f64| *w);
            let mut trail = Vec::new();
            for w in &weights {
                while p.accepts(w) {
                    trail.push(true);
                }
                trail.push(false);
            }
            trail
        };
        assert_eq!(decide(), decide());
    }

    #[test]
    fn unit_weights_with_f32() {
        let items = ["a", "b", "c", "d", "e", "f"];
        let mut p = Systematic::<f32, _>::new(3, 6.0, 0.5, UnitWeight);
        let picked: Vec<&str> = items
            .iter()
            .filter(|item| {
                let mut picks = 0;
                while p.accepts(*item) {
                    picks += 1;
                }
                picks > 0
            })
            .copied()
            .collect();
        // step 2, arrows at 1, 3, 5
        assert_eq!(picked, vec!["b", "d", "f"]);
    }
}
