//! `junban`: reorder iterators and systematic sampling.
//!
//! Walk an existing population in a different order, or through a weighted
//! subset, without copying or mutating it.
//!
//! Exposed modules:
//! - `permutation`: identity, random, sorted and custom orders over a population.
//! - `reorder`: the iterator that walks such an order.
//! - `systematic`: the systematic sampling predicate (particle filter resampling).
//! - `persistent`: a filtering iterator whose predicate sees each element once.
//! - `sample`: systematic samples, optionally over a random permutation.
//!
//! ```
//! use junban::{permutation, systematic_sample, IdentityWeight};
//!
//! let particles: [f64; 4] = [0.1, 0.4, 0.2, 0.3];
//!
//! let heaviest: Vec<f64> = permutation::sorted_by(&particles, Some(2), |a, b| b.total_cmp(a))
//!     .unwrap()
//!     .copied()
//!     .collect();
//! assert_eq!(heaviest, vec![0.4, 0.3]);
//!
//! let resampled = systematic_sample(&particles, 8, 1.0, IdentityWeight);
//! assert_eq!(resampled.count(), 8);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod permutation;
pub mod persistent;
pub mod population;
pub mod positions;
pub mod reorder;
pub mod rng;
pub mod sample;
pub mod systematic;

pub use error::{Error, Result};
pub use persistent::{PersistentFilter, Retain, Select};
pub use population::{Deque, Forward, IntoPopulation, Link, Population, Slice};
pub use positions::Positions;
pub use reorder::Reorder;
pub use rng::RandomSource;
pub use sample::{
    permuted_systematic_sample, permuted_systematic_sample_with_rng, systematic_sample,
    systematic_sample_with_rng, Sample, SampleConfig, SystematicSample,
};
pub use systematic::{IdentityWeight, Systematic, UnitWeight, WeightAccessor};
