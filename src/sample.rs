//! Samples: a reorder iterator chained into a persistent filter.
//!
//! [`systematic_sample`] walks the population in its own order.
//! [`permuted_systematic_sample`] walks a random permutation instead, which
//! breaks any pattern in the weights that could line up with the sampling
//! step. Either way, [`Sample::source_index`] and [`Sample::source_iter`]
//! refer back to the original population.
//!
//! [`SampleConfig`] builds the same samples with validated parameters.

use std::fmt;
use std::iter::FusedIterator;

use num_traits::{cast, Float};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{Error, Result};
use crate::permutation::{identity, shuffled_with_rng};
use crate::persistent::{PersistentFilter, Select};
use crate::population::{IntoPopulation, ItemOf, Population};
use crate::reorder::Reorder;
use crate::rng::RandomSource;
use crate::systematic::{Systematic, UnitWeight, WeightAccessor};

/// A persistent filter over a reorder iterator.
pub struct Sample<'a, P: Population<'a>, S> {
    origin: Reorder<'a, P>,
    filter: PersistentFilter<'a, P::Item, Reorder<'a, P>, S>,
}

/// A sample picked by the systematic sampling predicate.
pub type SystematicSample<'a, P, W, A> = Sample<'a, P, Systematic<W, A>>;

impl<'a, P, S> Sample<'a, P, S>
where
    P: Population<'a>,
    S: Select<P::Item> + Clone,
{
    /// Filters the elements `order` visits through `select`.
    pub fn new(order: Reorder<'a, P>, select: S) -> Self {
        Self {
            filter: PersistentFilter::new(order.clone(), select),
            origin: order,
        }
    }

    /// Evaluates the same order again, with a fresh copy of the predicate.
    pub fn replay(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            filter: self.filter.replay(),
        }
    }

    /// The predicate as it was before the first evaluation.
    pub fn predicate(&self) -> S {
        self.filter.predicate()
    }
}

impl<'a, P, S> Sample<'a, P, S>
where
    P: Population<'a>,
    S: Select<P::Item>,
{
    /// A handle on the first pick.
    pub fn begin(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            filter: self.filter.begin(),
        }
    }

    /// The past-the-end handle.
    pub fn end(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            filter: self.filter.end(),
        }
    }

    /// The current pick, without advancing.
    pub fn get(&self) -> Option<&'a P::Item> {
        self.filter.get()
    }

    /// `true` once every pick has been yielded.
    pub fn is_end(&self) -> bool {
        self.filter.is_end()
    }

    /// Whether the current pick is the first pick of its element.
    pub fn is_first_pick(&self) -> bool {
        self.filter.is_first_pick()
    }

    /// Index of the current pick in the original population.
    pub fn source_index(&self) -> Option<usize> {
        let ordinal = self.filter.ordinal()?;
        self.origin.source_index_at(self.origin.slot() + ordinal)
    }

    /// Population iterator positioned at the current pick.
    pub fn source_iter(&self) -> Option<P::Cursor> {
        let ordinal = self.filter.ordinal()?;
        self.origin.source_iter_at(self.origin.slot() + ordinal)
    }

    /// The order the predicate walks, at its start.
    pub fn order(&self) -> &Reorder<'a, P> {
        &self.origin
    }
}

impl<'a, P, S> Iterator for Sample<'a, P, S>
where
    P: Population<'a>,
    S: Select<P::Item>,
{
    type Item = &'a P::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.filter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.filter.size_hint()
    }
}

impl<'a, P, S> FusedIterator for Sample<'a, P, S>
where
    P: Population<'a>,
    S: Select<P::Item>,
{
}

impl<'a, P: Population<'a>, S> Clone for Sample<'a, P, S> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<'a, P, S> PartialEq for Sample<'a, P, S>
where
    P: Population<'a>,
    S: Select<P::Item>,
{
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter
    }
}

impl<'a, P: Population<'a>, S> fmt::Debug for Sample<'a, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("order", &self.origin)
            .field("filter", &self.filter)
            .finish()
    }
}

/// Systematic sample in population order, offset drawn from the thread-local
/// generator.
///
/// `population_weight` must be the total weight of the population. The sample
/// then holds exactly `sample_size` picks, heavy elements possibly several
/// times.
pub fn systematic_sample<'a, C, W, A>(
    population: C,
    sample_size: usize,
    population_weight: W,
    weight_of: A,
) -> SystematicSample<'a, C::Population, W, A>
where
    C: IntoPopulation<'a>,
    W: Float,
    A: WeightAccessor<ItemOf<'a, C>, W> + Clone,
{
    let mut rng = rand::rng();
    systematic_sample_with_rng(population, sample_size, population_weight, weight_of, &mut rng)
}

/// Systematic sample in population order, offset drawn from `rng`.
pub fn systematic_sample_with_rng<'a, C, W, A, R>(
    population: C,
    sample_size: usize,
    population_weight: W,
    weight_of: A,
    rng: &mut R,
) -> SystematicSample<'a, C::Population, W, A>
where
    C: IntoPopulation<'a>,
    W: Float,
    A: WeightAccessor<ItemOf<'a, C>, W> + Clone,
    R: RandomSource + ?Sized,
{
    let select = Systematic::with_rng(sample_size, population_weight, weight_of, rng);
    Sample::new(identity(population), select)
}

/// Systematic sample over a random permutation of the population, using the
/// thread-local generator.
pub fn permuted_systematic_sample<'a, C, W, A>(
    population: C,
    sample_size: usize,
    population_weight: W,
    weight_of: A,
) -> SystematicSample<'a, C::Population, W, A>
where
    C: IntoPopulation<'a>,
    W: Float,
    A: WeightAccessor<ItemOf<'a, C>, W> + Clone,
{
    let mut rng = rand::rng();
    permuted_systematic_sample_with_rng(
        population,
        sample_size,
        population_weight,
        weight_of,
        &mut rng,
    )
}

/// Systematic sample over a random permutation of the population.
///
/// The permutation is drawn first, then the offset, both from `rng`.
pub fn permuted_systematic_sample_with_rng<'a, C, W, A, R>(
    population: C,
    sample_size: usize,
    population_weight: W,
    weight_of: A,
    rng: &mut R,
) -> SystematicSample<'a, C::Population, W, A>
where
    C: IntoPopulation<'a>,
    W: Float,
    A: WeightAccessor<ItemOf<'a, C>, W> + Clone,
    R: RandomSource + ?Sized,
{
    let order = shuffled_with_rng(population, rng);
    let select = Systematic::with_rng(sample_size, population_weight, weight_of, rng);
    Sample::new(order, select)
}

/// Builder for validated systematic samples.
///
/// ```
/// use junban::SampleConfig;
///
/// let weights = [0.5, 2.0, 1.0, 0.5];
/// let sample = SampleConfig::new(3)
///     .with_seed(7)
///     .permuted(true)
///     .build(&weights, |w: &f64| *w)
///     .unwrap();
/// assert_eq!(sample.count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig<W> {
    sample_size: usize,
    population_weight: Option<W>,
    offset: Option<W>,
    seed: Option<u64>,
    permuted: bool,
}

impl<W: Float> SampleConfig<W> {
    /// Sample of `sample_size` picks, in population order, with the
    /// population weight summed on build.
    pub fn new(sample_size: usize) -> Self {
        Self {
            sample_size,
            population_weight: None,
            offset: None,
            seed: None,
            permuted: false,
        }
    }

    /// Total population weight, when the caller already knows it.
    pub fn with_population_weight(mut self, population_weight: W) -> Self {
        self.population_weight = Some(population_weight);
        self
    }

    /// Fixed offset in `[0, 1)` instead of a random draw.
    pub fn with_offset(mut self, offset: W) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Walk a random permutation of the population.
    pub fn permuted(mut self, permuted: bool) -> Self {
        self.permuted = permuted;
        self
    }

    /// Requested number of picks.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Builds the sample.
    ///
    /// # Errors
    ///
    /// - [`Error::BadParameterValue`] if the offset is outside `[0, 1)`, or the
    ///   explicit population weight is negative or not finite, or zero while
    ///   picks are requested.
    /// - [`Error::Runtime`] if the summed population weight is not finite.
    pub fn build<'a, C, A>(
        &self,
        population: C,
        weight_of: A,
    ) -> Result<SystematicSample<'a, C::Population, W, A>>
    where
        C: IntoPopulation<'a>,
        A: WeightAccessor<ItemOf<'a, C>, W> + Clone,
    {
        if let Some(offset) = self.offset {
            if !(offset >= W::zero() && offset < W::one()) {
                return Err(Error::bad_parameter("sample offset must lie in [0, 1)"));
            }
        }
        if let Some(weight) = self.population_weight {
            self.check_population_weight(weight)?;
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let order = if self.permuted {
            shuffled_with_rng(population, &mut *rng)
        } else {
            identity(population)
        };

        let population_weight = match self.population_weight {
            Some(weight) => weight,
            None => {
                let sum = order
                    .clone()
                    .fold(W::zero(), |acc, item| acc + weight_of.weight(item));
                if !sum.is_finite() {
                    return Err(Error::runtime(
                        "population weight summed to a non-finite value",
                    ));
                }
                sum
            }
        };

        let offset = match self.offset {
            Some(offset) => offset,
            None => cast::<f64, W>(rng.uniform_01()).unwrap_or_else(W::zero),
        };

        let select = Systematic::new(self.sample_size, population_weight, offset, weight_of);
        Ok(Sample::new(order, select))
    }

    /// Builds a sample where every element weighs 1.
    ///
    /// The population weight defaults to the population size.
    ///
    /// # Errors
    ///
    /// Same as [`SampleConfig::build`].
    pub fn build_uniform<'a, C>(
        &self,
        population: C,
    ) -> Result<SystematicSample<'a, C::Population, W, UnitWeight>>
    where
        C: IntoPopulation<'a>,
    {
        let population = population.into_population();
        let mut config = *self;
        if config.population_weight.is_none() {
            let len = cast::<usize, W>(population.len())
                .ok_or_else(|| Error::runtime("population size does not fit the weight type"))?;
            config.population_weight = Some(len);
        }
        config.build(population, UnitWeight)
    }

    fn check_population_weight(&self, weight: W) -> Result<()> {
        if !weight.is_finite() || weight < W::zero() {
            return Err(Error::bad_parameter(
                "population weight must be finite and non-negative",
            ));
        }
        if self.sample_size > 0 && weight == W::zero() {
            return Err(Error::bad_parameter(format!(
                "cannot pick {} elements from a population of weight zero",
                self.sample_size
            )));
        }
        Ok(())
    }
}
