//! Permutation builders.
//!
//! Each builder computes a [`Positions`] store once and wraps it in a
//! [`Reorder`] iterator:
//!
//! - [`identity`]: population order;
//! - [`random_permutation`]: a uniform random permutation, or a uniform random
//!   subset of size `k` in random order (partial Fisher–Yates: O(n) setup,
//!   O(k) shuffle), and [`shuffled_with_rng`] for the full, infallible case;
//! - [`sorted`], [`sorted_by`], [`sorted_by_key`]: full or partial sort;
//! - [`custom`], [`from_positions`]: caller-supplied positions.
//!
//! Iterating a permutation is usually much cheaper than reordering the
//! population (or a copy of it), especially when elements are large.
//!
//! `size: None` keeps every element; `Some(k)` keeps the first `k` slots of the
//! permutation. Asking for more elements than the population holds is an
//! [`Error::BadParameterValue`].

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::population::{IntoPopulation, ItemOf, Population, PositionOf};
use crate::positions::Positions;
use crate::reorder::Reorder;
use crate::rng::RandomSource;

/// Iterates over the population in its own order.
pub fn identity<'a, C>(population: C) -> Reorder<'a, C::Population>
where
    C: IntoPopulation<'a>,
{
    let population = population.into_population();
    let positions = Positions::new(population.positions());
    Reorder::new(population, positions)
}

/// Random permutation using the thread-local generator.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if `size` exceeds the population size.
pub fn random_permutation<'a, C>(
    population: C,
    size: Option<usize>,
) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
{
    let mut rng = rand::rng();
    random_permutation_with_rng(population, size, &mut rng)
}

/// Random permutation with a caller-supplied random source.
///
/// With `size = Some(k)`, only the first `k` slots are shuffled and kept: the
/// result is a uniform random `k`-subset in uniform random order.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if `size` exceeds the population size.
pub fn random_permutation_with_rng<'a, C, R>(
    population: C,
    size: Option<usize>,
    rng: &mut R,
) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
    R: RandomSource + ?Sized,
{
    let population = population.into_population();
    let mut slots = population.positions();
    let k = checked_size("random permutation", size, slots.len())?;

    partial_shuffle(&mut slots, k, rng);
    slots.truncate(k);

    log::debug!(
        "built random permutation of {k} out of {} positions",
        population.len()
    );
    Ok(Reorder::new(population, Positions::new(slots)))
}

/// Full random permutation with a caller-supplied random source.
///
/// Same as [`random_permutation_with_rng`] with `size = None`, which cannot
/// fail.
pub fn shuffled_with_rng<'a, C, R>(population: C, rng: &mut R) -> Reorder<'a, C::Population>
where
    C: IntoPopulation<'a>,
    R: RandomSource + ?Sized,
{
    let population = population.into_population();
    let mut slots = population.positions();
    let n = slots.len();
    partial_shuffle(&mut slots, n, rng);
    log::debug!("built random permutation of all {n} positions");
    Reorder::new(population, Positions::new(slots))
}

/// Sorted permutation under `Ord`.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if `size` exceeds the population size.
pub fn sorted<'a, C>(population: C, size: Option<usize>) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
    ItemOf<'a, C>: Ord,
{
    sorted_by(population, size, |a, b| a.cmp(b))
}

/// Sorted permutation under `compare`.
///
/// `compare` must be a strict weak ordering (`<`-like, never `<=`-like). Ties
/// keep population order, so a partial sort of size `k` yields exactly the
/// first `k` slots of the full sort.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if `size` exceeds the population size.
pub fn sorted_by<'a, C, F>(
    population: C,
    size: Option<usize>,
    compare: F,
) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
    F: FnMut(&ItemOf<'a, C>, &ItemOf<'a, C>) -> Ordering,
{
    let population = population.into_population();
    let slots = sort_positions(&population, size, compare)?;
    log::debug!(
        "built sorted permutation of {} out of {} positions",
        slots.len(),
        population.len()
    );
    Ok(Reorder::new(population, Positions::new(slots)))
}

/// Sorted permutation under the key extracted by `key`.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if `size` exceeds the population size.
pub fn sorted_by_key<'a, C, K, F>(
    population: C,
    size: Option<usize>,
    mut key: F,
) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
    F: FnMut(&ItemOf<'a, C>) -> K,
    K: Ord,
{
    sorted_by(population, size, |a, b| key(a).cmp(&key(b)))
}

/// Iterates over caller-supplied positions, which may repeat or omit elements.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if a position lies outside the
/// population.
pub fn custom<'a, C, I>(population: C, positions: I) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
    I: IntoIterator<Item = PositionOf<'a, C>>,
{
    from_positions(population, positions.into_iter().collect())
}

/// Iterates over an existing shared store.
///
/// Iterators built from the same store compare equal when their cursors do.
///
/// # Errors
///
/// Returns [`Error::BadParameterValue`] if a position lies outside the
/// population.
pub fn from_positions<'a, C>(
    population: C,
    positions: Positions<PositionOf<'a, C>>,
) -> Result<Reorder<'a, C::Population>>
where
    C: IntoPopulation<'a>,
{
    let population = population.into_population();
    if let Some(slot) = positions.iter().position(|p| !population.contains(p)) {
        return Err(Error::bad_parameter(format!(
            "custom permutation: position in slot {slot} is outside the population of {}",
            population.len()
        )));
    }
    Ok(Reorder::new(population, positions))
}

fn checked_size(what: &str, size: Option<usize>, available: usize) -> Result<usize> {
    match size {
        None => Ok(available),
        Some(k) if k <= available => Ok(k),
        Some(k) => Err(Error::bad_parameter(format!(
            "{what}: size {k} is larger than the population ({available})"
        ))),
    }
}

/// Shuffles the first `k` slots: slot `i` is swapped with a uniform pick among
/// slots `i..n`.
fn partial_shuffle<T, R>(slots: &mut [T], k: usize, rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    let n = slots.len();
    for i in 0..k.min(n) {
        let j = i + rng.uniform_int(n - i);
        slots.swap(i, j);
    }
}

fn sort_positions<'a, P, F>(
    population: &P,
    size: Option<usize>,
    mut compare: F,
) -> Result<Vec<P::Position>>
where
    P: Population<'a>,
    F: FnMut(&P::Item, &P::Item) -> Ordering,
{
    let mut ranked: Vec<(usize, P::Position)> =
        population.positions().into_iter().enumerate().collect();
    let n = ranked.len();
    let k = checked_size("sorted permutation", size, n)?;

    let mut order = |a: &(usize, P::Position), b: &(usize, P::Position)| {
        compare(population.resolve(&a.1), population.resolve(&b.1)).then(a.0.cmp(&b.0))
    };
    if k < n {
        if k > 0 {
            ranked.select_nth_unstable_by(k - 1, &mut order);
        }
        ranked.truncate(k);
    }
    // Ties are broken by original index, so the order is total.
    ranked.sort_unstable_by(&mut order);

    Ok(ranked.into_iter().map(|(_, position)| position).collect())
}
