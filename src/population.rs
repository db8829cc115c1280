//! Populations: borrowed sequences that reorder and sample iterators walk.
//!
//! A population is never copied or mutated. What differs between populations
//! is how a *position* is represented:
//!
//! - random-access populations ([`Slice`], [`Deque`]) store plain indices;
//! - forward-only populations ([`Forward`]: lists, sets, any `Clone` iterator
//!   of references) store a [`Link`], i.e. the element reference plus a
//!   population iterator parked on it.
//!
//! The representation is a static property of the population type, picked by
//! [`IntoPopulation`].

use std::collections::{btree_set, linked_list, vec_deque, BTreeSet, LinkedList, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use crate::error::{Error, Result};

/// A borrowed population of `Self::Item`, with a fixed position representation.
pub trait Population<'a>: Clone {
    /// Element type.
    type Item: 'a;
    /// Index (random access) or [`Link`] (forward only).
    type Position: Clone;
    /// Population iterator returned by [`Population::cursor`].
    type Cursor: Iterator<Item = &'a Self::Item>;

    /// Whether positions are plain indices.
    const RANDOM_ACCESS: bool;

    /// Number of elements. Forward populations count them in one pass.
    fn len(&self) -> usize;

    /// `true` if the population has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions of every element, in population order.
    fn positions(&self) -> Vec<Self::Position>;

    /// The element at `position`.
    ///
    /// # Panics
    ///
    /// Index-based populations panic if `position` is out of bounds.
    fn resolve(&self, position: &Self::Position) -> &'a Self::Item;

    /// Index of `position` in population order.
    ///
    /// O(1) for index positions, O(index) for links, which must walk from the
    /// start. A link that does not belong to this population maps to `len()`.
    fn source_index(&self, position: &Self::Position) -> usize;

    /// A population iterator whose first item is the element at `position`.
    fn cursor(&self, position: &Self::Position) -> Self::Cursor;

    /// Whether `position` can be resolved against this population.
    fn contains(&self, position: &Self::Position) -> bool;
}

/// Conversion into a [`Population`]; selects the position representation.
pub trait IntoPopulation<'a> {
    /// The population this converts into.
    type Population: Population<'a>;

    /// Performs the conversion.
    fn into_population(self) -> Self::Population;
}

/// Element type of whatever `C` converts into.
pub type ItemOf<'a, C> = <<C as IntoPopulation<'a>>::Population as Population<'a>>::Item;

/// Position type of whatever `C` converts into.
pub type PositionOf<'a, C> = <<C as IntoPopulation<'a>>::Population as Population<'a>>::Position;

/// A contiguous, random-access population.
pub struct Slice<'a, T> {
    items: &'a [T],
}

impl<'a, T> Slice<'a, T> {
    /// Wraps the whole slice.
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Wraps the sub-range `range` of `items`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadParameterValue`] if the range ends before it starts
    /// or runs past the end of `items`.
    pub fn with_range(items: &'a [T], range: Range<usize>) -> Result<Self> {
        if range.start > range.end {
            return Err(Error::bad_parameter(format!(
                "population range ends ({}) before it starts ({})",
                range.end, range.start
            )));
        }
        if range.end > items.len() {
            return Err(Error::bad_parameter(format!(
                "population range end {} is past the population length {}",
                range.end,
                items.len()
            )));
        }
        Ok(Self {
            items: &items[range],
        })
    }

    /// The wrapped slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slice<'_, T> {}

impl<T> fmt::Debug for Slice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice").field("len", &self.items.len()).finish()
    }
}

impl<'a, T: 'a> Population<'a> for Slice<'a, T> {
    type Item = T;
    type Position = usize;
    type Cursor = std::slice::Iter<'a, T>;

    const RANDOM_ACCESS: bool = true;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn positions(&self) -> Vec<usize> {
        (0..self.items.len()).collect()
    }

    #[inline]
    fn resolve(&self, position: &usize) -> &'a T {
        let items: &'a [T] = self.items;
        &items[*position]
    }

    #[inline]
    fn source_index(&self, position: &usize) -> usize {
        *position
    }

    fn cursor(&self, position: &usize) -> Self::Cursor {
        let items: &'a [T] = self.items;
        items[*position..].iter()
    }

    fn contains(&self, position: &usize) -> bool {
        *position < self.items.len()
    }
}

/// A random-access population backed by a (possibly wrapped) ring buffer.
pub struct Deque<'a, T> {
    items: &'a VecDeque<T>,
}

impl<'a, T> Deque<'a, T> {
    /// Wraps the deque.
    pub fn new(items: &'a VecDeque<T>) -> Self {
        Self { items }
    }
}

impl<T> Clone for Deque<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Deque<'_, T> {}

impl<T> fmt::Debug for Deque<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deque").field("len", &self.items.len()).finish()
    }
}

impl<'a, T: 'a> Population<'a> for Deque<'a, T> {
    type Item = T;
    type Position = usize;
    type Cursor = vec_deque::Iter<'a, T>;

    const RANDOM_ACCESS: bool = true;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn positions(&self) -> Vec<usize> {
        (0..self.items.len()).collect()
    }

    #[inline]
    fn resolve(&self, position: &usize) -> &'a T {
        let items: &'a VecDeque<T> = self.items;
        &items[*position]
    }

    #[inline]
    fn source_index(&self, position: &usize) -> usize {
        *position
    }

    fn cursor(&self, position: &usize) -> Self::Cursor {
        let items: &'a VecDeque<T> = self.items;
        items.range(*position..)
    }

    fn contains(&self, position: &usize) -> bool {
        *position < self.items.len()
    }
}

/// Position of an element in a [`Forward`] population.
pub struct Link<'a, T, I> {
    item: &'a T,
    at: I,
}

impl<'a, T, I> Link<'a, T, I> {
    /// The linked element.
    pub fn item(&self) -> &'a T {
        self.item
    }
}

impl<T, I: Clone> Clone for Link<'_, T, I> {
    fn clone(&self) -> Self {
        Self {
            item: self.item,
            at: self.at.clone(),
        }
    }
}

impl<T, I> fmt::Debug for Link<'_, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Link")
            .field(&(self.item as *const T))
            .finish()
    }
}

/// A forward-only population, given by an iterator over its elements.
///
/// `start` is cloned whenever a walk from the beginning is needed, so it must
/// be cheap to clone (the standard collection iterators are).
pub struct Forward<'a, T, I> {
    start: I,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, I> Forward<'a, T, I>
where
    I: Iterator<Item = &'a T> + Clone,
{
    /// Wraps an iterator positioned at the first element of the population.
    pub fn new(start: I) -> Self {
        Self {
            start,
            _marker: PhantomData,
        }
    }
}

impl<T, I: Clone> Clone for Forward<'_, T, I> {
    fn clone(&self) -> Self {
        Self {
            start: self.start.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, I> fmt::Debug for Forward<'_, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forward").finish_non_exhaustive()
    }
}

impl<'a, T: 'a, I> Population<'a> for Forward<'a, T, I>
where
    I: Iterator<Item = &'a T> + Clone,
{
    type Item = T;
    type Position = Link<'a, T, I>;
    type Cursor = I;

    const RANDOM_ACCESS: bool = false;

    fn len(&self) -> usize {
        self.start.clone().count()
    }

    fn positions(&self) -> Vec<Self::Position> {
        let mut links = Vec::new();
        let mut at = self.start.clone();
        loop {
            let here = at.clone();
            match at.next() {
                Some(item) => links.push(Link { item, at: here }),
                None => break,
            }
        }
        links
    }

    #[inline]
    fn resolve(&self, position: &Self::Position) -> &'a T {
        position.item
    }

    // Zero-sized elements all share one address, so they map to the first index.
    fn source_index(&self, position: &Self::Position) -> usize {
        let mut walked = 0;
        for item in self.start.clone() {
            if std::ptr::eq(item, position.item) {
                return walked;
            }
            walked += 1;
        }
        walked
    }

    fn cursor(&self, position: &Self::Position) -> I {
        position.at.clone()
    }

    // A link always carries its own element, so it always resolves.
    fn contains(&self, _position: &Self::Position) -> bool {
        true
    }
}

impl<'a, T: 'a> IntoPopulation<'a> for &'a [T] {
    type Population = Slice<'a, T>;

    fn into_population(self) -> Self::Population {
        Slice::new(self)
    }
}

impl<'a, T: 'a, const N: usize> IntoPopulation<'a> for &'a [T; N] {
    type Population = Slice<'a, T>;

    fn into_population(self) -> Self::Population {
        Slice::new(self.as_slice())
    }
}

impl<'a, T: 'a> IntoPopulation<'a> for &'a Vec<T> {
    type Population = Slice<'a, T>;

    fn into_population(self) -> Self::Population {
        Slice::new(self.as_slice())
    }
}

impl<'a, T: 'a> IntoPopulation<'a> for &'a VecDeque<T> {
    type Population = Deque<'a, T>;

    fn into_population(self) -> Self::Population {
        Deque::new(self)
    }
}

impl<'a, T: 'a> IntoPopulation<'a> for &'a LinkedList<T> {
    type Population = Forward<'a, T, linked_list::Iter<'a, T>>;

    fn into_population(self) -> Self::Population {
        Forward::new(self.iter())
    }
}

impl<'a, T: 'a> IntoPopulation<'a> for &'a BTreeSet<T> {
    type Population = Forward<'a, T, btree_set::Iter<'a, T>>;

    fn into_population(self) -> Self::Population {
        Forward::new(self.iter())
    }
}

impl<'a, P: Population<'a>> IntoPopulation<'a> for P {
    type Population = Self;

    fn into_population(self) -> Self {
        self
    }
}
