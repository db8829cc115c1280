//! Reorder iterators.
//!
//! A [`Reorder`] walks a shared [`Positions`] store and dereferences every
//! position into the borrowed population. Iteration happens over the store;
//! the population is only touched when an element is yielded. Because the
//! store is shared, every copy of a reorder iterator knows where its
//! permutation begins and ends ([`Reorder::begin`], [`Reorder::end`]).
//!
//! Reorder iterators are usually obtained from the builders in
//! [`crate::permutation`].

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::population::Population;
use crate::positions::Positions;

/// Iterator over a permutation (or arbitrary selection) of a population.
pub struct Reorder<'a, P: Population<'a>> {
    population: P,
    positions: Positions<P::Position>,
    front: usize,
    back: usize,
    _borrow: PhantomData<&'a P::Item>,
}

impl<'a, P: Population<'a>> Reorder<'a, P> {
    /// Iterates over `population` in the order given by `positions`, starting
    /// at the first slot.
    ///
    /// Positions are not checked; use [`crate::permutation::from_positions`]
    /// for a validated store.
    ///
    /// # Panics
    ///
    /// Yielding a slot whose index lies outside an index-based population
    /// panics.
    pub fn new(population: P, positions: Positions<P::Position>) -> Self {
        let back = positions.len();
        Self {
            population,
            positions,
            front: 0,
            back,
            _borrow: PhantomData,
        }
    }

    /// A copy pointing at the first slot of the store.
    pub fn begin(&self) -> Self {
        Self::new(self.population.clone(), self.positions.clone())
    }

    /// A copy pointing past the last slot of the store.
    pub fn end(&self) -> Self {
        let mut end = self.begin();
        end.front = end.back;
        end
    }

    /// The element under the cursor, without advancing.
    pub fn get(&self) -> Option<&'a P::Item> {
        self.at(self.front).filter(|_| self.front < self.back)
    }

    /// The element stored in `slot` (absolute slot in the store).
    pub fn at(&self, slot: usize) -> Option<&'a P::Item> {
        self.positions
            .get(slot)
            .map(|position| self.population.resolve(position))
    }

    /// Absolute slot of the cursor in the store.
    pub fn slot(&self) -> usize {
        self.front
    }

    /// Moves the cursor to `slot`, forwards or backwards.
    ///
    /// Slots past the back end clamp to it.
    pub fn seek(&mut self, slot: usize) {
        self.front = slot.min(self.back);
    }

    /// `true` once every slot has been yielded.
    pub fn is_end(&self) -> bool {
        self.front >= self.back
    }

    /// Index, in the original population, of the element under the cursor.
    ///
    /// O(1) for random-access populations, linear for forward ones.
    pub fn source_index(&self) -> Option<usize> {
        if self.is_end() {
            return None;
        }
        self.source_index_at(self.front)
    }

    /// Index, in the original population, of the element stored in `slot`.
    pub fn source_index_at(&self, slot: usize) -> Option<usize> {
        self.positions
            .get(slot)
            .map(|position| self.population.source_index(position))
    }

    /// Population iterator positioned at the element under the cursor.
    pub fn source_iter(&self) -> Option<P::Cursor> {
        if self.is_end() {
            return None;
        }
        self.source_iter_at(self.front)
    }

    /// Population iterator positioned at the element stored in `slot`.
    pub fn source_iter_at(&self, slot: usize) -> Option<P::Cursor> {
        self.positions
            .get(slot)
            .map(|position| self.population.cursor(position))
    }

    /// The shared position store.
    pub fn positions(&self) -> &Positions<P::Position> {
        &self.positions
    }

    /// The underlying population.
    pub fn population(&self) -> &P {
        &self.population
    }
}

impl<'a, P: Population<'a>> Iterator for Reorder<'a, P> {
    type Item = &'a P::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.at(self.front);
        self.front += 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, P: Population<'a>> DoubleEndedIterator for Reorder<'a, P> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.at(self.back)
    }
}

impl<'a, P: Population<'a>> ExactSizeIterator for Reorder<'a, P> {}

impl<'a, P: Population<'a>> FusedIterator for Reorder<'a, P> {}

impl<'a, P: Population<'a>> Clone for Reorder<'a, P> {
    fn clone(&self) -> Self {
        Self {
            population: self.population.clone(),
            positions: self.positions.clone(),
            front: self.front,
            back: self.back,
            _borrow: PhantomData,
        }
    }
}

impl<'a, P: Population<'a>> PartialEq for Reorder<'a, P> {
    /// Same store, and either both exhausted or both at the same slot.
    fn eq(&self, other: &Self) -> bool {
        if !self.positions.same_store(&other.positions) {
            return false;
        }
        match (self.is_end(), other.is_end()) {
            (true, true) => true,
            (false, false) => self.front == other.front,
            _ => false,
        }
    }
}

impl<'a, P: Population<'a>> Eq for Reorder<'a, P> {}

impl<'a, P: Population<'a>> fmt::Debug for Reorder<'a, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reorder")
            .field("slot", &self.front)
            .field("back", &self.back)
            .field("len", &self.positions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{IntoPopulation, Slice};
    use std::collections::LinkedList;

    fn reversed(data: &[u32]) -> Reorder<'_, Slice<'_, u32>> {
        let store = Positions::new((0..data.len()).rev().collect());
        Reorder::new(data.into_population(), store)
    }

    #[test]
    fn walks_the_store_in_order() {
        let data = [1, 2, 3, 4];
        let it = reversed(&data);
        assert_eq!(it.len(), 4);
        assert_eq!(it.copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn begin_and_end_share_the_store() {
        let data = [1, 2, 3];
        let mut it = reversed(&data);
        it.next();
        let begin = it.begin();
        let end = it.end();

        assert!(begin.positions().same_store(it.positions()));
        assert_eq!(begin.get(), Some(&3));
        assert!(end.is_end());
        assert_eq!(end.get(), None);

        let mut walked = begin.clone();
        walked.by_ref().for_each(drop);
        assert_eq!(walked, end);
        assert_ne!(begin, end);
    }

    #[test]
    fn distinct_constructions_never_compare_equal() {
        let data = [1, 2, 3];
        let a = reversed(&data);
        let b = reversed(&data);
        assert_eq!(a.clone().collect::<Vec<_>>(), b.clone().collect::<Vec<_>>());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn copies_advance_independently() {
        let data = [10, 20, 30];
        let mut a = reversed(&data);
        let b = a.clone();
        a.next();
        assert_eq!(a.get(), Some(&20));
        assert_eq!(b.get(), Some(&30));
        assert_ne!(a, b);
    }

    #[test]
    fn random_access_and_seek() {
        let data = [5, 6, 7, 8];
        let mut it = reversed(&data);
        assert_eq!(it.at(1), Some(&7));
        assert_eq!(it.nth(2), Some(&6));
        assert_eq!(it.slot(), 3);
        it.seek(1);
        assert_eq!(it.get(), Some(&7));
        assert_eq!(it.source_index(), Some(2));
        it.seek(99);
        assert!(it.is_end());
        assert_eq!(it.source_index(), None);
    }

    #[test]
    fn drained_from_the_back_equals_end() {
        let data = [1, 2, 3];
        let mut it = reversed(&data);
        while it.next_back().is_some() {}
        assert_eq!(it.slot(), 0);
        assert_eq!(it, it.end());

        let mut half = reversed(&data);
        half.next_back();
        assert_ne!(half, half.end());
        assert_eq!(half, half.begin());
    }

    #[test]
    #[should_panic]
    fn unchecked_positions_panic_on_access() {
        let data = [1, 2];
        let mut it = Reorder::new(Slice::new(&data), Positions::new(vec![0, 5]));
        assert_eq!(it.next(), Some(&1));
        it.next();
    }

    #[test]
    fn double_ended() {
        let data = [1, 2, 3, 4];
        let mut it = reversed(&data);
        assert_eq!(it.next_back(), Some(&1));
        assert_eq!(it.next(), Some(&4));
        assert_eq!(it.len(), 2);
        assert_eq!(it.rev().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn source_iterator_starts_at_the_element() {
        let data = [1, 2, 3, 4];
        let mut it = reversed(&data);
        it.next();
        let rest: Vec<u32> = it.source_iter().expect("not at end").copied().collect();
        assert_eq!(rest, vec![3, 4]);
    }

    #[test]
    fn forward_population_reports_source_positions() {
        let data: LinkedList<&str> = ["a", "b", "c"].into_iter().collect();
        let pop = (&data).into_population();
        let mut links = pop.positions();
        links.reverse();
        let mut it = Reorder::new(pop, Positions::new(links));

        assert_eq!(it.source_index(), Some(2));
        assert_eq!(it.next(), Some(&"c"));
        assert_eq!(it.source_index(), Some(1));
        let tail: Vec<&str> = it.source_iter().expect("not at end").copied().collect();
        assert_eq!(tail, vec!["b", "c"]);
    }

    #[test]
    fn empty_store_starts_at_end() {
        let data: [u32; 0] = [];
        let it = reversed(&data);
        assert_eq!(it.begin(), it.end());
        assert_eq!(it.count(), 0);
    }
}
