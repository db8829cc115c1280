//! The shared, immutable position store behind every reorder iterator.

use std::fmt;
use std::rc::Rc;

/// An ordered sequence of positions, shared by every iterator built from one
/// construction call.
///
/// The content never changes after construction; clones only bump a
/// reference count. Two stores are the *same* store only if they come from the
/// same construction (see [`Positions::same_store`]), regardless of content.
pub struct Positions<P> {
    slots: Rc<[P]>,
}

impl<P> Positions<P> {
    /// Freezes `slots` into a shared store.
    pub fn new(slots: Vec<P>) -> Self {
        Self {
            slots: Rc::from(slots),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The position stored in `slot`.
    pub fn get(&self, slot: usize) -> Option<&P> {
        self.slots.get(slot)
    }

    /// All positions, in store order.
    pub fn as_slice(&self) -> &[P] {
        &self.slots
    }

    /// Iterates over the positions in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.slots.iter()
    }

    /// Whether both handles refer to the same underlying store.
    pub fn same_store(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }

    /// Number of live handles to this store.
    pub fn handles(&self) -> usize {
        Rc::strong_count(&self.slots)
    }
}

impl Positions<usize> {
    /// Visits `population[i]` mutably for every index `i`, in store order.
    ///
    /// Repeated indices are visited once per occurrence.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds for `population`.
    pub fn for_each_mut<T, F>(&self, population: &mut [T], mut f: F)
    where
        F: FnMut(&mut T),
    {
        for &index in self.slots.iter() {
            f(&mut population[index]);
        }
    }
}

impl<P> Clone for Positions<P> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Positions<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.slots.iter()).finish()
    }
}

impl<P> FromIterator<P> for Positions<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'s, P> IntoIterator for &'s Positions<P> {
    type Item = &'s P;
    type IntoIter = std::slice::Iter<'s, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
