//! Persistent filtering.
//!
//! A [`PersistentFilter`] turns a stateful selection predicate into a lazy,
//! single-pass filtering iterator. "Persistent" means that every decision of
//! the predicate is made **at most once** per lineage, however many copies of
//! the iterator are taken and advanced. A lineage is one construction call
//! and all of its clones.
//!
//! All handles of a lineage share one pass. The pass owns the upstream
//! iterator and the predicate, and keeps a run-length log of the picks made
//! so far: one entry per picked element, with its number of picks. A handle
//! is just a slot in that log. A handle that runs past the end of the log
//! asks the predicate for the next pick only. A handle that lags behind
//! replays the logged picks.
//!
//! A predicate may pick one element several times (see
//! [`Select::select_again`]). Consecutive picks of the same element can be
//! told apart with [`PersistentFilter::is_first_pick`].

use std::cell::RefCell;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

/// Selection predicate driven by a [`PersistentFilter`].
pub trait Select<T: ?Sized> {
    /// Whether `item` is picked.
    ///
    /// Called exactly once per upstream element, in upstream order.
    fn select(&mut self, item: &T) -> bool;

    /// Whether `item`, just picked, is picked once more.
    ///
    /// Called after every pick of `item`, and only when the next pick is
    /// needed, until it returns `false`. The default never repeats.
    fn select_again(&mut self, _item: &T) -> bool {
        false
    }
}

/// Adapts a plain boolean filter into a [`Select`] predicate.
#[derive(Debug, Clone, Copy)]
pub struct Retain<F>(pub F);

impl<T: ?Sized, F> Select<T> for Retain<F>
where
    F: FnMut(&T) -> bool,
{
    #[inline]
    fn select(&mut self, item: &T) -> bool {
        (self.0)(item)
    }
}

/// Consecutive picks of one upstream element, from `first_slot` on.
struct Run<'a, T> {
    ordinal: usize,
    item: &'a T,
    first_slot: usize,
}

struct Pick<'a, T> {
    ordinal: usize,
    item: &'a T,
    repeat: usize,
}

struct Pass<'a, T, I, S> {
    upstream: I,
    select: S,
    runs: Vec<Run<'a, T>>,
    picks: usize,
    // The last run may still grow.
    open: bool,
    visited: usize,
    exhausted: bool,
    // Pristine copies, for `predicate()` and `replay()`.
    origin: (I, S),
}

impl<'a, T: 'a, I, S> Pass<'a, T, I, S>
where
    I: Iterator<Item = &'a T>,
    S: Select<T>,
{
    /// Makes decisions until `slot` is picked or upstream ends.
    fn fill(&mut self, slot: usize) -> Option<Pick<'a, T>> {
        while self.picks <= slot {
            if self.open {
                let last = self.runs.last().map(|run| run.item);
                if last.is_some_and(|item| self.select.select_again(item)) {
                    self.picks += 1;
                    continue;
                }
                self.open = false;
            }
            if self.exhausted {
                break;
            }
            match self.upstream.next() {
                Some(item) => {
                    let ordinal = self.visited;
                    self.visited += 1;
                    if self.select.select(item) {
                        self.runs.push(Run {
                            ordinal,
                            item,
                            first_slot: self.picks,
                        });
                        self.picks += 1;
                        self.open = true;
                    }
                }
                None => {
                    self.exhausted = true;
                    log::trace!(
                        "persistent filter pass exhausted: {} elements visited, {} picks",
                        self.visited,
                        self.picks
                    );
                }
            }
        }
        self.lookup(slot)
    }

    fn lookup(&self, slot: usize) -> Option<Pick<'a, T>> {
        if slot >= self.picks {
            return None;
        }
        let run = &self.runs[self.runs.partition_point(|run| run.first_slot <= slot) - 1];
        Some(Pick {
            ordinal: run.ordinal,
            item: run.item,
            repeat: slot - run.first_slot,
        })
    }
}

/// Lazy filtering iterator whose predicate makes each decision at most once.
pub struct PersistentFilter<'a, T, I, S> {
    pass: Rc<RefCell<Pass<'a, T, I, S>>>,
    slot: Option<usize>,
}

impl<'a, T: 'a, I, S> PersistentFilter<'a, T, I, S>
where
    I: Iterator<Item = &'a T> + Clone,
    S: Select<T> + Clone,
{
    /// Filters `upstream` through `select`, starting a new lineage.
    pub fn new(upstream: I, select: S) -> Self {
        let origin = (upstream.clone(), select.clone());
        Self {
            pass: Rc::new(RefCell::new(Pass {
                upstream,
                select,
                runs: Vec::new(),
                picks: 0,
                open: false,
                visited: 0,
                exhausted: false,
                origin,
            })),
            slot: Some(0),
        }
    }

    /// Starts an independent lineage from pristine copies of the upstream
    /// iterator and the predicate. Every element is evaluated again.
    pub fn replay(&self) -> Self {
        let (upstream, select) = self.pass.borrow().origin.clone();
        Self::new(upstream, select)
    }

    /// A copy of the predicate as it was before any evaluation.
    pub fn predicate(&self) -> S {
        self.pass.borrow().origin.1.clone()
    }
}

impl<'a, T: 'a, I, S> PersistentFilter<'a, T, I, S>
where
    I: Iterator<Item = &'a T>,
    S: Select<T>,
{
    /// A handle on the first pick of this lineage.
    ///
    /// It replays the logged decisions, so it yields exactly what a fresh
    /// predicate would yield, and it compares equal to the lineage's start.
    pub fn begin(&self) -> Self {
        Self {
            pass: Rc::clone(&self.pass),
            slot: Some(0),
        }
    }

    /// The past-the-end handle of this lineage. It never evaluates anything.
    pub fn end(&self) -> Self {
        Self {
            pass: Rc::clone(&self.pass),
            slot: None,
        }
    }

    fn current(&self) -> Option<Pick<'a, T>> {
        let slot = self.slot?;
        self.pass.borrow_mut().fill(slot)
    }

    /// The current pick, without advancing.
    pub fn get(&self) -> Option<&'a T> {
        self.current().map(|pick| pick.item)
    }

    /// Upstream offset of the current pick (0 = first upstream element).
    pub fn ordinal(&self) -> Option<usize> {
        self.current().map(|pick| pick.ordinal)
    }

    /// Slot of the handle in the lineage's pick log.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// `true` once no further pick exists.
    pub fn is_end(&self) -> bool {
        self.current().is_none()
    }

    /// Whether the current pick is the first pick of its upstream element.
    ///
    /// `false` for a repeated pick of the same element, and at the end.
    pub fn is_first_pick(&self) -> bool {
        self.current().is_some_and(|pick| pick.repeat == 0)
    }

    /// Number of upstream elements the lineage has shown to its predicate.
    pub fn visited(&self) -> usize {
        self.pass.borrow().visited
    }

    /// Number of picks the lineage has decided so far.
    pub fn decided(&self) -> usize {
        self.pass.borrow().picks
    }

    /// Number of entries in the pick log: one per picked element.
    pub fn logged_runs(&self) -> usize {
        self.pass.borrow().runs.len()
    }

    /// Whether both handles belong to the same lineage.
    pub fn same_lineage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pass, &other.pass)
    }
}

impl<'a, T: 'a, I, S> Iterator for PersistentFilter<'a, T, I, S>
where
    I: Iterator<Item = &'a T>,
    S: Select<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let pick = self.current()?;
        self.slot = self.slot.map(|slot| slot + 1);
        Some(pick.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let decided = match self.slot {
            Some(slot) => self.pass.borrow().picks.saturating_sub(slot),
            None => 0,
        };
        (decided, None)
    }
}

impl<'a, T: 'a, I, S> FusedIterator for PersistentFilter<'a, T, I, S>
where
    I: Iterator<Item = &'a T>,
    S: Select<T>,
{
}

impl<T, I, S> Clone for PersistentFilter<'_, T, I, S> {
    /// Continues from the same slot of the same lineage.
    fn clone(&self) -> Self {
        Self {
            pass: Rc::clone(&self.pass),
            slot: self.slot,
        }
    }
}

impl<'a, T: 'a, I, S> PartialEq for PersistentFilter<'a, T, I, S>
where
    I: Iterator<Item = &'a T>,
    S: Select<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if !self.same_lineage(other) {
            return false;
        }
        match (self.current(), other.current()) {
            (None, None) => true,
            (Some(_), Some(_)) => self.slot == other.slot,
            _ => false,
        }
    }
}

impl<T, I, S> fmt::Debug for PersistentFilter<'_, T, I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pass = self.pass.borrow();
        f.debug_struct("PersistentFilter")
            .field("slot", &self.slot)
            .field("picks", &pass.picks)
            .field("runs", &pass.runs.len())
            .field("visited", &pass.visited)
            .field("exhausted", &pass.exhausted)
            .finish()
    }
}
