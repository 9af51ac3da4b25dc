//! Positional access to live sets and maps.
//!
//! A [`PojoSet`] or [`PojoMap`] can change behind a node's back. The adapter
//! reads it one position at a time, remembers what it has read, and checks the
//! modification counter on every read. When the counter moves it throws away
//! what it has and starts over. A second restart within one fill is an error;
//! the next fill starts with a fresh budget.

use pojo_core::{PojoEntry, PojoMap, PojoSet, PojoValue};

use crate::PojoError;

/// Number of passes over the collection a single fill makes before giving up.
pub(crate) const MAX_FILL_ATTEMPTS: u32 = 2;

/// A collection that can be read by position while others change it.
pub(crate) trait LiveSource {
    type Item;

    /// The item at `index` (if any) and the modification counter, observed
    /// together.
    fn read_at(&self, index: usize) -> (u64, Option<Self::Item>);
}

impl LiveSource for PojoSet {
    type Item = PojoValue;

    fn read_at(&self, index: usize) -> (u64, Option<PojoValue>) {
        PojoSet::read_at(self, index)
    }
}

impl LiveSource for PojoMap {
    type Item = PojoEntry;

    fn read_at(&self, index: usize) -> (u64, Option<PojoEntry>) {
        PojoMap::read_at(self, index)
    }
}

/// Lazily filled list over a [`LiveSource`]. Items are converted to `T` as
/// they are read.
pub(crate) struct IterAdapter<S, T> {
    source: S,
    /// Counter value the filled items were read under; `None` before the
    /// first read of a pass.
    snapshot: Option<u64>,
    items: Vec<T>,
    exhausted: bool,
}

impl<S: LiveSource, T: Clone> IterAdapter<S, T> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            snapshot: None,
            items: Vec::new(),
            exhausted: false,
        }
    }

    fn restart(&mut self, attempts: &mut u32) -> Result<(), PojoError> {
        if *attempts >= MAX_FILL_ATTEMPTS {
            crate::debug!("giving up after {} attempts", attempts);
            return Err(PojoError::ConcurrentModification {
                attempts: *attempts,
            });
        }
        *attempts += 1;
        crate::debug!("collection changed while reading, attempt {}", attempts);
        self.snapshot = None;
        self.items.clear();
        self.exhausted = false;
        Ok(())
    }

    /// Reads until `len` items are held or the collection ends, and returns
    /// what is held.
    pub(crate) fn fill_to(
        &mut self,
        len: usize,
        mut make: impl FnMut(usize, S::Item) -> T,
    ) -> Result<&[T], PojoError> {
        let mut attempts = 1;
        while self.items.len() < len && !self.exhausted {
            let index = self.items.len();
            let (version, item) = self.source.read_at(index);
            match self.snapshot {
                Some(expected) if expected != version => {
                    self.restart(&mut attempts)?;
                    continue;
                }
                Some(_) => {}
                None => self.snapshot = Some(version),
            }
            match item {
                Some(item) => self.items.push(make(index, item)),
                None => self.exhausted = true,
            }
        }
        Ok(&self.items)
    }

    /// Reads the whole collection.
    pub(crate) fn fill_all(
        &mut self,
        make: impl FnMut(usize, S::Item) -> T,
    ) -> Result<&[T], PojoError> {
        self.fill_to(usize::MAX, make)
    }

    /// The item at `index`.
    pub(crate) fn get(
        &mut self,
        index: usize,
        make: impl FnMut(usize, S::Item) -> T,
    ) -> Result<T, PojoError> {
        let held = self.fill_to(index.saturating_add(1), make)?;
        held.get(index)
            .cloned()
            .ok_or(PojoError::IndexOutOfBounds {
                index,
                len: held.len(),
            })
    }
}
