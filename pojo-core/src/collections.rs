use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::hash::DefaultHasher;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::LocalKey;

use indexmap::{IndexMap, IndexSet};

use crate::{PojoArray, PojoValue};

/// An immutable, ordered list of values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PojoList(Arc<[PojoValue]>);

impl PojoList {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&PojoValue> {
        self.0.get(index)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> core::slice::Iter<'_, PojoValue> {
        self.0.iter()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[PojoValue] {
        &self.0
    }

    /// True if both lists share storage.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for PojoList {
    fn default() -> Self {
        PojoList(Arc::from(Vec::new()))
    }
}

impl FromIterator<PojoValue> for PojoList {
    fn from_iter<I: IntoIterator<Item = PojoValue>>(iter: I) -> Self {
        PojoList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PojoList {
    type Item = &'a PojoValue;
    type IntoIter = core::slice::Iter<'a, PojoValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for PojoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("List")?;
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// One key/value pair of a [`PojoMap`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PojoEntry(Arc<(PojoValue, PojoValue)>);

impl PojoEntry {
    /// Creates an entry.
    pub fn new(key: PojoValue, value: PojoValue) -> Self {
        PojoEntry(Arc::new((key, value)))
    }

    /// The key.
    pub fn key(&self) -> &PojoValue {
        &self.0.0
    }

    /// The value.
    pub fn value(&self) -> &PojoValue {
        &self.0.1
    }

    /// A copy with another key.
    pub fn with_key(&self, key: PojoValue) -> Self {
        PojoEntry::new(key, self.value().clone())
    }

    /// A copy with another value.
    pub fn with_value(&self, value: PojoValue) -> Self {
        PojoEntry::new(self.key().clone(), value)
    }
}

impl fmt::Debug for PojoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({:?} => {:?})", self.key(), self.value())
    }
}

impl fmt::Display for PojoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

/// Collection contents plus a counter bumped on every structural change.
struct Versioned<C> {
    version: u64,
    items: C,
}

struct Live<C> {
    inner: RwLock<Versioned<C>>,
}

impl<C> Live<C> {
    fn new(items: C) -> Arc<Self> {
        Arc::new(Live {
            inner: RwLock::new(Versioned { version: 0, items }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Versioned<C>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Versioned<C>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn address<C>(live: &Arc<Live<C>>) -> *const () {
    Arc::as_ptr(live).cast()
}

/// True if `value` holds the collection at `target`, at any depth. Hashing or
/// comparing such a value takes `target`'s lock, so it must never be done while
/// that lock is held for writing.
fn holds(value: &PojoValue, target: *const (), seen: &mut Vec<*const ()>) -> bool {
    match value {
        PojoValue::Set(set) => visit(address(&set.0), target, seen).unwrap_or_else(|| {
            set.snapshot().iter().any(|item| holds(item, target, seen))
        }),
        PojoValue::Map(map) => visit(address(&map.0), target, seen).unwrap_or_else(|| {
            map.entries().iter().any(|entry| {
                holds(entry.key(), target, seen) || holds(entry.value(), target, seen)
            })
        }),
        PojoValue::List(list) => list.iter().any(|item| holds(item, target, seen)),
        PojoValue::Array(PojoArray::Object(items)) => {
            items.iter().any(|item| holds(item, target, seen))
        }
        PojoValue::Entry(entry) => {
            holds(entry.key(), target, seen) || holds(entry.value(), target, seen)
        }
        _ => false,
    }
}

/// `Some` when the collection at `live` settles the search: it is the target,
/// or it was already searched.
fn visit(live: *const (), target: *const (), seen: &mut Vec<*const ()>) -> Option<bool> {
    if live == target {
        return Some(true);
    }
    if seen.contains(&live) {
        return Some(false);
    }
    seen.push(live);
    None
}

type Active = RefCell<Vec<*const ()>>;

thread_local! {
    /// Collections being formatted on this thread.
    static FORMATTING: Active = const { RefCell::new(Vec::new()) };
    /// Collections being hashed on this thread.
    static HASHING: Active = const { RefCell::new(Vec::new()) };
}

/// Runs `body` for the collection at `live`, or `nested` if that collection is
/// already listed in `active`, i.e. it contains itself.
fn once<A, R>(
    active: &'static LocalKey<Active>,
    live: *const (),
    arg: A,
    nested: impl FnOnce(A) -> R,
    body: impl FnOnce(A) -> R,
) -> R {
    let reentered = active.with_borrow_mut(|stack| {
        let reentered = stack.contains(&live);
        if !reentered {
            stack.push(live);
        }
        reentered
    });
    if reentered {
        return nested(arg);
    }
    let result = body(arg);
    active.with_borrow_mut(|stack| stack.retain(|held| *held != live));
    result
}

/// Order-independent hash, so equal sets hash the same whatever their order.
fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

/// A shared, insertion-ordered set.
///
/// Cloning the handle shares the underlying set, the way two references to the
/// same Java collection would. Every structural change bumps a modification
/// counter that readers use to detect concurrent changes.
#[derive(Clone)]
pub struct PojoSet(Arc<Live<IndexSet<PojoValue>>>);

impl PojoSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        PojoSet(Live::new(IndexSet::new()))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    /// True if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `value` is an element.
    pub fn contains(&self, value: &PojoValue) -> bool {
        !self.is_held_by(value) && self.0.read().items.contains(value)
    }

    /// Adds `value` at the end. Returns false if it was already present, or if
    /// `value` holds this set: a set never contains itself.
    pub fn insert(&self, value: PojoValue) -> bool {
        if self.is_held_by(&value) {
            return false;
        }
        let mut guard = self.0.write();
        let inserted = guard.items.insert(value);
        if inserted {
            guard.version += 1;
        }
        inserted
    }

    /// Removes `value`, keeping the order of the remaining elements.
    pub fn remove(&self, value: &PojoValue) -> bool {
        if self.is_held_by(value) {
            return false;
        }
        let mut guard = self.0.write();
        let removed = guard.items.shift_remove(value);
        if removed {
            guard.version += 1;
        }
        removed
    }

    /// Removes every element.
    pub fn clear(&self) {
        let mut guard = self.0.write();
        if !guard.items.is_empty() {
            guard.items.clear();
            guard.version += 1;
        }
    }

    /// The modification counter.
    pub fn version(&self) -> u64 {
        self.0.read().version
    }

    /// Reads the element at `index` together with the modification counter,
    /// both observed under the same lock.
    pub fn read_at(&self, index: usize) -> (u64, Option<PojoValue>) {
        let guard = self.0.read();
        (guard.version, guard.items.get_index(index).cloned())
    }

    /// A copy of the current elements, in order.
    pub fn snapshot(&self) -> Vec<PojoValue> {
        self.0.read().items.iter().cloned().collect()
    }

    /// True if both handles share the same set.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    fn is_held_by(&self, value: &PojoValue) -> bool {
        holds(value, address(&self.0), &mut Vec::new())
    }

    /// Formats with `body`, or as `(this Set)` when nested inside itself.
    pub(crate) fn format_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        once(&FORMATTING, address(&self.0), f, |f| f.write_str("(this Set)"), body)
    }
}

impl Default for PojoSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<PojoValue> for PojoSet {
    fn from_iter<I: IntoIterator<Item = PojoValue>>(iter: I) -> Self {
        PojoSet(Live::new(iter.into_iter().collect()))
    }
}

impl PartialEq for PojoSet {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.0.read().items == other.0.read().items
    }
}

impl Eq for PojoSet {}

impl Hash for PojoSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let nested = |state: &mut H| "(this Set)".hash(state);
        once(&HASHING, address(&self.0), state, nested, |state| {
            let items = self.snapshot();
            items.len().hash(state);
            unordered_hash(items.iter()).hash(state);
        });
    }
}

impl fmt::Debug for PojoSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_with(f, |f| {
            f.write_str("Set")?;
            f.debug_set().entries(self.snapshot().iter()).finish()
        })
    }
}

/// A shared, insertion-ordered map.
///
/// Same sharing and modification-counter rules as [`PojoSet`].
#[derive(Clone)]
pub struct PojoMap(Arc<Live<IndexMap<PojoValue, PojoValue>>>);

impl PojoMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        PojoMap(Live::new(IndexMap::new()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.read().items.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `key`.
    pub fn get(&self, key: &PojoValue) -> Option<PojoValue> {
        if self.is_held_by(key) {
            return None;
        }
        self.0.read().items.get(key).cloned()
    }

    /// Inserts or replaces the value for `key`. New keys go at the end; only
    /// new keys count as a structural change.
    ///
    /// A key that holds this map is refused and the map is left as it was.
    /// The map may still hold itself as a value.
    pub fn insert(&self, key: PojoValue, value: PojoValue) -> Option<PojoValue> {
        if self.is_held_by(&key) {
            return None;
        }
        let mut guard = self.0.write();
        let (_, previous) = guard.items.insert_full(key, value);
        if previous.is_none() {
            guard.version += 1;
        }
        previous
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&self, key: &PojoValue) -> Option<PojoValue> {
        if self.is_held_by(key) {
            return None;
        }
        let mut guard = self.0.write();
        let removed = guard.items.shift_remove(key);
        if removed.is_some() {
            guard.version += 1;
        }
        removed
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut guard = self.0.write();
        if !guard.items.is_empty() {
            guard.items.clear();
            guard.version += 1;
        }
    }

    /// The modification counter.
    pub fn version(&self) -> u64 {
        self.0.read().version
    }

    /// Reads the entry at `index` together with the modification counter,
    /// both observed under the same lock.
    pub fn read_at(&self, index: usize) -> (u64, Option<PojoEntry>) {
        let guard = self.0.read();
        let entry = guard
            .items
            .get_index(index)
            .map(|(k, v)| PojoEntry::new(k.clone(), v.clone()));
        (guard.version, entry)
    }

    /// A copy of the current entries, in order.
    pub fn entries(&self) -> Vec<PojoEntry> {
        self.0
            .read()
            .items
            .iter()
            .map(|(k, v)| PojoEntry::new(k.clone(), v.clone()))
            .collect()
    }

    /// True if both handles share the same map.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    fn is_held_by(&self, key: &PojoValue) -> bool {
        holds(key, address(&self.0), &mut Vec::new())
    }

    /// Formats with `body`, or as `(this Map)` when nested inside itself.
    pub(crate) fn format_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        once(&FORMATTING, address(&self.0), f, |f| f.write_str("(this Map)"), body)
    }
}

impl Default for PojoMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(PojoValue, PojoValue)> for PojoMap {
    fn from_iter<I: IntoIterator<Item = (PojoValue, PojoValue)>>(iter: I) -> Self {
        PojoMap(Live::new(iter.into_iter().collect()))
    }
}

impl FromIterator<PojoEntry> for PojoMap {
    fn from_iter<I: IntoIterator<Item = PojoEntry>>(iter: I) -> Self {
        iter.into_iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl PartialEq for PojoMap {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.0.read().items == other.0.read().items
    }
}

impl Eq for PojoMap {}

impl Hash for PojoMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let nested = |state: &mut H| "(this Map)".hash(state);
        once(&HASHING, address(&self.0), state, nested, |state| {
            let entries = self.entries();
            entries.len().hash(state);
            unordered_hash(entries.iter()).hash(state);
        });
    }
}

impl fmt::Debug for PojoMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_with(f, |f| {
            f.write_str("Map")?;
            f.debug_map()
                .entries(self.entries().iter().map(|entry| (entry.key(), entry.value())))
                .finish()
        })
    }
}
