//! HashSymTable: separate chaining over a bucket array that grows through
//! a fixed capacity schedule.
//!
//! Nodes live in a `SlotMap`; buckets and chain links are generational
//! keys into it. Growth allocates the next bucket array and relinks every
//! node in place, so keys and values never move or get copied.

use crate::error::{CreateError, PutError};
use crate::reentrancy::DebugReentrancy;
use crate::rolling_hash::BuildRollingHasher;
use crate::sym_table::{copy_key, SymTable};
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use log::{debug, trace, warn};
use slotmap::{DefaultKey, SlotMap};
use std::collections::TryReserveError;

/// Bucket counts the table moves through as it grows. Growth stops at the last.
pub const BUCKET_COUNTS: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

type Link = Option<DefaultKey>;

#[derive(Debug)]
struct Entry<V> {
    key: Box<str>,
    value: V,
    next: Link,
}

pub struct HashSymTable<V, S = BuildRollingHasher> {
    hasher: S,
    buckets: Vec<Link>,
    slots: SlotMap<DefaultKey, Entry<V>>, // node storage; len() is the entry count
    schedule_index: usize,
    reentrancy: DebugReentrancy,
}

fn alloc_buckets(count: usize) -> Result<Vec<Link>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count)?;
    buckets.resize(count, None);
    Ok(buckets)
}

fn bucket_index<S: BuildHasher>(hasher: &S, key: &str, bucket_count: usize) -> usize {
    let mut h = hasher.build_hasher();
    h.write(key.as_bytes());
    (h.finish() % bucket_count as u64) as usize
}

/// Advance one step along the schedule and relink every node into the
/// bucket its key selects under the new capacity.
///
/// Each old chain is reversed before relinking so that keys which still
/// share a chain afterwards keep their newest-first order.
fn grow<V, S: BuildHasher>(
    hasher: &S,
    buckets: &mut Vec<Link>,
    slots: &mut SlotMap<DefaultKey, Entry<V>>,
    schedule_index: &mut usize,
) {
    let new_count = BUCKET_COUNTS[*schedule_index + 1];
    let new_buckets = match alloc_buckets(new_count) {
        Ok(b) => b,
        Err(e) => {
            warn!(
                "symbol table growth to {} buckets skipped: {}; staying at {}",
                new_count,
                e,
                buckets.len()
            );
            return;
        }
    };

    let old_buckets = core::mem::replace(buckets, new_buckets);
    for head in old_buckets {
        let mut oldest_first: Link = None;
        let mut cursor = head;
        while let Some(k) = cursor {
            let entry = &mut slots[k];
            cursor = core::mem::replace(&mut entry.next, oldest_first);
            oldest_first = Some(k);
        }

        let mut cursor = oldest_first;
        while let Some(k) = cursor {
            let entry = &mut slots[k];
            cursor = entry.next;
            let b = bucket_index(hasher, &entry.key, new_count);
            entry.next = buckets[b];
            buckets[b] = Some(k);
        }
    }
    *schedule_index += 1;
    debug!(
        "symbol table grew to {} buckets ({} entries)",
        new_count,
        slots.len()
    );
}

impl<V> HashSymTable<V> {
    /// Empty table at the first scheduled capacity.
    pub fn new() -> Self {
        Self::with_hasher(BuildRollingHasher)
    }

    /// Like [`new`](Self::new), but reports allocation failure instead of aborting.
    pub fn try_new() -> Result<Self, CreateError> {
        Self::try_with_hasher(BuildRollingHasher)
    }
}

impl<V> Default for HashSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over bindings in traversal order: bucket index ascending, then
/// chain order. Keys that have always shared a chain come newest first;
/// keys that growth brought together from different old chains carry no
/// insertion-order guarantee relative to each other.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Link>,
    slots: &'a SlotMap<DefaultKey, Entry<V>>,
    cursor: Link,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cursor {
                let slots = self.slots;
                let entry = &slots[k];
                self.cursor = entry.next;
                self.remaining -= 1;
                return Some((&*entry.key, &entry.value));
            }
            self.cursor = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Iterator over bindings with mutable values, in storage order.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&*e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V, S> HashSymTable<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        trace!("creating symbol table with {} buckets", BUCKET_COUNTS[0]);
        Self {
            hasher,
            buckets: vec![None; BUCKET_COUNTS[0]],
            slots: SlotMap::with_key(),
            schedule_index: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn try_with_hasher(hasher: S) -> Result<Self, CreateError> {
        let buckets = alloc_buckets(BUCKET_COUNTS[0]).map_err(|source| CreateError {
            buckets: BUCKET_COUNTS[0],
            source,
        })?;
        trace!("creating symbol table with {} buckets", buckets.len());
        Ok(Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            schedule_index: 0,
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets; always one of [`BUCKET_COUNTS`].
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(&self.hasher, key, self.buckets.len())
    }

    fn find_in(&self, bucket: usize, key: &str) -> Link {
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if &*entry.key == key {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        let _g = self.reentrancy.enter("contains");
        self.find_in(self.bucket_of(key), key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let _g = self.reentrancy.enter("get");
        let k = self.find_in(self.bucket_of(key), key)?;
        Some(&self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let _g = self.reentrancy.enter("get_mut");
        let k = self.find_in(self.bucket_of(key), key)?;
        Some(&mut self.slots[k].value)
    }

    /// Bind `key` to `value`, prepending the new node to its bucket chain.
    ///
    /// Once the entry count exceeds the bucket count the table grows to the
    /// next scheduled capacity. A growth step that cannot allocate is
    /// skipped; the insertion still succeeds.
    pub fn put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        let _g = self.reentrancy.enter("put");
        let bucket = self.bucket_of(key);
        if self.find_in(bucket, key).is_some() {
            return Err(PutError::DuplicateKey);
        }

        self.slots.try_reserve(1)?;
        let key = copy_key(key)?;
        let next = self.buckets[bucket];
        let k = self.slots.insert(Entry { key, value, next });
        self.buckets[bucket] = Some(k);

        if self.slots.len() > self.buckets.len() && self.schedule_index + 1 < BUCKET_COUNTS.len() {
            // Still under the guard: growth rehashes every key.
            grow(
                &self.hasher,
                &mut self.buckets,
                &mut self.slots,
                &mut self.schedule_index,
            );
        }
        Ok(())
    }

    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("replace");
        let k = self.find_in(self.bucket_of(key), key)?;
        Some(core::mem::replace(&mut self.slots[k].value, value))
    }

    /// Unlink `key`'s node, drop its key copy and hand back its value.
    /// The bucket array never shrinks.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let _g = self.reentrancy.enter("remove");
        let bucket = self.bucket_of(key);
        let mut prev: Link = None;
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if &*entry.key == key {
                let next = entry.next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.slots[p].next = next,
                }
                return self.slots.remove(k).map(|e| e.value);
            }
            prev = cursor;
            cursor = entry.next;
        }
        None
    }

    /// Visit every binding in traversal order (see [`Iter`]).
    ///
    /// The table is mutably borrowed for the whole walk, so the visitor
    /// cannot insert or remove.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut V),
    {
        for b in 0..self.buckets.len() {
            let mut cursor = self.buckets[b];
            while let Some(k) = cursor {
                let entry = &mut self.slots[k];
                cursor = entry.next;
                f(&*entry.key, &mut entry.value);
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            slots: &self.slots,
            cursor: None,
            remaining: self.slots.len(),
        }
    }

    /// Mutable iteration in node storage order, which is unrelated to
    /// bucket order. Use [`for_each`](Self::for_each) for traversal order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Walk every chain and check the structural invariants.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(BUCKET_COUNTS[self.schedule_index], self.buckets.len());
        let mut reachable = 0;
        let mut seen = std::collections::HashSet::new();
        for (b, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(k) = cursor {
                let entry = self.slots.get(k).expect("chain links a live node");
                assert_eq!(
                    bucket_index(&self.hasher, &entry.key, self.buckets.len()),
                    b,
                    "entry {:?} is chained in the wrong bucket",
                    entry.key
                );
                assert!(seen.insert(entry.key.clone()), "duplicate key {:?}", entry.key);
                reachable += 1;
                cursor = entry.next;
            }
        }
        assert_eq!(reachable, self.slots.len());
    }

    #[cfg(test)]
    pub(crate) fn bucket_index_of(&self, key: &str) -> usize {
        self.bucket_of(key)
    }
}

impl<V, S: BuildHasher> SymTable<V> for HashSymTable<V, S> {
    fn len(&self) -> usize {
        HashSymTable::len(self)
    }

    fn put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        HashSymTable::put(self, key, value)
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        HashSymTable::replace(self, key, value)
    }

    fn contains(&self, key: &str) -> bool {
        HashSymTable::contains(self, key)
    }

    fn get(&self, key: &str) -> Option<&V> {
        HashSymTable::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        HashSymTable::get_mut(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        HashSymTable::remove(self, key)
    }

    fn for_each<F>(&mut self, f: F)
    where
        F: FnMut(&str, &mut V),
    {
        HashSymTable::for_each(self, f)
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for HashSymTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, S: BuildHasher> IntoIterator for &'a HashSymTable<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
