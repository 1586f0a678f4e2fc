//! ListSymTable: the same contract over one unsorted singly linked list.
//!
//! Every operation is a linear scan. New bindings go to the head, so
//! traversal runs from the most recently inserted binding to the oldest.
//! Useful for small tables and as a reference engine in tests.

use crate::error::PutError;
use crate::sym_table::{copy_key, SymTable};
use core::fmt;

type Link<V> = Option<Box<Node<V>>>;

struct Node<V> {
    key: Box<str>,
    value: V,
    next: Link<V>,
}

pub struct ListSymTable<V> {
    head: Link<V>,
    len: usize,
}

impl<V> ListSymTable<V> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if &*node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    pub fn put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        if self.contains(key) {
            return Err(PutError::DuplicateKey);
        }
        let key = copy_key(key)?;
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len += 1;
        Ok(())
    }

    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        self.get_mut(key).map(|slot| core::mem::replace(slot, value))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| &*node.key != key) {
            link = &mut link.as_mut()?.next;
        }
        let mut node = link.take()?;
        *link = node.next.take();
        self.len -= 1;
        Some(node.value)
    }

    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut V),
    {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            f(&*node.key, &mut node.value);
            cursor = node.next.as_deref_mut();
        }
    }

    /// Bindings from most recently inserted to oldest.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cursor: self.head.as_deref(),
            remaining: self.len,
        }
    }
}

impl<V> Default for ListSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for ListSymTable<V> {
    // Unlink node by node; the default recursive drop can overflow the
    // stack on long lists.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

pub struct Iter<'a, V> {
    cursor: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = node.next.as_deref();
        self.remaining -= 1;
        Some((&*node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> SymTable<V> for ListSymTable<V> {
    fn len(&self) -> usize {
        ListSymTable::len(self)
    }

    fn put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        ListSymTable::put(self, key, value)
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        ListSymTable::replace(self, key, value)
    }

    fn contains(&self, key: &str) -> bool {
        ListSymTable::contains(self, key)
    }

    fn get(&self, key: &str) -> Option<&V> {
        ListSymTable::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        ListSymTable::get_mut(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        ListSymTable::remove(self, key)
    }

    fn for_each<F>(&mut self, f: F)
    where
        F: FnMut(&str, &mut V),
    {
        ListSymTable::for_each(self, f)
    }
}

impl<V: fmt::Debug> fmt::Debug for ListSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn head_insertion_order() {
        let mut t = ListSymTable::new();
        for (i, k) in ["first", "second", "third"].iter().enumerate() {
            t.put(k, i).unwrap();
        }
        let keys: Vec<&str> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["third", "second", "first"]);

        let mut visited = Vec::new();
        t.for_each(|k, v| visited.push((k.to_string(), *v)));
        assert_eq!(visited[0], ("third".to_string(), 2));
        assert_eq!(visited.len(), 3);
    }

    #[test]
    fn duplicate_put_rejected() {
        let mut t = ListSymTable::new();
        t.put("k", 1).unwrap();
        assert_eq!(t.put("k", 2), Err(PutError::DuplicateKey));
        assert_eq!(t.get("k"), Some(&1));
        assert_eq!(t.len(), 1);
    }

    /// Removal at head, middle and tail keeps the rest of the list linked.
    #[test]
    fn remove_at_each_position() {
        for victim in ["a", "b", "c"] {
            let mut t = ListSymTable::new();
            for k in ["a", "b", "c"] {
                t.put(k, k.to_uppercase()).unwrap();
            }
            assert_eq!(t.remove(victim), Some(victim.to_uppercase()));
            assert_eq!(t.len(), 2);
            assert!(!t.contains(victim));
            for k in ["a", "b", "c"].into_iter().filter(|k| *k != victim) {
                assert_eq!(t.get(k), Some(&k.to_uppercase()));
            }
            assert_eq!(t.remove(victim), None);
        }
    }

    #[test]
    fn replace_and_get_mut() {
        let mut t = ListSymTable::new();
        t.put("x", 1).unwrap();
        assert_eq!(t.replace("x", 5), Some(1));
        assert_eq!(t.replace("y", 5), None);
        *t.get_mut("x").unwrap() += 1;
        assert_eq!(t.get("x"), Some(&6));
        assert!(!t.contains("y"));
    }

    #[test]
    fn drop_releases_values_and_survives_long_lists() {
        let marker = Rc::new(());
        let mut t = ListSymTable::new();
        t.put("via-put", Rc::clone(&marker)).unwrap();
        // Prepend directly; going through `put` would make the fill quadratic.
        for i in 0..199_999 {
            let next = t.head.take();
            t.head = Some(Box::new(Node {
                key: i.to_string().into_boxed_str(),
                value: Rc::clone(&marker),
                next,
            }));
            t.len += 1;
        }
        assert_eq!(t.len(), 200_000);
        assert_eq!(Rc::strong_count(&marker), 200_001);
        drop(t);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn debug_lists_bindings() {
        let mut t = ListSymTable::new();
        t.put("a", 1).unwrap();
        t.put("b", 2).unwrap();
        assert_eq!(format!("{:?}", t), r#"{"b": 2, "a": 1}"#);
    }
}
