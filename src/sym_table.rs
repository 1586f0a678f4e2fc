//! The operation contract shared by every symbol table engine.

use crate::error::PutError;

/// A mutable mapping from owned string keys to caller-supplied values.
///
/// Keys are copied on insertion and never change afterwards. Values are
/// moved in and handed back by `replace`/`remove`; the table never
/// inspects them. Absence is reported as `None`, never as an error.
pub trait SymTable<V> {
    /// Number of live bindings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind `key` to `value` unless `key` is already bound.
    ///
    /// On `Err` the table is exactly as it was before the call.
    fn put(&mut self, key: &str, value: V) -> Result<(), PutError>;

    /// Swap the value bound to `key`, returning the previous one.
    fn replace(&mut self, key: &str, value: V) -> Option<V>;

    fn contains(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<&V>;

    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Unbind `key`, releasing its key copy and returning its value.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Visit every binding once, in the engine's traversal order.
    fn for_each<F>(&mut self, f: F)
    where
        F: FnMut(&str, &mut V);

    /// Visit every binding once, threading `extra` through each call.
    fn map<C, F>(&mut self, mut f: F, extra: &mut C)
    where
        C: ?Sized,
        F: FnMut(&str, &mut V, &mut C),
    {
        self.for_each(|key, value| f(key, value, extra));
    }
}

/// Owned copy of `key`; fails instead of aborting when memory is short.
pub(crate) fn copy_key(key: &str) -> Result<Box<str>, PutError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}
