//! Debug-only guard against reentrant table operations.
//!
//! A `HashSymTable` runs caller code in the middle of its operations:
//! the `BuildHasher`/`Hasher` it was built with. The guard records
//! which operation is in progress; entering a second one before the first
//! guard is dropped panics in debug builds. Release builds compile it away.

#[cfg(debug_assertions)]
use core::cell::Cell;

/// Per-table tracker. Public operations start with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Mark `op` as in progress until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> OperationGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant symbol table call: `{op}` entered while `{outer}` is in progress");
            }
            self.active.set(Some(op));
        }
        #[cfg(not(debug_assertions))]
        let _ = op;

        OperationGuard { owner: self }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

/// Clears the in-progress operation on drop, including during unwinding.
pub(crate) struct OperationGuard<'a> {
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    owner: &'a DebugReentrancy,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
