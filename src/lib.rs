//! symtable: a mutable symbol table mapping owned string keys to
//! caller-supplied values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an in-memory key/value container for things like a compiler's
//!   symbol table, with a storage engine whose invariants are easy to
//!   check: unique keys, a fixed bucket-count progression, and exclusive
//!   ownership of every key copy.
//! - Engines:
//!   - HashSymTable<V, S>: separate chaining. Buckets are chain heads into a
//!     `SlotMap` of nodes; a node is prepended to the chain its key hashes
//!     to. Growth rebuilds the bucket array at the next capacity of
//!     `BUCKET_COUNTS` and relinks every node.
//!   - ListSymTable<V>: one unsorted linked list, linear scans. Same
//!     contract, O(n) per operation.
//!   - Both implement the `SymTable<V>` trait.
//!
//! Constraints
//! - Single-threaded: no internal locking. Tables are `Send`, so callers
//!   who need shared access wrap one in a `Mutex`.
//! - Keys are copied on `put` and immutable afterwards; there is no
//!   `key_mut`. Equality is exact byte equality.
//! - Values are moved in and handed back by `replace`/`remove`; the table
//!   never looks at them. Store `&T` or `Rc<T>` to keep ownership outside.
//! - Duplicate `put` fails and leaves the table unchanged.
//!
//! Growth
//! - After a successful `put`, if `len() > capacity()` and the capacity is
//!   below 65521, the table moves to the next scheduled capacity. Each step
//!   touches every entry once; steps happen at most once per threshold, so
//!   insertion is amortized O(1) below the ceiling.
//! - At 65521 buckets growth stops and chains grow without bound.
//! - Buckets are never given back on `remove`.
//! - If the larger bucket array cannot be allocated the step is skipped and
//!   logged at `warn`; the insertion that triggered it still succeeds.
//!
//! Hashing
//! - Default hasher is the 65599 rolling hash over the key's bytes
//!   (`rolling_hash`), reduced modulo the bucket count. It is not
//!   resistant to chosen-key flooding; pass `RandomState` (or any
//!   `BuildHasher`) to `with_hasher` when keys come from untrusted input.
//! - The hasher is caller code running mid-operation, so HashSymTable
//!   carries a debug-only reentrancy guard.
//!
//! Traversal
//! - `for_each`/`map`/`iter` walk buckets in ascending index and each
//!   chain from its head. The visitor holds the table mutably borrowed, so
//!   inserting or removing during traversal does not compile.

pub mod error;
pub mod hash_sym_table;
pub mod list_sym_table;
mod reentrancy;
pub mod rolling_hash;
pub mod sym_table;
mod sym_table_proptest;

// Public surface
pub use error::{CreateError, PutError};
pub use hash_sym_table::{HashSymTable, BUCKET_COUNTS};
pub use list_sym_table::ListSymTable;
pub use rolling_hash::{rolling_hash, BuildRollingHasher, RollingHasher};
pub use sym_table::SymTable;
