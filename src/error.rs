//! Error types for the fallible symbol table operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Why `put` did not insert.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PutError {
    /// An entry with an equal key already exists; the table is unchanged.
    #[error("key is already bound")]
    DuplicateKey,
    /// The owned copy of the key could not be allocated; the table is unchanged.
    #[error("out of memory while copying key")]
    OutOfMemory(#[from] TryReserveError),
}

/// The initial bucket array could not be allocated.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("out of memory while allocating {buckets} buckets")]
pub struct CreateError {
    pub buckets: usize,
    #[source]
    pub source: TryReserveError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn reserve_failure() -> TryReserveError {
        Vec::<u8>::new()
            .try_reserve(usize::MAX)
            .expect_err("usize::MAX bytes overflows capacity")
    }

    #[test]
    fn out_of_memory_converts_and_keeps_source() {
        let err: PutError = reserve_failure().into();
        assert!(matches!(err, PutError::OutOfMemory(_)));
        assert_eq!(err.to_string(), "out of memory while copying key");
        assert!(err.source().is_some());
        assert!(PutError::DuplicateKey.source().is_none());
    }

    #[test]
    fn create_error_names_bucket_count() {
        let err = CreateError {
            buckets: 509,
            source: reserve_failure(),
        };
        assert_eq!(err.to_string(), "out of memory while allocating 509 buckets");
        assert!(err.source().is_some());
    }
}
