//! Error type shared by the store and its callers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store capacity must be at least 1, got {capacity}")]
    InvalidCapacity { capacity: usize },
    #[error("key `{key}` is not a non-empty string of decimal digits")]
    InvalidKey { key: String },
    #[error("key `{key}` not found")]
    KeyNotFound { key: String },
    /// The trie and the bucket array disagree about `key`.
    #[error("trie index and bucket {bucket} disagree about key `{key}`")]
    InternalInconsistency { key: String, bucket: usize },
    #[error("live count {count} does not match the {records} records held")]
    CountMismatch { count: usize, records: usize },
}

impl StoreError {
    /// `true` for the variants that signal a broken key-index invariant.
    pub fn is_inconsistency(&self) -> bool {
        matches!(
            self,
            StoreError::InternalInconsistency { .. } | StoreError::CountMismatch { .. }
        )
    }
}
