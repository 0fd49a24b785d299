//! The capability set a value needs to live in a [`Store`](crate::Store).

use std::borrow::Cow;

use crate::hash;

/// A keyed, hashable record.
///
/// The key must be a non-empty string of ASCII digits. Callers with other
/// identifiers encode them first (for example by rendering a numeric id in
/// decimal).
pub trait Record {
    /// The record's identifying key.
    fn key(&self) -> Cow<'_, str>;

    /// Hash used to pick the record's bucket. Must be deterministic for the
    /// lifetime of the process.
    fn hash(&self) -> u64 {
        hash::fnv1a_64(self.key().as_bytes())
    }

    /// Key identity, not structural equality: two records with the same key
    /// are the same slot even when their payloads differ.
    fn equals(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// `true` if `key` is a non-empty run of ASCII digits.
#[inline]
pub fn is_digit_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
