//! # digit-store
//!
//! A keyed record store for records identified by decimal-digit strings.
//!
//! Records sit in a fixed array of hash-bucket chains. A ten-way digit trie
//! maps every key to its bucket, so exact lookups go straight to one chain
//! and prefix queries walk the trie in key order. Both structures live behind
//! one lock and are updated together.
//!
//! ## Example
//!
//! ```rust
//! use digit_store::{Store, Student};
//!
//! let store = Store::new(200).unwrap();
//! store.set(Student::new("Ada", "9912001", 19.5, "CE")).unwrap();
//! store.set(Student::new("Alan", "9912002", 18.0, "CS")).unwrap();
//! store.set(Student::new("Grace", "9813001", 17.0, "EE")).unwrap();
//!
//! assert_eq!(store.get("9912002").unwrap().full_name, "Alan");
//! assert_eq!(store.keys_with_prefix("9912"), vec!["9912001", "9912002"]);
//!
//! assert!(store.delete("9912001"));
//! assert_eq!(store.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod hash;
pub mod record;
pub mod store;
pub mod student;
pub mod trie;

pub use error::StoreError;
pub use record::{is_digit_key, Record};
pub use store::{LoadStats, Store, StoreConfig};
pub use student::Student;
pub use trie::Trie;

#[cfg(test)]
mod proptests;
