//! Chained hash table indexed by a digit trie.
//!
//! Records live in a fixed array of bucket chains. The bucket for a record
//! is `record.hash() % capacity`, and the array is never resized. A
//! [`Trie`] maps each key to the bucket holding it, which gives exact lookups
//! a direct jump to one chain and gives prefix queries an ordered walk
//! without touching the buckets at all.
//!
//! One `RwLock` guards the buckets and the trie together. Mutations take it
//! exclusively for their whole duration, so no reader can observe a trie
//! entry without its record or a record without its trie entry.

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use crate::error::StoreError;
use crate::record::{is_digit_key, Record};
use crate::trie::Trie;

/// Load factor used when a caller asks for one that makes no sense.
const DEFAULT_LOAD_FACTOR: f64 = 4.0;

/// Configuration for a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of buckets. Fixed for the store's lifetime.
    pub capacity: usize,
    /// Slots reserved up front in every bucket chain.
    pub chain_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            chain_capacity: 20,
        }
    }
}

impl StoreConfig {
    /// Size the bucket array so `records` keys land at roughly `load_factor`
    /// keys per bucket. Chains stay short with a load factor of 4 to 8.
    pub fn for_expected_records(records: usize, load_factor: f64) -> Self {
        let load_factor = if load_factor.is_finite() && load_factor > 0.0 {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };
        let capacity = ((records as f64 / load_factor).ceil() as usize).max(1);
        Self {
            capacity,
            chain_capacity: (load_factor.ceil() as usize).saturating_mul(2),
        }
    }
}

/// Chain-length distribution across the bucket array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Shortest chain
    pub min: usize,
    /// Longest chain
    pub max: usize,
    /// Mean chain length (the load factor)
    pub mean: f64,
    /// Population standard deviation of chain lengths
    pub std_dev: f64,
    /// Buckets holding no record
    pub empty_buckets: usize,
}

impl LoadStats {
    fn from_lengths(lengths: &[usize]) -> Self {
        if lengths.is_empty() {
            return Self::default();
        }
        let n = lengths.len() as f64;
        let mean = lengths.iter().sum::<usize>() as f64 / n;
        let variance = lengths
            .iter()
            .map(|&l| {
                let d = l as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Self {
            min: lengths.iter().copied().min().unwrap_or(0),
            max: lengths.iter().copied().max().unwrap_or(0),
            mean,
            std_dev: variance.sqrt(),
            empty_buckets: lengths.iter().filter(|&&l| l == 0).count(),
        }
    }
}

/// Everything the lock protects.
struct Table<R> {
    buckets: Vec<Vec<R>>,
    count: usize,
    /// Key -> bucket index.
    index: Trie<usize>,
}

impl<R: Record> Table<R> {
    /// Resolve `key` to its `(bucket, slot)` position.
    fn locate(&self, key: &str) -> Result<(usize, usize), StoreError> {
        let bucket = *self.index.search(key).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_owned(),
        })?;
        match self.slot_of(bucket, key) {
            Some(slot) => Ok((bucket, slot)),
            None => Err(inconsistency(key, bucket)),
        }
    }

    fn slot_of(&self, bucket: usize, key: &str) -> Option<usize> {
        self.buckets
            .get(bucket)?
            .iter()
            .position(|r| r.key() == key)
    }

    /// Join every indexed key under `prefix` back to its record.
    fn pairs(&self, prefix: &str) -> Vec<(String, R)>
    where
        R: Clone,
    {
        let mut pairs = Vec::new();
        self.index.visit(prefix, |key, &bucket| match self.slot_of(bucket, key) {
            Some(slot) => pairs.push((key.to_owned(), self.buckets[bucket][slot].clone())),
            None => {
                // Reported; the pair is left out.
                let _ = inconsistency(key, bucket);
            }
        });
        pairs
    }
}

/// Log and build an inconsistency error.
fn inconsistency(key: &str, bucket: usize) -> StoreError {
    error!(key, bucket, "trie index and bucket array disagree");
    StoreError::InternalInconsistency {
        key: key.to_owned(),
        bucket,
    }
}

/// A thread-safe keyed record store.
///
/// Keys are non-empty strings of ASCII digits. All methods take `&self`;
/// share the store between threads behind an `Arc`.
pub struct Store<R> {
    inner: RwLock<Table<R>>,
    capacity: usize,
}

impl<R: Record> Store<R> {
    /// Create a store with `capacity` buckets.
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        Self::with_config(StoreConfig {
            capacity,
            ..StoreConfig::default()
        })
    }

    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        if config.capacity == 0 {
            return Err(StoreError::InvalidCapacity {
                capacity: config.capacity,
            });
        }
        debug!(capacity = config.capacity, chain_capacity = config.chain_capacity, "creating store");

        let buckets = (0..config.capacity)
            .map(|_| Vec::with_capacity(config.chain_capacity))
            .collect();
        Ok(Self {
            inner: RwLock::new(Table {
                buckets,
                count: 0,
                index: Trie::new(),
            }),
            capacity: config.capacity,
        })
    }

    /// Insert `record`, or replace the record already stored under its key.
    ///
    /// Returns the bucket index the record landed in.
    pub fn set(&self, record: R) -> Result<usize, StoreError> {
        let key = record.key().into_owned();
        if !is_digit_key(&key) {
            warn!(key = %key, "rejecting record without a decimal-digit key");
            return Err(StoreError::InvalidKey { key });
        }
        let bucket = self.bucket_for(&record);

        let mut guard = self.inner.write();
        let table = &mut *guard;
        let chain = &mut table.buckets[bucket];
        match chain.iter_mut().find(|slot| slot.equals(&record)) {
            Some(slot) => {
                *slot = record;
                trace!(key = %key, bucket, "updated record");
            }
            None => {
                chain.push(record);
                table.count += 1;
                trace!(key = %key, bucket, "inserted record");
            }
        }
        // Updates rewrite the entry too, keeping both sides in step.
        table.index.insert(&key, bucket);
        Ok(bucket)
    }

    /// Fetch a copy of the record stored under `key`.
    ///
    /// A broken index is logged and reported as not found; use
    /// [`Store::try_get`] to tell the two apart.
    pub fn get(&self, key: &str) -> Option<R>
    where
        R: Clone,
    {
        self.try_get(key).ok()
    }

    pub fn try_get(&self, key: &str) -> Result<R, StoreError>
    where
        R: Clone,
    {
        let table = self.inner.read();
        let (bucket, slot) = table.locate(key)?;
        Ok(table.buckets[bucket][slot].clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().index.contains(key)
    }

    /// Remove the record stored under `key`. Returns `false` if there was
    /// none.
    pub fn delete(&self, key: &str) -> bool {
        self.try_delete(key).is_ok()
    }

    /// Remove and return the record stored under `key`.
    pub fn try_delete(&self, key: &str) -> Result<R, StoreError> {
        let mut guard = self.inner.write();
        let table = &mut *guard;

        let bucket = table.index.delete(key).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_owned(),
        })?;
        let slot = table
            .slot_of(bucket, key)
            .ok_or_else(|| inconsistency(key, bucket))?;

        let record = table.buckets[bucket].swap_remove(slot);
        table.count -= 1;
        trace!(key, bucket, "deleted record");
        Ok(record)
    }

    /// All keys in ascending digit order.
    pub fn all_keys(&self) -> Vec<String> {
        self.inner.read().index.get_all_keys()
    }

    /// Keys starting with `prefix`. An empty prefix yields nothing.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.inner.read().index.get_keys_with_prefix(prefix)
    }

    /// Bucket indices of the keys starting with `prefix`, in key order.
    pub fn bucket_indices_with_prefix(&self, prefix: &str) -> Vec<usize> {
        self.inner
            .read()
            .index
            .get_prefix_values(prefix)
            .into_iter()
            .copied()
            .collect()
    }

    /// Every `(key, record)` pair, taken as one snapshot.
    pub fn all_pairs(&self) -> Vec<(String, R)>
    where
        R: Clone,
    {
        self.inner.read().pairs("")
    }

    /// `(key, record)` pairs whose key starts with `prefix`. An empty prefix
    /// yields nothing.
    pub fn pairs_with_prefix(&self, prefix: &str) -> Vec<(String, R)>
    where
        R: Clone,
    {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.inner.read().pairs(prefix)
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.inner.read().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Chain length of every bucket, in bucket order.
    pub fn bucket_lengths(&self) -> Vec<usize> {
        self.inner.read().buckets.iter().map(Vec::len).collect()
    }

    pub fn load_stats(&self) -> LoadStats {
        LoadStats::from_lengths(&self.bucket_lengths())
    }

    /// Verify that the trie and the bucket array describe the same key set.
    ///
    /// Every indexed key must sit exactly once in the bucket it points at,
    /// every stored record must be indexed at its own bucket, and the live
    /// count must match both.
    pub fn check_consistency(&self) -> Result<(), StoreError> {
        let table = self.inner.read();

        let mut broken = None;
        table.index.visit("", |key, &bucket| {
            if broken.is_some() {
                return;
            }
            let hits = table
                .buckets
                .get(bucket)
                .map_or(0, |chain| chain.iter().filter(|r| r.key() == key).count());
            if hits != 1 {
                broken = Some(inconsistency(key, bucket));
            }
        });
        if let Some(err) = broken {
            return Err(err);
        }

        let mut records = 0;
        for (bucket, chain) in table.buckets.iter().enumerate() {
            for record in chain {
                let key = record.key();
                if table.index.search(&key) != Some(&bucket) {
                    return Err(inconsistency(&key, bucket));
                }
                records += 1;
            }
        }

        if table.count != records || table.index.len() != records {
            error!(count = table.count, records, indexed = table.index.len(), "live count drifted");
            return Err(StoreError::CountMismatch {
                count: table.count,
                records,
            });
        }
        Ok(())
    }

    fn bucket_for(&self, record: &R) -> usize {
        (record.hash() % self.capacity as u64) as usize
    }
}

impl<R> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.inner.read();
        f.debug_struct("Store")
            .field("capacity", &self.capacity)
            .field("len", &table.count)
            .field("index", &table.index)
            .finish()
    }
}
