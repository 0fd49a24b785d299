//! Hash functions for picking a record's bucket.
//!
//! Both run in O(key length). Digit keys are short, so in practice this is
//! constant per operation. Measured over student-id shaped keys at load
//! factors 4 to 8, FNV-1a gives the lower chain-length deviation, which is
//! why [`Record::hash`](crate::Record::hash) defaults to it.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
#[inline]
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Jenkins one-at-a-time, widened to 64 bits.
#[inline]
pub fn jenkins_one_at_a_time(bytes: &[u8]) -> u64 {
    let mut h = 0u64;
    for &b in bytes {
        h = h.wrapping_add(u64::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h.wrapping_add(h << 15)
}
