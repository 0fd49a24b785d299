use super::*;

use proptest::prelude::*;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Set(String, u32),
    Delete(String),
    Get(String),
    Prefix(String),
}

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    key: String,
    value: u32,
}

impl Record for Entry {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.key)
    }
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // A narrow alphabet and short keys give plenty of shared prefixes and
    // repeated keys.
    "[0-3]{1,5}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        45 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        25 => key.clone().prop_map(Op::Delete),
        20 => key.clone().prop_map(Op::Get),
        10 => "[0-3]{0,3}".prop_map(Op::Prefix),
    ];
    prop::collection::vec(op, 0..=600)
}

fn model_prefix(m: &BTreeMap<String, u32>, prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        return Vec::new();
    }
    m.keys().filter(|k| k.starts_with(prefix)).cloned().collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_trie_equivalence(ops in ops_strategy()) {
        let mut t: Trie<u32> = Trie::new();
        let mut m: BTreeMap<String, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(key, value) => {
                    prop_assert_eq!(t.insert(&key, value), m.insert(key, value));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(t.delete(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.search(&key), m.get(&key));
                }
                Op::Prefix(prefix) => {
                    prop_assert_eq!(t.get_keys_with_prefix(&prefix), model_prefix(&m, &prefix));
                    let values: Vec<u32> = t.get_prefix_values(&prefix).into_iter().copied().collect();
                    let expected: Vec<u32> = model_prefix(&m, &prefix).iter().map(|k| m[k]).collect();
                    prop_assert_eq!(values, expected);
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        t.validate();
        let expected: Vec<String> = m.keys().cloned().collect();
        prop_assert_eq!(t.get_all_keys(), expected);

        for key in m.keys() {
            t.delete(key);
        }
        t.validate();
        prop_assert_eq!(t.node_count(), 1);
    }

    #[test]
    fn prop_store_equivalence(capacity in 1usize..16, ops in ops_strategy()) {
        let store: Store<Entry> = Store::new(capacity).unwrap();
        let mut m: BTreeMap<String, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(key, value) => {
                    let bucket = store.set(Entry { key: key.clone(), value }).unwrap();
                    prop_assert!(bucket < capacity);
                    m.insert(key, value);
                }
                Op::Delete(key) => {
                    prop_assert_eq!(store.delete(&key), m.remove(&key).is_some());
                    prop_assert!(!store.contains(&key));
                }
                Op::Get(key) => {
                    let got = store.get(&key).map(|e| e.value);
                    prop_assert_eq!(got, m.get(&key).copied());
                }
                Op::Prefix(prefix) => {
                    let expected = model_prefix(&m, &prefix);
                    prop_assert_eq!(store.keys_with_prefix(&prefix), expected.clone());

                    let pairs: Vec<(String, u32)> = store
                        .pairs_with_prefix(&prefix)
                        .into_iter()
                        .map(|(k, e)| (k, e.value))
                        .collect();
                    let expected_pairs: Vec<(String, u32)> =
                        expected.into_iter().map(|k| { let v = m[&k]; (k, v) }).collect();
                    prop_assert_eq!(pairs, expected_pairs);
                }
            }
            prop_assert_eq!(store.len(), m.len());
        }

        prop_assert_eq!(store.check_consistency(), Ok(()));
        let all: Vec<(String, u32)> = store.all_pairs().into_iter().map(|(k, e)| (k, e.value)).collect();
        let expected: Vec<(String, u32)> = m.into_iter().collect();
        prop_assert_eq!(all, expected);
        prop_assert_eq!(store.bucket_lengths().iter().sum::<usize>(), store.len());
    }

    #[test]
    fn prop_prefix_is_filtered_all_keys(keys in prop::collection::btree_set("[0-9]{1,8}", 0..200), prefix in "[0-9]{1,3}") {
        let mut t: Trie<()> = Trie::new();
        for key in &keys {
            t.insert(key, ());
        }
        let filtered: Vec<String> = t.get_all_keys().into_iter().filter(|k| k.starts_with(&prefix)).collect();
        prop_assert_eq!(t.get_keys_with_prefix(&prefix), filtered);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["1", "2", "3", "11", "12", "21"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t: Trie<u64> = Trie::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.insert(k, v), m.insert(k.to_owned(), v));
        }

        t.validate();
        // 1, 2, 3 under the root plus 11, 12, 21 below them.
        assert_eq!(t.node_count(), 7);
        let expected: Vec<String> = m.keys().cloned().collect();
        assert_eq!(t.get_all_keys(), expected);
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    // Insert in a fixed order, then delete in all permutations.
    let mut base_trie: Trie<u64> = Trie::new();
    let mut base_map: BTreeMap<String, u64> = BTreeMap::new();
    for (i, k) in SMALL_SET.iter().enumerate() {
        let v = i as u64;
        assert_eq!(base_trie.insert(k, v), base_map.insert(k.to_string(), v));
    }

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base_trie.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.delete(k), m.remove(k));
            assert_eq!(t.len(), m.len());
            t.validate();
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    });
}
