//! Decimal-digit trie with arena-allocated nodes.
//!
//! Every node has a fixed fan-out of ten, one slot per digit. Nodes live in a
//! single `Vec` and refer to their children through 32-bit indices, so the
//! tree owns nothing upward. Deleting a key walks the recorded descent path
//! back toward the root and unlinks every node left without a value or a
//! child. Freed slots go on a free list and are reused by later inserts.
//!
//! Symbols are stored as digit values `0..=9`, not as ASCII bytes. Keys are
//! translated on the way in and rebuilt as strings only for output.

use std::fmt;

use smallvec::SmallVec;

use crate::record::is_digit_key;

const RADIX: usize = 10;

/// Descent paths up to this depth stay on the stack.
const INLINE_PATH: usize = 24;

/// A 32-bit reference to a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
struct NodeRef(u32);

impl NodeRef {
    const NULL: NodeRef = NodeRef(u32::MAX);
    const ROOT: NodeRef = NodeRef(0);

    #[inline]
    fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize);
        NodeRef(idx as u32)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone)]
struct Node<V> {
    /// Digit value of the edge leading here. Meaningless for the root.
    symbol: u8,
    children: [NodeRef; RADIX],
    /// Number of non-null entries in `children`.
    live: u8,
    value: Option<V>,
}

impl<V> Node<V> {
    fn new(symbol: u8) -> Self {
        Self {
            symbol,
            children: [NodeRef::NULL; RADIX],
            live: 0,
            value: None,
        }
    }

    /// Holds nothing and leads nowhere.
    #[inline]
    fn is_dead(&self) -> bool {
        self.value.is_none() && self.live == 0
    }
}

#[inline]
fn digit(b: u8) -> Option<u8> {
    let d = b.wrapping_sub(b'0');
    (d < RADIX as u8).then_some(d)
}

/// A prefix tree over decimal-digit strings mapping each key to a `V`.
#[derive(Clone)]
pub struct Trie<V> {
    nodes: Vec<Node<V>>,
    free: Vec<NodeRef>,
    /// Number of value-bearing nodes.
    size: usize,
}

impl<V> Trie<V> {
    /// Create an empty trie holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(0)],
            free: Vec::new(),
            size: 0,
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Nodes currently linked into the tree, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Associate `key` with `value`, returning the value it replaces.
    ///
    /// Empty keys and keys containing anything but ASCII digits are ignored.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        if !is_digit_key(key) {
            return None;
        }

        let mut cur = NodeRef::ROOT;
        for b in key.bytes() {
            cur = self.child_or_insert(cur, b - b'0');
        }

        let old = self.nodes[cur.index()].value.replace(value);
        if old.is_none() {
            self.size += 1;
        }
        old
    }

    /// Look up the value stored exactly at `key`.
    ///
    /// A key that is only a prefix of stored keys is not found.
    pub fn search(&self, key: &str) -> Option<&V> {
        if key.is_empty() {
            return None;
        }
        let node = self.walk(key)?;
        self.nodes[node.index()].value.as_ref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Remove `key`, returning its value.
    ///
    /// Returns `None` when some digit of `key` has no node, or when the path
    /// exists but carries no value. Nodes that end up holding nothing are
    /// unlinked on the way back up; the walk stops at the first ancestor that
    /// still has a value or a child. The root is never removed.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        if key.is_empty() {
            return None;
        }

        let mut path: SmallVec<[NodeRef; INLINE_PATH]> = SmallVec::new();
        path.push(NodeRef::ROOT);
        let mut cur = NodeRef::ROOT;
        for b in key.bytes() {
            let next = self.nodes[cur.index()].children[usize::from(digit(b)?)];
            if next.is_null() {
                return None;
            }
            path.push(next);
            cur = next;
        }

        let old = self.nodes[cur.index()].value.take()?;
        self.size -= 1;
        self.prune(&path);
        Some(old)
    }

    /// All stored keys in ascending digit order. A key precedes its
    /// extensions.
    pub fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.size);
        self.visit_from(NodeRef::ROOT, "", |key, _| keys.push(key.to_owned()));
        keys
    }

    /// Stored keys starting with `prefix`. An empty prefix yields nothing.
    pub fn get_keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        self.visit_prefix(prefix, |key, _| {
            if key.len() >= prefix.len() {
                keys.push(key.to_owned());
            }
        });
        keys
    }

    /// Values of the keys starting with `prefix`, in the same order as
    /// [`Trie::get_keys_with_prefix`].
    pub fn get_prefix_values(&self, prefix: &str) -> Vec<&V> {
        let mut values = Vec::new();
        self.visit_prefix(prefix, |key, value| {
            if key.len() >= prefix.len() {
                values.push(value);
            }
        });
        values
    }

    /// Call `f` for every `(key, value)` under `prefix`. An empty prefix
    /// visits the whole tree.
    pub(crate) fn visit<'a>(&'a self, prefix: &str, f: impl FnMut(&str, &'a V)) {
        if let Some(start) = self.walk(prefix) {
            self.visit_from(start, prefix, f);
        }
    }

    fn visit_prefix<'a>(&'a self, prefix: &str, f: impl FnMut(&str, &'a V)) {
        if !prefix.is_empty() {
            self.visit(prefix, f);
        }
    }

    /// Pre-order DFS from `start`, whose path spells `prefix`. Children are
    /// pushed high digit first so they pop in ascending order.
    fn visit_from<'a>(&'a self, start: NodeRef, prefix: &str, mut f: impl FnMut(&str, &'a V)) {
        let mut buf = String::from(prefix);
        // (node, key length once the node's symbol is appended)
        let mut stack: Vec<(NodeRef, usize)> = vec![(start, buf.len())];

        while let Some((r, len)) = stack.pop() {
            let node = &self.nodes[r.index()];
            if r != start {
                buf.truncate(len - 1);
                buf.push(char::from(b'0' + node.symbol));
            }
            if let Some(value) = &node.value {
                f(&buf, value);
            }
            for &child in node.children.iter().rev() {
                if !child.is_null() {
                    stack.push((child, len + 1));
                }
            }
        }
    }

    /// Follow `key` from the root. The empty key resolves to the root.
    fn walk(&self, key: &str) -> Option<NodeRef> {
        let mut cur = NodeRef::ROOT;
        for b in key.bytes() {
            let next = self.nodes[cur.index()].children[usize::from(digit(b)?)];
            if next.is_null() {
                return None;
            }
            cur = next;
        }
        Some(cur)
    }

    fn child_or_insert(&mut self, parent: NodeRef, d: u8) -> NodeRef {
        let existing = self.nodes[parent.index()].children[usize::from(d)];
        if !existing.is_null() {
            return existing;
        }

        let child = self.alloc(Node::new(d));
        let p = &mut self.nodes[parent.index()];
        p.children[usize::from(d)] = child;
        p.live += 1;
        child
    }

    /// Unlink dead nodes bottom-up along `path` (root first).
    fn prune(&mut self, path: &[NodeRef]) {
        for i in (1..path.len()).rev() {
            let node = path[i];
            if !self.nodes[node.index()].is_dead() {
                break;
            }
            let symbol = self.nodes[node.index()].symbol;
            let parent = &mut self.nodes[path[i - 1].index()];
            parent.children[usize::from(symbol)] = NodeRef::NULL;
            parent.live -= 1;
            self.release(node);
        }
    }

    fn alloc(&mut self, node: Node<V>) -> NodeRef {
        match self.free.pop() {
            Some(r) => {
                self.nodes[r.index()] = node;
                r
            }
            None => {
                self.nodes.push(node);
                NodeRef::new(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, r: NodeRef) {
        debug_assert_ne!(r, NodeRef::ROOT);
        self.nodes[r.index()] = Node::new(0);
        self.free.push(r);
    }
}

#[cfg(test)]
impl<V> Trie<V> {
    /// Structural self-check used by the property tests.
    pub(crate) fn validate(&self) {
        let mut reachable = 0usize;
        let mut values = 0usize;
        let mut stack = vec![NodeRef::ROOT];

        while let Some(r) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[r.index()];
            if r != NodeRef::ROOT {
                assert!(!node.is_dead(), "dead node {} left linked", r.0);
            }
            if node.value.is_some() {
                values += 1;
            }

            let mut live = 0u8;
            for (d, &child) in node.children.iter().enumerate() {
                if child.is_null() {
                    continue;
                }
                live += 1;
                assert_eq!(
                    usize::from(self.nodes[child.index()].symbol),
                    d,
                    "child symbol must match its slot"
                );
                stack.push(child);
            }
            assert_eq!(node.live, live, "live child count out of date");
        }

        assert_eq!(values, self.size, "value-bearing nodes must match len");
        assert_eq!(reachable, self.node_count(), "every allocated node must be reachable");
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.size)
            .field("nodes", &self.node_count())
            .finish()
    }
}
