//! # Address Trie
//!
//! Binary trie over the 32-bit destination address space. Every node covers
//! an aligned address block; inserted rule prefixes mark nodes, and the
//! leaves of the trie are the equivalence classes (ECs).
//!
//! ## Structure
//!
//! - The trie is a full binary tree: a node has either zero or two children.
//! - Splitting a leaf always creates both halves, so the leaves partition the
//!   address space exactly (no gaps, no overlaps).
//! - An internal node exists only while some marked prefix lies strictly
//!   below it. Deleting the last such prefix collapses the node back into a
//!   single leaf.
//!
//! The prefixes covering an address are exactly the marked ancestors of its
//! leaf, so every address in a leaf has the same longest-prefix match at
//! every switch.

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use shared_types::{bit_at, Ipv4Net, ADDRESS_BITS};

/// An equivalence class: one aligned address block at a trie leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EquivalenceClass {
    base: u32,
    len: u8,
}

impl EquivalenceClass {
    /// Block of depth `len` containing `addr`.
    pub fn containing(addr: u32, len: u8) -> Self {
        Self {
            base: addr & !host_mask(len),
            len,
        }
    }

    /// First address of the class.
    pub fn low(&self) -> u32 {
        self.base
    }

    /// Last address of the class.
    pub fn high(&self) -> u32 {
        self.base | host_mask(self.len)
    }

    /// Depth of the leaf, i.e. the block's prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Address used to stand for the whole class during a walk.
    pub fn representative(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    /// Number of addresses in the class.
    pub fn size(&self) -> u64 {
        u64::from(host_mask(self.len)) + 1
    }
}

impl From<Ipv4Net> for EquivalenceClass {
    fn from(net: Ipv4Net) -> Self {
        Self::containing(u32::from(net.network()), net.prefix_len())
    }
}

impl fmt::Display for EquivalenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.base), self.len)
    }
}

/// ECs touched by a trie or rule-table change.
///
/// `live` are classes present after the change whose forwarding behaviour may
/// differ; `retired` are classes that no longer exist (split or merged away).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedEcs {
    /// Current classes to re-verify.
    pub live: BTreeSet<EquivalenceClass>,
    /// Classes destroyed by the change.
    pub retired: BTreeSet<EquivalenceClass>,
}

impl AffectedEcs {
    /// Classes whose behaviour may change without any structural change.
    pub fn touched(live: BTreeSet<EquivalenceClass>) -> Self {
        Self {
            live,
            retired: BTreeSet::new(),
        }
    }

    /// `true` when nothing needs re-verification.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.retired.is_empty()
    }

    /// Number of live classes to re-verify.
    pub fn len(&self) -> usize {
        self.live.len()
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    children: Option<Box<[TrieNode; 2]>>,
    /// A rule prefix ends exactly at this node.
    is_prefix: bool,
    /// Marked prefixes strictly below this node.
    prefixes_below: usize,
}

impl TrieNode {
    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn collect_leaves(&self, base: u32, depth: u8, out: &mut BTreeSet<EquivalenceClass>) {
        match &self.children {
            None => {
                out.insert(EquivalenceClass { base, len: depth });
            }
            Some(children) => {
                let half = 1u32 << (ADDRESS_BITS - 1 - depth);
                children[0].collect_leaves(base, depth + 1, out);
                children[1].collect_leaves(base | half, depth + 1, out);
            }
        }
    }
}

/// Binary trie partitioning the address space into equivalence classes.
#[derive(Debug)]
pub struct AddressTrie {
    root: TrieNode,
    ec_count: usize,
    prefix_count: usize,
}

impl Default for AddressTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressTrie {
    /// A trie with a single EC spanning the whole address space.
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            ec_count: 1,
            prefix_count: 0,
        }
    }

    /// Number of live ECs (leaves).
    pub fn ec_count(&self) -> usize {
        self.ec_count
    }

    /// Number of distinct prefixes currently marked.
    pub fn prefix_count(&self) -> usize {
        self.prefix_count
    }

    /// Enumerate the full current partition in address order.
    pub fn all_ecs(&self) -> BTreeSet<EquivalenceClass> {
        let mut out = BTreeSet::new();
        self.root.collect_leaves(0, 0, &mut out);
        out
    }

    /// Whether `prefix` is marked in the trie.
    pub fn contains_prefix(&self, prefix: &Ipv4Net) -> bool {
        let (addr, len) = split(prefix);
        let mut node = &self.root;
        for depth in 0..len {
            match &node.children {
                Some(children) => node = &children[bit_at(addr, depth)],
                None => return false,
            }
        }
        node.is_prefix
    }

    /// Live ECs intersecting `prefix`.
    ///
    /// If `prefix` lies inside a single leaf, that leaf is returned.
    pub fn ecs_within(&self, prefix: &Ipv4Net) -> BTreeSet<EquivalenceClass> {
        let (addr, len) = split(prefix);
        self.leaves_under(addr, len)
    }

    /// Mark `prefix`, splitting leaves down to its depth.
    ///
    /// Returns the leaves now at or below the highest split point as `live`,
    /// and the single leaf that was split (if any) as `retired`. A prefix
    /// that is already marked yields an empty result.
    pub fn insert(&mut self, prefix: &Ipv4Net) -> AffectedEcs {
        if self.contains_prefix(prefix) {
            return AffectedEcs::default();
        }

        let (addr, len) = split(prefix);
        let mut retired = BTreeSet::new();
        let mut top = len;

        let mut node = &mut self.root;
        for depth in 0..len {
            node.prefixes_below += 1;
            if node.is_leaf() {
                if retired.is_empty() {
                    top = depth;
                    retired.insert(EquivalenceClass::containing(addr, depth));
                }
                // One leaf becomes two.
                self.ec_count += 1;
            }
            let children = node.children.get_or_insert_with(Default::default);
            node = &mut children[bit_at(addr, depth)];
        }
        node.is_prefix = true;
        self.prefix_count += 1;

        AffectedEcs {
            live: self.leaves_under(addr, top),
            retired,
        }
    }

    /// Unmark `prefix` and merge every node that no longer has a marked
    /// prefix below it.
    ///
    /// Returns the ECs now covering the changed region as `live` and the
    /// leaves merged away as `retired`. Deleting an unmarked prefix yields an
    /// empty result.
    pub fn delete(&mut self, prefix: &Ipv4Net) -> AffectedEcs {
        if !self.contains_prefix(prefix) {
            return AffectedEcs::default();
        }

        let (addr, len) = split(prefix);
        let collapse_at = self.collapse_depth(addr, len);
        let top = collapse_at.unwrap_or(len);
        let before = self.leaves_under(addr, top);

        let mut node = &mut self.root;
        let mut depth = 0;
        loop {
            if depth == len {
                node.is_prefix = false;
            } else {
                node.prefixes_below -= 1;
            }
            if collapse_at == Some(depth) {
                node.children = None;
                break;
            }
            if depth == len {
                break;
            }
            match node.children.as_mut() {
                Some(children) => node = &mut children[bit_at(addr, depth)],
                None => break,
            }
            depth += 1;
        }
        self.prefix_count -= 1;

        let live = self.leaves_under(addr, top);
        self.ec_count = self.ec_count + live.len() - before.len();
        let retired = before.difference(&live).copied().collect();

        AffectedEcs { live, retired }
    }

    /// Shallowest depth on the path to `addr/len` whose subtree holds no
    /// other marked prefix once `addr/len` is unmarked.
    fn collapse_depth(&self, addr: u32, len: u8) -> Option<u8> {
        let mut node = &self.root;
        for depth in 0..=len {
            let others_below = if depth == len {
                node.prefixes_below
            } else {
                node.prefixes_below - 1
            };
            if others_below == 0 {
                return (!node.is_leaf()).then_some(depth);
            }
            match &node.children {
                Some(children) if depth < len => node = &children[bit_at(addr, depth)],
                _ => return None,
            }
        }
        None
    }

    fn leaves_under(&self, addr: u32, len: u8) -> BTreeSet<EquivalenceClass> {
        let mut node = &self.root;
        let mut depth = 0;
        while depth < len {
            match &node.children {
                Some(children) => {
                    node = &children[bit_at(addr, depth)];
                    depth += 1;
                }
                None => break,
            }
        }

        let mut out = BTreeSet::new();
        node.collect_leaves(EquivalenceClass::containing(addr, depth).base, depth, &mut out);
        out
    }
}

fn split(prefix: &Ipv4Net) -> (u32, u8) {
    (u32::from(prefix.network()), prefix.prefix_len())
}

fn host_mask(len: u8) -> u32 {
    u32::MAX.checked_shr(u32::from(len)).unwrap_or(0)
}
