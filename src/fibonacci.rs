//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a forest of heap-ordered trees with:
//! - O(1) amortized insert, find_min, decrease_key and meld
//! - O(log n) amortized delete_min and delete
//!
//! # Representation
//!
//! Roots are linked in a circular doubly linked list, and so are the children
//! of every node. Nodes live in an [`Arena`] and all links (`next`, `prev`,
//! `parent`, `child`) are [`NodeRef`] indices into it. The heap keeps:
//!
//! - `first`: the entry point of the root ring (new roots are spliced in
//!   before it and become the new `first`)
//! - `min`: the root holding the smallest key
//! - `len`, `num_trees`, `num_marked`: the aggregate counters behind the
//!   potential function Φ = num_trees + 2·num_marked
//!
//! # Balancing
//!
//! - **Consolidate** (after delete_min): link equal-rank roots until every
//!   root rank is unique, then rebuild the root ring from the rank buckets.
//! - **Cascading cuts** (after decrease_key): a node that violates heap order
//!   is cut to the root list; an unmarked parent gets marked, a marked parent
//!   is cut as well and the cascade continues upward.
//! - **Meld**: splice two root rings in O(1).
//!
//! Each link and each cut is recorded in the heap's [`OpCounters`].

use std::fmt;
use std::rc::Rc;

use index_circular_list::{RingOps, RingStore};
use log::{debug, trace};
use smallvec::{smallvec, SmallVec};

use crate::arena::{Arena, NodeRef};
use crate::counters::OpCounters;
use crate::error::{HeapError, InvariantViolation};
use crate::rank::{checked_increment, degree_bound, saturating_decrement, Rank};
use crate::Key;

struct Node<T> {
    key: Key,
    item: T,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    next: NodeRef,
    prev: NodeRef,
    rank: Rank,
    marked: bool,
}

impl<T> Node<T> {
    fn singleton(me: NodeRef, key: Key, item: T) -> Self {
        Node {
            key,
            item,
            parent: None,
            child: None,
            next: me,
            prev: me,
            rank: 0,
            marked: false,
        }
    }
}

impl<T> RingStore for Arena<Node<T>> {
    type Id = NodeRef;

    fn next(&self, id: NodeRef) -> NodeRef {
        self[id].next
    }

    fn prev(&self, id: NodeRef) -> NodeRef {
        self[id].prev
    }

    fn set_next(&mut self, id: NodeRef, next: NodeRef) {
        self[id].next = next;
    }

    fn set_prev(&mut self, id: NodeRef, prev: NodeRef) {
        self[id].prev = prev;
    }
}

/// Fibonacci Heap over integer keys, carrying a payload of type `T` per node.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 4).unwrap();
/// assert_eq!(heap.find_min(), Some((1, &"item")));
/// assert_eq!(heap.delete_min(), Some((1, "item")));
/// ```
pub struct FibonacciHeap<T = ()> {
    nodes: Arena<Node<T>>,
    first: Option<NodeRef>,
    min: Option<NodeRef>,
    len: usize,
    num_trees: usize,
    num_marked: usize,
    counters: Rc<OpCounters>,
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("num_trees", &self.num_trees)
            .field("num_marked", &self.num_marked)
            .field("min", &self.min.map(|m| self.nodes[m].key))
            .finish()
    }
}

impl<T> FibonacciHeap<T> {
    /// Creates an empty heap with a private link/cut tally
    pub fn new() -> Self {
        Self::with_counters(OpCounters::shared())
    }

    /// Creates an empty heap that records links and cuts into `counters`.
    ///
    /// Heaps sharing one tally report combined totals from
    /// [`total_links`](Self::total_links) and [`total_cuts`](Self::total_cuts).
    pub fn with_counters(counters: Rc<OpCounters>) -> Self {
        Self {
            nodes: Arena::new(),
            first: None,
            min: None,
            len: 0,
            num_trees: 0,
            num_marked: 0,
            counters,
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of trees in the root list
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Number of marked nodes
    pub fn num_marked(&self) -> usize {
        self.num_marked
    }

    /// Potential Φ = num_trees + 2·num_marked
    pub fn potential(&self) -> usize {
        self.num_trees + 2 * self.num_marked
    }

    /// The tally this heap records into
    pub fn counters(&self) -> &Rc<OpCounters> {
        &self.counters
    }

    /// Links recorded in this heap's tally
    pub fn total_links(&self) -> u64 {
        self.counters.links()
    }

    /// Cuts recorded in this heap's tally
    pub fn total_cuts(&self) -> u64 {
        self.counters.cuts()
    }

    /// Inserts `key` with payload `item` as a new singleton tree.
    ///
    /// # Time Complexity
    /// O(1) worst case.
    pub fn insert(&mut self, key: Key, item: T) -> NodeRef {
        let node = self
            .nodes
            .insert_with(|me| Node::singleton(me, key, item));
        self.add_new_root(node);
        self.len += 1;
        self.verify();
        node
    }

    /// Inserts a key with a default payload
    pub fn push(&mut self, key: Key) -> NodeRef
    where
        T: Default,
    {
        self.insert(key, T::default())
    }

    /// Returns the minimum key and its payload, or `None` if empty. O(1).
    pub fn find_min(&self) -> Option<(Key, &T)> {
        self.min.map(|m| {
            let node = &self.nodes[m];
            (node.key, &node.item)
        })
    }

    /// Returns the handle of the minimum node, or `None` if empty. O(1).
    pub fn min_ref(&self) -> Option<NodeRef> {
        self.min
    }

    /// Number of node-storage segments held: the home segment plus one per
    /// absorbed heap that still has live nodes. At most `len() + 1`.
    pub fn segment_count(&self) -> usize {
        self.nodes.segment_count()
    }

    /// Returns true if `node` is live in this heap
    pub fn contains(&self, node: &NodeRef) -> bool {
        self.nodes.contains(*node)
    }

    /// Current key of `node`
    pub fn key(&self, node: &NodeRef) -> Result<Key, HeapError> {
        Ok(self.nodes.get(*node)?.key)
    }

    /// Current key and payload of `node`
    pub fn get(&self, node: &NodeRef) -> Result<(Key, &T), HeapError> {
        let n = self.nodes.get(*node)?;
        Ok((n.key, &n.item))
    }

    /// Number of children of `node`
    pub fn rank(&self, node: &NodeRef) -> Result<usize, HeapError> {
        Ok(usize::from(self.nodes.get(*node)?.rank))
    }

    /// Whether `node` is marked
    pub fn is_marked(&self, node: &NodeRef) -> Result<bool, HeapError> {
        Ok(self.nodes.get(*node)?.marked)
    }

    /// Parent of `node`, or `None` for a root
    pub fn parent(&self, node: &NodeRef) -> Result<Option<NodeRef>, HeapError> {
        Ok(self.nodes.get(*node)?.parent)
    }

    /// Children of `node`, starting at its child-ring entry point
    pub fn children(&self, node: &NodeRef) -> Result<Vec<NodeRef>, HeapError> {
        let n = self.nodes.get(*node)?;
        Ok(self.ring(n.child).collect())
    }

    /// Roots in root-ring order, starting at `first`
    pub fn roots(&self) -> Vec<NodeRef> {
        self.ring(self.first).collect()
    }

    /// Largest rank among the roots, or `None` if empty
    pub fn max_rank(&self) -> Option<usize> {
        self.ring(self.first)
            .map(|root| usize::from(self.nodes[root].rank))
            .max()
    }

    /// Counts of roots by rank: entry `i` is the number of rank-`i` trees.
    ///
    /// The vector has `max_rank + 1` entries; an empty heap yields an empty
    /// vector.
    ///
    /// ```rust
    /// use rust_fibonacci_heap::FibonacciHeap;
    ///
    /// let mut heap: FibonacciHeap = FibonacciHeap::new();
    /// assert!(heap.counters_rep().is_empty());
    /// for key in 0..4 {
    ///     heap.push(key);
    /// }
    /// assert_eq!(heap.counters_rep(), vec![4]);
    /// heap.delete_min();
    /// assert_eq!(heap.counters_rep(), vec![1, 1]);
    /// ```
    pub fn counters_rep(&self) -> Vec<usize> {
        let Some(max) = self.max_rank() else {
            return Vec::new();
        };
        let mut counts = vec![0; max + 1];
        for root in self.ring(self.first) {
            counts[usize::from(self.nodes[root].rank)] += 1;
        }
        counts
    }

    /// Removes and returns the minimum key and its payload.
    ///
    /// An empty heap is left unchanged and yields `None`.
    ///
    /// # Time Complexity
    /// O(log n) amortized; O(num_trees + rank(min)) worst case.
    pub fn delete_min(&mut self) -> Option<(Key, T)> {
        let min = self.min?;

        if self.len == 1 {
            self.first = None;
            self.min = None;
            self.len = 0;
            self.num_trees = 0;
            self.num_marked = 0;
        } else {
            let (rank, next, child) = {
                let node = &self.nodes[min];
                (usize::from(node.rank), node.next, node.child)
            };

            // Promote the children into the root ring in place of min
            match child {
                Some(child) => {
                    let cleared = self.release_children(child);
                    self.num_marked -= cleared;
                    RingOps.replace(&mut self.nodes, min, child);
                }
                None => {
                    RingOps.unlink(&mut self.nodes, min);
                }
            }

            if self.first == Some(min) {
                self.first = if next != min { Some(next) } else { child };
            }

            self.num_trees = self.num_trees + rank - 1;
            self.len -= 1;
            self.min = None;
            self.consolidate();
        }

        let node = self.nodes.remove(min)?;
        self.verify();
        Some((node.key, node.item))
    }

    /// Decreases the key of `node` by `delta`.
    ///
    /// A root only refreshes the cached minimum. A non-root that now violates
    /// heap order against its parent is cut loose with cascading cuts.
    ///
    /// # Errors
    /// - [`HeapError::NegativeDelta`] if `delta < 0`
    /// - [`HeapError::ForeignHandle`] / [`HeapError::StaleHandle`] for a bad handle
    /// - [`HeapError::KeyUnderflow`] if `key - delta` does not fit in [`Key`]
    ///
    /// The heap is unchanged when an error is returned.
    ///
    /// # Time Complexity
    /// O(1) amortized.
    pub fn decrease_key(&mut self, node: &NodeRef, delta: Key) -> Result<(), HeapError> {
        if delta < 0 {
            return Err(HeapError::NegativeDelta(delta));
        }
        let x = *node;
        let current = self.nodes.get(x)?;
        let key = current
            .key
            .checked_sub(delta)
            .ok_or(HeapError::KeyUnderflow {
                key: current.key,
                delta,
            })?;
        let parent = current.parent;

        self.nodes[x].key = key;
        match parent {
            None => {
                if self.min.map_or(true, |m| key < self.nodes[m].key) {
                    self.min = Some(x);
                }
            }
            Some(parent) if key < self.nodes[parent].key => self.cascading_cuts(x, parent),
            Some(_) => {}
        }

        self.verify();
        Ok(())
    }

    /// Removes `node` from the heap and returns its key and payload.
    ///
    /// The node is promoted to a root with the same cascading cuts a
    /// decrease to minus infinity would trigger, treated as the minimum, and
    /// removed by [`delete_min`](Self::delete_min). Keys are never rewritten,
    /// so no sentinel value can overflow.
    ///
    /// # Time Complexity
    /// O(log n) amortized.
    pub fn delete(&mut self, node: &NodeRef) -> Result<(Key, T), HeapError> {
        let x = *node;
        let parent = self.nodes.get(x)?.parent;
        if let Some(parent) = parent {
            self.cascading_cuts(x, parent);
        }
        self.min = Some(x);
        self.delete_min().ok_or(HeapError::StaleHandle)
    }

    /// Melds `other` into this heap.
    ///
    /// The root rings are spliced, the smaller minimum wins and the counters
    /// are summed. `other`'s nodes are absorbed without copying, so its
    /// handles remain valid on `self`. If the two heaps record into different
    /// tallies, `other`'s counts are added to this heap's tally.
    ///
    /// # Time Complexity
    /// O(1) for the ring splice. The smaller of the two absorbed-segment maps
    /// is moved into the larger, so a heap that never absorbed another costs
    /// O(1) and any sequence of melds moves each segment O(log s) times.
    pub fn meld(&mut self, other: Self) {
        let FibonacciHeap {
            nodes,
            first,
            min,
            len,
            num_trees,
            num_marked,
            counters,
        } = other;

        if !Rc::ptr_eq(&self.counters, &counters) {
            self.counters.absorb(&counters);
        }
        self.nodes.absorb(nodes);

        match (self.first, first) {
            (_, None) => {}
            (None, Some(_)) => {
                self.first = first;
                self.min = min;
            }
            (Some(mine), Some(theirs)) => {
                RingOps.splice(&mut self.nodes, mine, theirs);
                if let (Some(my_min), Some(their_min)) = (self.min, min) {
                    if self.nodes[their_min].key < self.nodes[my_min].key {
                        self.min = Some(their_min);
                    }
                }
            }
        }

        self.len += len;
        self.num_trees += num_trees;
        self.num_marked += num_marked;
        debug!(
            "meld: absorbed {len} nodes in {num_trees} trees, now {} nodes in {} trees over {} segments",
            self.len,
            self.num_trees,
            self.nodes.segment_count()
        );
        self.verify();
    }

    /// Drains the heap in non-decreasing key order
    pub fn into_sorted_vec(mut self) -> Vec<(Key, T)> {
        let mut out = Vec::with_capacity(self.len);
        while let Some(entry) = self.delete_min() {
            out.push(entry);
        }
        out
    }

    /// Walks the whole forest and checks every structural invariant:
    /// ring circularity, parent links, ranks, marks, heap order, the cached
    /// minimum and the aggregate counters.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        fn violation<R>(message: String) -> Result<R, InvariantViolation> {
            Err(InvariantViolation(message))
        }

        if self.nodes.len() != self.len {
            return violation(format!(
                "arena holds {} nodes but len is {}",
                self.nodes.len(),
                self.len
            ));
        }

        let Some(first) = self.first else {
            if self.len != 0 || self.min.is_some() || self.num_trees != 0 || self.num_marked != 0 {
                return violation(format!(
                    "empty root list with len={} trees={} marked={} min={:?}",
                    self.len, self.num_trees, self.num_marked, self.min
                ));
            }
            return Ok(());
        };
        let Some(min) = self.min else {
            return violation("non-empty heap without a minimum".to_string());
        };
        let min_node = self
            .nodes
            .get(min)
            .or_else(|e| violation(format!("minimum {min:?} is not live: {e}")))?;
        if min_node.parent.is_some() {
            return violation(format!("minimum {min:?} is not a root"));
        }
        let min_key = min_node.key;

        let mut seen = 0usize;
        let mut marked = 0usize;
        // (ring entry, owner of the ring)
        let mut rings: SmallVec<[(NodeRef, Option<NodeRef>); 32]> = smallvec![(first, None)];

        while let Some((entry, owner)) = rings.pop() {
            let mut members = 0usize;
            let mut current = entry;
            loop {
                let node = self
                    .nodes
                    .get(current)
                    .or_else(|e| violation(format!("dangling link to {current:?}: {e}")))?;
                seen += 1;
                members += 1;
                if seen > self.len {
                    return violation(format!("more than {} nodes reachable", self.len));
                }
                if node.parent != owner {
                    return violation(format!(
                        "{current:?} has parent {:?}, expected {owner:?}",
                        node.parent
                    ));
                }
                let next_prev = self
                    .nodes
                    .get(node.next)
                    .or_else(|e| violation(format!("dangling next of {current:?}: {e}")))?
                    .prev;
                if next_prev != current {
                    return violation(format!("{current:?}.next.prev does not point back"));
                }
                match owner {
                    None => {
                        if node.marked {
                            return violation(format!("root {current:?} is marked"));
                        }
                        if node.key < min_key {
                            return violation(format!(
                                "root {current:?} has key {} below cached minimum {min_key}",
                                node.key
                            ));
                        }
                    }
                    Some(parent) => {
                        let parent_key = self.nodes[parent].key;
                        if node.key < parent_key {
                            return violation(format!(
                                "heap order: {current:?} key {} < parent key {parent_key}",
                                node.key
                            ));
                        }
                    }
                }
                if node.marked {
                    marked += 1;
                }
                match node.child {
                    Some(child) => rings.push((child, Some(current))),
                    None if node.rank != 0 => {
                        return violation(format!(
                            "{current:?} has rank {} but no children",
                            node.rank
                        ));
                    }
                    None => {}
                }

                current = node.next;
                if current == entry {
                    break;
                }
            }

            match owner {
                None if members != self.num_trees => {
                    return violation(format!(
                        "root ring has {members} trees, num_trees is {}",
                        self.num_trees
                    ));
                }
                Some(parent) if members != usize::from(self.nodes[parent].rank) => {
                    return violation(format!(
                        "{parent:?} has {members} children but rank {}",
                        self.nodes[parent].rank
                    ));
                }
                _ => {}
            }
        }

        if seen != self.len {
            return violation(format!("{seen} nodes reachable, len is {}", self.len));
        }
        if marked != self.num_marked {
            return violation(format!(
                "{marked} nodes marked, num_marked is {}",
                self.num_marked
            ));
        }
        Ok(())
    }

    /// Children of `node` with their keys, without allocating
    pub(crate) fn child_entries(&self, node: NodeRef) -> impl Iterator<Item = (NodeRef, Key)> + '_ {
        self.ring(self.nodes[node].child)
            .map(move |child| (child, self.nodes[child].key))
    }

    fn ring(&self, entry: Option<NodeRef>) -> impl Iterator<Item = NodeRef> + '_ {
        entry
            .into_iter()
            .flat_map(move |entry| RingOps.iter(&self.nodes, entry))
    }

    /// Splices a singleton `node` into the root ring before `first` and makes
    /// it the new `first`.
    fn add_new_root(&mut self, node: NodeRef) {
        if let Some(first) = self.first {
            RingOps.insert_before(&mut self.nodes, first, node);
        }
        self.first = Some(node);
        self.num_trees += 1;
        if self
            .min
            .map_or(true, |m| self.nodes[node].key < self.nodes[m].key)
        {
            self.min = Some(node);
        }
    }

    /// Clears the parent link and mark of every node in a child ring.
    /// Returns the number of marks cleared.
    fn release_children(&mut self, child: NodeRef) -> usize {
        let mut cleared = 0;
        let mut current = child;
        loop {
            let node = &mut self.nodes[current];
            node.parent = None;
            if node.marked {
                node.marked = false;
                cleared += 1;
            }
            current = node.next;
            if current == child {
                break;
            }
        }
        cleared
    }

    /// Links roots of equal rank until every rank appears at most once, then
    /// rebuilds the root ring in rank order.
    fn consolidate(&mut self) {
        let Some(first) = self.first else {
            return;
        };
        let roots: Vec<NodeRef> = RingOps.iter(&self.nodes, first).collect();
        let mut buckets: Vec<Option<NodeRef>> = vec![None; degree_bound(self.len)];

        for root in roots.iter().copied() {
            RingOps.make_circular(&mut self.nodes, root);
            let mut tree = root;
            loop {
                let rank = usize::from(self.nodes[tree].rank);
                if rank >= buckets.len() {
                    buckets.resize(rank + 1, None);
                }
                match buckets[rank].take() {
                    Some(other) => tree = self.link(tree, other),
                    None => {
                        buckets[rank] = Some(tree);
                        break;
                    }
                }
            }
        }

        self.first = None;
        self.min = None;
        self.num_trees = 0;
        for root in buckets.into_iter().flatten() {
            self.append_root(root);
        }
        debug!(
            "consolidate: {} roots -> {} trees",
            roots.len(),
            self.num_trees
        );
    }

    /// Appends a singleton tree at the tail of the root ring
    fn append_root(&mut self, root: NodeRef) {
        match (self.first, self.min) {
            (Some(first), Some(min)) => {
                RingOps.insert_before(&mut self.nodes, first, root);
                if self.nodes[root].key < self.nodes[min].key {
                    self.min = Some(root);
                }
            }
            _ => {
                self.first = Some(root);
                self.min = Some(root);
            }
        }
        self.num_trees += 1;
    }

    /// Makes the root with the larger key a child of the other; `a` wins ties.
    ///
    /// Both arguments must be detached singleton roots of equal rank. The
    /// loser becomes the winner's child-ring entry point.
    fn link(&mut self, a: NodeRef, b: NodeRef) -> NodeRef {
        let (winner, loser) = if self.nodes[a].key > self.nodes[b].key {
            (b, a)
        } else {
            (a, b)
        };

        if let Some(child) = self.nodes[winner].child {
            RingOps.insert_before(&mut self.nodes, child, loser);
        }
        self.nodes[loser].parent = Some(winner);
        let node = &mut self.nodes[winner];
        node.child = Some(loser);
        node.rank = checked_increment(node.rank);

        self.num_trees -= 1;
        self.counters.record_link();
        trace!("link: {loser:?} under {winner:?}");
        winner
    }

    /// Detaches `x` from `parent` and makes it a new root
    fn cut(&mut self, x: NodeRef, parent: NodeRef) {
        let successor = RingOps.unlink(&mut self.nodes, x);
        let owner = &mut self.nodes[parent];
        owner.child = successor;
        owner.rank = saturating_decrement(owner.rank);

        let node = &mut self.nodes[x];
        node.parent = None;
        if node.marked {
            node.marked = false;
            self.num_marked -= 1;
        }

        self.add_new_root(x);
        self.counters.record_cut();
        trace!("cut: {x:?} from {parent:?}");
    }

    /// Cuts `x` from `parent`, then walks up: an unmarked non-root ancestor
    /// is marked and stops the cascade, a marked one is cut too.
    fn cascading_cuts(&mut self, mut x: NodeRef, mut parent: NodeRef) {
        loop {
            self.cut(x, parent);
            let Some(grandparent) = self.nodes[parent].parent else {
                break;
            };
            if !self.nodes[parent].marked {
                self.nodes[parent].marked = true;
                self.num_marked += 1;
                break;
            }
            x = parent;
            parent = grandparent;
        }
    }

    #[inline]
    fn verify(&self) {
        #[cfg(feature = "invariant-checks")]
        {
            if let Err(violation) = self.check_invariants() {
                panic!("{violation}");
            }
        }
    }
}
