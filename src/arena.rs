//! Segmented arena storage for heap nodes
//!
//! Nodes live in `slotmap` arenas and refer to each other through
//! [`NodeRef`] indices instead of pointers. This removes the aliasing and
//! cycle problems of parent/child/sibling pointers while keeping every
//! structural rewrite an O(1) index update.
//!
//! # Segments
//!
//! Melding two heaps must not copy nodes, and handles issued by the absorbed
//! heap must keep working on the receiver. An [`Arena`] is therefore a set of
//! *segments*: the home segment that receives new insertions, plus every
//! segment absorbed by melds. A [`NodeRef`] names its segment and its slot,
//! so absorbing a segment moves the whole slot map without re-keying a single
//! node.
//!
//! Absorbed segments are dropped once their last node is removed and empty
//! segments are never absorbed, so an arena of `n` live nodes holds at most
//! `n + 1` segments.
//!
//! Segment ids are drawn from a process-wide sequence, which makes every
//! handle globally unambiguous: a handle from an unrelated heap names a
//! segment this arena does not hold and is reported as
//! [`HeapError::ForeignHandle`]. The same holds for a handle into an absorbed
//! segment that has since been drained. Generational slot keys report other
//! removed nodes as [`HeapError::StaleHandle`].

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::HeapError;

new_key_type! {
    /// Slot key of a node within one segment
    pub struct NodeKey;
}

static NEXT_SEGMENT: AtomicU64 = AtomicU64::new(0);

/// Identifier of one arena segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        SegmentId(NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque handle to a node.
///
/// Returned by [`FibonacciHeap::insert`](crate::FibonacciHeap::insert). It
/// stays valid until its node is removed, including after the heap that
/// issued it is melded into another heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    segment: SegmentId,
    key: NodeKey,
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef")
            .field(&self.segment.0)
            .field(&self.key)
            .finish()
    }
}

type Segment<N> = SlotMap<NodeKey, N>;

/// Node arena made of a home segment and any number of absorbed segments.
pub struct Arena<N> {
    home_id: SegmentId,
    home: Segment<N>,
    absorbed: FxHashMap<SegmentId, Segment<N>>,
    len: usize,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for Arena<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("home", &self.home_id)
            .field("segments", &self.segment_count())
            .field("len", &self.len)
            .finish()
    }
}

impl<N> Arena<N> {
    /// Creates an arena with a fresh, empty home segment
    pub fn new() -> Self {
        Self {
            home_id: SegmentId::fresh(),
            home: SlotMap::with_key(),
            absorbed: FxHashMap::default(),
            len: 0,
        }
    }

    /// Number of live nodes across all segments
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the arena holds no live nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments, including the home segment
    pub fn segment_count(&self) -> usize {
        1 + self.absorbed.len()
    }

    /// Inserts a node built from its own future reference.
    ///
    /// The closure receives the `NodeRef` the node will be stored under, so
    /// self-referential links (a singleton ring) can be set up front.
    pub fn insert_with<F>(&mut self, build: F) -> NodeRef
    where
        F: FnOnce(NodeRef) -> N,
    {
        let segment = self.home_id;
        let key = self
            .home
            .insert_with_key(|key| build(NodeRef { segment, key }));
        self.len += 1;
        NodeRef { segment, key }
    }

    /// Removes a node, returning it if it was live
    ///
    /// An absorbed segment is dropped as soon as its last node is removed,
    /// so every absorbed segment holds at least one live node.
    pub fn remove(&mut self, node: NodeRef) -> Option<N> {
        let removed = if node.segment == self.home_id {
            self.home.remove(node.key)
        } else {
            let segment = self.absorbed.get_mut(&node.segment)?;
            let removed = segment.remove(node.key);
            if segment.is_empty() {
                self.absorbed.remove(&node.segment);
            }
            removed
        };
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Returns true if `node` is live in this arena
    pub fn contains(&self, node: NodeRef) -> bool {
        self.get(node).is_ok()
    }

    /// Looks up a node, classifying a failed lookup
    pub fn get(&self, node: NodeRef) -> Result<&N, HeapError> {
        self.segment(node.segment)
            .ok_or(HeapError::ForeignHandle)?
            .get(node.key)
            .ok_or(HeapError::StaleHandle)
    }

    /// Mutable counterpart of [`get`](Arena::get)
    pub fn get_mut(&mut self, node: NodeRef) -> Result<&mut N, HeapError> {
        self.segment_mut(node.segment)
            .ok_or(HeapError::ForeignHandle)?
            .get_mut(node.key)
            .ok_or(HeapError::StaleHandle)
    }

    /// Moves every non-empty segment of `other` into this arena.
    ///
    /// Nodes keep their `NodeRef`s. This arena's home segment is unchanged.
    /// The smaller of the two absorbed-segment maps is merged into the
    /// larger one, so the cost is O(1 + min(segments of self, segments of
    /// other)) and each segment is moved O(log s) times over any sequence of
    /// melds producing `s` segments.
    pub fn absorb(&mut self, other: Arena<N>) {
        let Arena {
            home_id,
            home,
            mut absorbed,
            len,
        } = other;
        if absorbed.len() > self.absorbed.len() {
            mem::swap(&mut self.absorbed, &mut absorbed);
        }
        if !home.is_empty() {
            self.absorbed.insert(home_id, home);
        }
        self.absorbed.extend(absorbed);
        self.len += len;
    }

    fn segment(&self, id: SegmentId) -> Option<&Segment<N>> {
        if id == self.home_id {
            Some(&self.home)
        } else {
            self.absorbed.get(&id)
        }
    }

    fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment<N>> {
        if id == self.home_id {
            Some(&mut self.home)
        } else {
            self.absorbed.get_mut(&id)
        }
    }
}

impl<N> Index<NodeRef> for Arena<N> {
    type Output = N;

    fn index(&self, node: NodeRef) -> &N {
        match self.get(node) {
            Ok(n) => n,
            Err(e) => panic!("arena lookup of {node:?} failed: {e}"),
        }
    }
}

impl<N> IndexMut<NodeRef> for Arena<N> {
    fn index_mut(&mut self, node: NodeRef) -> &mut N {
        match self.get_mut(node) {
            Ok(n) => n,
            Err(e) => panic!("arena lookup of {node:?} failed: {e}"),
        }
    }
}
