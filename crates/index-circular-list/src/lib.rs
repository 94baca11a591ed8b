//! Circular doubly-linked rings over index-addressed storage.
//!
//! The nodes of a ring live in some external store (a `Vec`, a slot map, an
//! arena) and refer to each other by copyable ids instead of pointers. The
//! store exposes its `next`/`prev` fields through [`RingStore`], and
//! [`RingOps`] implements the ring surgery on top of it.
//!
//! # Circular vs Linear Lists
//!
//! In a circular ring:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail - any node can be the "entry point"
//! - Splicing two rings together is O(1)
//! - Iteration wraps around (must track the starting point)
//!
//! This is the shape Fibonacci heaps use for both the root list and every
//! node's list of children.
//!
//! # Example
//!
//! ```rust
//! use index_circular_list::{RingOps, RingStore};
//!
//! struct Links {
//!     next: Vec<usize>,
//!     prev: Vec<usize>,
//! }
//!
//! impl RingStore for Links {
//!     type Id = usize;
//!
//!     fn next(&self, id: usize) -> usize { self.next[id] }
//!     fn prev(&self, id: usize) -> usize { self.prev[id] }
//!     fn set_next(&mut self, id: usize, next: usize) { self.next[id] = next; }
//!     fn set_prev(&mut self, id: usize, prev: usize) { self.prev[id] = prev; }
//! }
//!
//! let mut links = Links { next: vec![0, 1], prev: vec![0, 1] };
//! let ops = RingOps;
//!
//! ops.insert_after(&mut links, 0, 1);
//! assert_eq!(links.next(0), 1);
//! assert_eq!(links.next(1), 0);
//! assert_eq!(ops.count(&links, 0), 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

// =============================================================================
// RingStore
// =============================================================================

/// Storage that holds the `next`/`prev` links of ring members.
///
/// Implementations may panic when handed an id they do not hold; ring
/// operations only ever pass ids that are already members of some ring.
pub trait RingStore {
    /// Identifier of a ring member.
    type Id: Copy + Eq + fmt::Debug;

    /// Returns the successor of `id`.
    fn next(&self, id: Self::Id) -> Self::Id;

    /// Returns the predecessor of `id`.
    fn prev(&self, id: Self::Id) -> Self::Id;

    /// Overwrites the successor of `id`.
    fn set_next(&mut self, id: Self::Id, next: Self::Id);

    /// Overwrites the predecessor of `id`.
    fn set_prev(&mut self, id: Self::Id, prev: Self::Id);
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating circular doubly-linked rings.
///
/// Every operation except [`count`](RingOps::count) and
/// [`iter`](RingOps::iter) is O(1) and rewrites only the links of the
/// boundary nodes it names.
#[derive(Clone, Copy, Debug, Default)]
pub struct RingOps;

impl RingOps {
    /// Creates a new `RingOps`.
    #[inline]
    pub const fn new() -> Self {
        RingOps
    }

    /// Makes `id` a ring of one: `next == prev == id`.
    #[inline]
    pub fn make_circular<S: RingStore>(&self, store: &mut S, id: S::Id) {
        store.set_next(id, id);
        store.set_prev(id, id);
    }

    /// Returns true if `id` is alone in its ring.
    #[inline]
    pub fn is_singleton<S: RingStore>(&self, store: &S, id: S::Id) -> bool {
        store.next(id) == id
    }

    /// Connects `a` and `b` as adjacent members: `a.next = b`, `b.prev = a`.
    ///
    /// Only the two named links change. The caller is responsible for the
    /// former neighbours of `a` and `b`.
    #[inline]
    pub fn connect<S: RingStore>(&self, store: &mut S, a: S::Id, b: S::Id) {
        store.set_next(a, b);
        store.set_prev(b, a);
    }

    /// Inserts the singleton `new` immediately after `at`.
    #[inline]
    pub fn insert_after<S: RingStore>(&self, store: &mut S, at: S::Id, new: S::Id) {
        debug_assert!(self.is_singleton(store, new), "inserted node is already in a ring");
        let next = store.next(at);
        self.connect(store, at, new);
        self.connect(store, new, next);
    }

    /// Inserts the singleton `new` immediately before `at`.
    ///
    /// When `at` is the entry point of a ring, `new` lands at the tail.
    #[inline]
    pub fn insert_before<S: RingStore>(&self, store: &mut S, at: S::Id, new: S::Id) {
        debug_assert!(self.is_singleton(store, new), "inserted node is already in a ring");
        let prev = store.prev(at);
        self.connect(store, prev, new);
        self.connect(store, new, at);
    }

    /// Removes `id` from its ring and leaves it as a singleton.
    ///
    /// Returns the former successor of `id`, or `None` if `id` was alone.
    #[inline]
    pub fn unlink<S: RingStore>(&self, store: &mut S, id: S::Id) -> Option<S::Id> {
        let next = store.next(id);
        if next == id {
            return None;
        }
        let prev = store.prev(id);
        self.connect(store, prev, next);
        self.make_circular(store, id);
        Some(next)
    }

    /// Replaces `id` by the whole ring entered at `ring`.
    ///
    /// The ring is inserted between the former neighbours of `id` in order,
    /// starting with `ring`. `id` is left as a singleton. If `id` was alone,
    /// the result is just the ring.
    #[inline]
    pub fn replace<S: RingStore>(&self, store: &mut S, id: S::Id, ring: S::Id) {
        let next = store.next(id);
        if next != id {
            let prev = store.prev(id);
            let last = store.prev(ring);
            self.connect(store, prev, ring);
            self.connect(store, last, next);
        }
        self.make_circular(store, id);
    }

    /// Splices the ring containing `b` onto the tail of the ring containing `a`.
    ///
    /// ```text
    /// Before:  a -> ... -> a_last -> a      b -> ... -> b_last -> b
    /// After:   a -> ... -> a_last -> b -> ... -> b_last -> a
    /// ```
    ///
    /// Returns `a`, the entry point of the merged ring. The rings must be
    /// distinct.
    #[inline]
    pub fn splice<S: RingStore>(&self, store: &mut S, a: S::Id, b: S::Id) -> S::Id {
        let a_last = store.prev(a);
        let b_last = store.prev(b);
        self.connect(store, a_last, b);
        self.connect(store, b_last, a);
        a
    }

    /// Counts the members of the ring entered at `start`. O(n).
    pub fn count<S: RingStore>(&self, store: &S, start: S::Id) -> usize {
        self.iter(store, start).count()
    }

    /// Iterates the ring once, beginning at `start`.
    pub fn iter<'a, S: RingStore>(&self, store: &'a S, start: S::Id) -> RingIter<'a, S> {
        RingIter {
            store,
            start,
            next: Some(start),
        }
    }
}

/// Iterator over one lap of a ring. Created by [`RingOps::iter`].
pub struct RingIter<'a, S: RingStore> {
    store: &'a S,
    start: S::Id,
    next: Option<S::Id>,
}

impl<S: RingStore> Iterator for RingIter<'_, S> {
    type Item = S::Id;

    fn next(&mut self) -> Option<S::Id> {
        let current = self.next?;
        let following = self.store.next(current);
        self.next = if following == self.start {
            None
        } else {
            Some(following)
        };
        Some(current)
    }
}

impl<S: RingStore> fmt::Debug for RingIter<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingIter")
            .field("start", &self.start)
            .field("next", &self.next)
            .finish()
    }
}
