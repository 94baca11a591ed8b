//! Fibonacci heap over integer keys
//!
//! This crate provides an arena-backed Fibonacci heap with the classic
//! amortized bounds:
//!
//! | Operation      | Complexity         |
//! |----------------|--------------------|
//! | `insert`       | O(1)               |
//! | `find_min`     | O(1)               |
//! | `meld`         | O(1)               |
//! | `decrease_key` | O(1) amortized     |
//! | `delete_min`   | O(log n) amortized |
//! | `delete`       | O(log n) amortized |
//!
//! Meld splices the root lists in O(1). Node storage moves by whole segments,
//! smaller map into larger, so chained melds stay cheap and each segment is
//! moved O(log n) times over a heap's lifetime.
//!
//! Nodes are stored in a slot-map [`arena`] and linked by index, so the
//! parent/child/sibling rings are ordinary safe Rust. Every link and cut is
//! tallied in an [`OpCounters`] that can be shared between heaps, and
//! [`FibonacciHeap::potential`] exposes Φ = trees + 2·marked for checking the
//! amortized analysis empirically.
//!
//! # Example
//!
//! ```rust
//! use rust_fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.insert(10, "a");
//! heap.insert(20, "b");
//! heap.insert(30, "c");
//!
//! heap.decrease_key(&a, 5).unwrap();
//! assert_eq!(heap.find_min(), Some((5, &"a")));
//! assert_eq!(heap.delete_min(), Some((5, "a")));
//! assert_eq!(heap.len(), 2);
//! ```
//!
//! # Features
//!
//! - `invariant-checks`: re-validate the whole forest after every mutating
//!   operation and panic on the first broken invariant.

pub mod arena;
pub mod counters;
pub mod error;
pub mod fibonacci;
pub mod k_smallest;
pub mod rank;

/// Key type of every heap node
pub type Key = i64;

pub use arena::NodeRef;
pub use counters::OpCounters;
pub use error::{HeapError, InvariantViolation};
pub use fibonacci::FibonacciHeap;
pub use k_smallest::k_smallest;
