//! Error types for heap operations

use std::fmt;

use crate::Key;

/// Error type for heap operations.
///
/// Every variant is a caller precondition violation. An operation that
/// returns an error has not modified the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `decrease_key` was called with a negative delta
    NegativeDelta(Key),
    /// `key - delta` is not representable
    KeyUnderflow {
        /// The key before the decrease
        key: Key,
        /// The requested delta
        delta: Key,
    },
    /// The handle names storage this heap does not hold: it was issued by a
    /// heap that was never melded in, or by one whose nodes have all been
    /// removed since
    ForeignHandle,
    /// The handle's node has already been removed
    StaleHandle,
    /// `k_smallest` requires a heap with at most one tree
    MultipleRoots(usize),
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::NegativeDelta(delta) => {
                write!(f, "decrease delta must be non-negative, got {delta}")
            }
            HeapError::KeyUnderflow { key, delta } => {
                write!(f, "decreasing key {key} by {delta} underflows")
            }
            HeapError::ForeignHandle => write!(f, "handle does not belong to this heap"),
            HeapError::StaleHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
            HeapError::MultipleRoots(trees) => {
                write!(f, "expected a heap with a single tree, found {trees} trees")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A broken structural invariant, reported by
/// [`FibonacciHeap::check_invariants`](crate::FibonacciHeap::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation(pub String);

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heap invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantViolation {}
