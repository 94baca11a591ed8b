//! Rank type for heap nodes.
//!
//! # Why u8?
//!
//! The rank of a Fibonacci-heap node is its number of children. A node of
//! rank `k` roots a subtree of at least `F(k+2) ≥ φᵏ` nodes, so rank is
//! bounded by `log_φ(n)`:
//!
//! - `log_φ(2⁶⁴) ≈ 92` bounds the rank of any heap a 64-bit machine can hold
//! - `u8::MAX` (255) is far beyond that bound
//!
//! Using `u8` instead of `usize` keeps the node record small, which matters
//! because every node sits in one contiguous arena.

/// Type alias for node rank (number of children).
pub type Rank = u8;

/// Maximum valid rank value.
pub const MAX_RANK: Rank = u8::MAX;

/// Golden ratio, the base of the Fibonacci-heap degree bound.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Increments a rank, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`, which would require more nodes than any
/// machine can address.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: rank is bounded by log_φ(n), far below u8::MAX",
    )
}

/// Decrements a rank, stopping at 0.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::rank::{saturating_decrement, Rank};
///
/// let rank: Rank = 1;
/// assert_eq!(saturating_decrement(rank), 0);
/// assert_eq!(saturating_decrement(0), 0);
/// ```
#[inline]
pub fn saturating_decrement(rank: Rank) -> Rank {
    rank.saturating_sub(1)
}

/// Upper bound on the rank of any root in a heap of `len` nodes, plus one
/// slot of slack: `⌊log_φ(len)⌋ + 2`.
///
/// Used to size the consolidation bucket table.
///
/// ```rust
/// use rust_fibonacci_heap::rank::degree_bound;
///
/// assert_eq!(degree_bound(0), 2);
/// assert_eq!(degree_bound(1), 2);
/// assert!(degree_bound(1 << 20) >= 30);
/// ```
pub fn degree_bound(len: usize) -> usize {
    if len <= 1 {
        return 2;
    }
    ((len as f64).ln() / PHI.ln()) as usize + 2
}
