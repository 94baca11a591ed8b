//! Bounded extraction of the k smallest keys of a single-tree heap
//!
//! The source tree is never modified. Candidates are kept in an auxiliary
//! [`FibonacciHeap`] whose payload is the [`NodeRef`] of the source node each
//! candidate mirrors. Extracting a candidate releases that source node's
//! children as new candidates, so after `i` extractions the auxiliary heap
//! holds at most `i · deg(root)` entries and the whole run costs
//! O(k · deg(root)) amortized.

use log::debug;

use crate::arena::NodeRef;
use crate::error::HeapError;
use crate::fibonacci::FibonacciHeap;
use crate::Key;

/// Returns the `k` smallest keys of `heap` in non-decreasing order.
///
/// The heap must consist of at most one tree. Fewer than `k` keys are
/// returned when the heap holds fewer than `k` nodes; an empty heap yields an
/// empty vector.
///
/// # Errors
/// [`HeapError::MultipleRoots`] if the root list holds more than one tree.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::{k_smallest, FibonacciHeap};
///
/// let mut heap: FibonacciHeap = FibonacciHeap::new();
/// for key in [-1, 0, 1, 3, 4, 2, 9, 8, 6] {
///     heap.push(key);
/// }
/// heap.delete_min(); // eight nodes consolidate into one tree rooted at 0
/// assert_eq!(heap.num_trees(), 1);
/// assert_eq!(k_smallest(&heap, 3).unwrap(), vec![0, 1, 2]);
/// ```
pub fn k_smallest<T>(heap: &FibonacciHeap<T>, k: usize) -> Result<Vec<Key>, HeapError> {
    if heap.num_trees() > 1 {
        return Err(HeapError::MultipleRoots(heap.num_trees()));
    }

    let mut smallest = Vec::with_capacity(k.min(heap.len()));
    let Some(root) = heap.min_ref() else {
        return Ok(smallest);
    };
    if k == 0 {
        return Ok(smallest);
    }

    let mut candidates: FibonacciHeap<NodeRef> = FibonacciHeap::new();
    candidates.insert(heap.key(&root)?, root);

    while smallest.len() < k {
        let Some((key, source)) = candidates.delete_min() else {
            break;
        };
        smallest.push(key);
        if smallest.len() == k {
            break;
        }
        for (child, child_key) in heap.child_entries(source) {
            candidates.insert(child_key, child);
        }
    }

    debug!(
        "k_smallest: {} keys, {} candidate links",
        smallest.len(),
        candidates.total_links()
    );
    Ok(smallest)
}
