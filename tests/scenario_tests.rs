//! Scenario tests for the Fibonacci heap
//!
//! Each test builds a concrete forest through the public API, then checks
//! both the observable results and the structure (ranks, marks, parents).

use rust_fibonacci_heap::{k_smallest, FibonacciHeap, HeapError, Key, NodeRef};

/// Inserts `keys` in order and returns the heap with one handle per key
fn build(keys: &[Key]) -> (FibonacciHeap, Vec<NodeRef>) {
    let mut heap = FibonacciHeap::new();
    let handles = keys.iter().map(|&k| heap.push(k)).collect();
    (heap, handles)
}

fn drain_keys<T>(heap: FibonacciHeap<T>) -> Vec<Key> {
    heap.into_sorted_vec().into_iter().map(|(k, _)| k).collect()
}

fn child_with_rank(heap: &FibonacciHeap, node: &NodeRef, rank: usize) -> NodeRef {
    heap.children(node)
        .unwrap()
        .into_iter()
        .find(|c| heap.rank(c).unwrap() == rank)
        .unwrap_or_else(|| panic!("{node:?} has no child of rank {rank}"))
}

#[test]
fn test_insert_find_delete_min() {
    let (mut heap, _) = build(&[1, 2, 3]);
    assert_eq!(heap.find_min(), Some((1, &())));
    heap.delete_min();
    assert_eq!(heap.find_min(), Some((2, &())));
    heap.check_invariants().unwrap();
}

#[test]
fn test_meld_scenario() {
    let (mut a, _) = build(&[10, 20, 30, 5]);
    let (b, _) = build(&[1, 2]);
    a.meld(b);
    assert_eq!(a.find_min(), Some((1, &())));
    assert_eq!(a.len(), 6);
    assert_eq!(a.num_trees(), 6);
    a.check_invariants().unwrap();
    assert_eq!(drain_keys(a), vec![1, 2, 5, 10, 20, 30]);
}

#[test]
fn test_k_smallest_scenario() {
    // 0 plus seven more keys: eight nodes consolidate into a single tree
    let (mut heap, _) = build(&[-1, 0, 1, 3, 4, 2, 9, 8, 6]);
    heap.delete_min();
    assert_eq!(heap.num_trees(), 1);
    assert_eq!(heap.find_min(), Some((0, &())));

    assert_eq!(k_smallest(&heap, 3).unwrap(), vec![0, 1, 2]);

    let mut all = vec![0, 1, 3, 4, 2, 9, 8, 6];
    all.sort_unstable();
    for k in 0..=all.len() {
        assert_eq!(k_smallest(&heap, k).unwrap(), all[..k].to_vec());
    }
    heap.check_invariants().unwrap();
}

#[test]
fn test_k_smallest_requires_single_tree() {
    let (heap, _) = build(&[3, 1, 2]);
    assert_eq!(k_smallest(&heap, 2), Err(HeapError::MultipleRoots(3)));
}

#[test]
fn test_three_level_cascading_cut() {
    // 16 nodes consolidate into one binomial tree of rank 4 rooted at 1
    let (mut heap, _) = build(&(0..17).collect::<Vec<_>>());
    heap.delete_min();
    let root = heap.min_ref().unwrap();
    assert_eq!(heap.rank(&root), Ok(4));

    let a = child_with_rank(&heap, &root, 3);
    let a_leaf = child_with_rank(&heap, &a, 0);
    let b = child_with_rank(&heap, &a, 2);
    let b_leaf = child_with_rank(&heap, &b, 0);
    let x = child_with_rank(&heap, &b, 1);

    // Losing one child each marks a and b
    heap.decrease_key(&a_leaf, 1_000).unwrap();
    heap.decrease_key(&b_leaf, 2_000).unwrap();
    assert_eq!(heap.is_marked(&a), Ok(true));
    assert_eq!(heap.is_marked(&b), Ok(true));
    assert_eq!(heap.num_marked(), 2);
    let cuts_before = heap.total_cuts();
    let trees_before = heap.num_trees();

    heap.decrease_key(&x, 3_000).unwrap();

    assert_eq!(heap.total_cuts() - cuts_before, 3);
    for node in [x, b, a] {
        assert_eq!(heap.parent(&node), Ok(None));
        assert_eq!(heap.is_marked(&node), Ok(false));
        assert!(heap.roots().contains(&node));
    }
    assert_eq!(heap.num_trees(), trees_before + 3);
    assert_eq!(heap.num_marked(), 0);
    assert_eq!(heap.rank(&root), Ok(3));
    heap.check_invariants().unwrap();
}

#[test]
fn test_delete_min_node_equals_delete_min() {
    let keys: Vec<Key> = (0..20).map(|i| (i * 7) % 20).collect();
    let (mut a, _) = build(&keys);
    let (mut b, _) = build(&keys);
    a.delete_min();
    b.delete_min();

    let min = a.min_ref().unwrap();
    assert_eq!(a.delete(&min), Ok((1, ())));
    assert_eq!(b.delete_min(), Some((1, ())));

    assert_eq!(a.counters_rep(), b.counters_rep());
    assert_eq!(a.potential(), b.potential());
    assert_eq!(drain_keys(a), drain_keys(b));
}

/// Same deterministic history on two heaps, with a couple of cuts so that
/// some nodes are marked.
fn marked_forest() -> (FibonacciHeap, Vec<NodeRef>) {
    let keys: Vec<Key> = (0..41).map(|i| (i * 17) % 41 + 100).collect();
    let (mut heap, handles) = build(&keys);
    heap.delete_min();
    for (i, h) in handles.iter().enumerate().skip(1) {
        if i % 9 == 0 && heap.contains(h) && heap.parent(h).unwrap().is_some() {
            heap.decrease_key(h, 50).unwrap();
        }
    }
    heap.check_invariants().unwrap();
    (heap, handles)
}

#[test]
fn test_delete_equals_decrease_to_min_then_delete_min() {
    let (reference, handles) = marked_forest();
    // the deepest node is the most interesting target
    let depth = |h: &NodeRef| {
        let mut depth = 0;
        let mut current = *h;
        while let Some(parent) = reference.parent(&current).unwrap() {
            depth += 1;
            current = parent;
        }
        depth
    };
    let target = handles
        .iter()
        .enumerate()
        .filter(|(_, h)| reference.contains(h))
        .max_by_key(|(_, h)| depth(h))
        .map(|(i, _)| i)
        .unwrap();
    assert!(depth(&handles[target]) >= 2);

    let (mut a, ha) = marked_forest();
    let (mut b, hb) = marked_forest();

    let removed = a.delete(&ha[target]).unwrap();

    let global_min = b.find_min().unwrap().0;
    let key = b.key(&hb[target]).unwrap();
    b.decrease_key(&hb[target], key - (global_min - 1)).unwrap();
    let (_, item) = b.delete_min().unwrap();

    assert_eq!(removed, (key, item));
    assert_eq!(a.counters_rep(), b.counters_rep());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.num_marked(), b.num_marked());
    assert_eq!(a.total_cuts(), b.total_cuts());
    assert_eq!(a.total_links(), b.total_links());
    a.check_invariants().unwrap();
    b.check_invariants().unwrap();
    assert_eq!(drain_keys(a), drain_keys(b));
}

#[test]
fn test_sorted_round_trip() {
    let keys: Vec<Key> = (0..200).map(|i| (i * 83) % 211 - 100).collect();
    let (mut heap, _) = build(&keys);
    let mut expected = keys.clone();
    expected.sort_unstable();

    let mut popped = Vec::new();
    while let Some((k, _)) = heap.delete_min() {
        popped.push(k);
        let rep = heap.counters_rep();
        assert!(rep.iter().all(|&c| c <= 1), "duplicate root ranks: {rep:?}");
    }
    assert_eq!(popped, expected);
}

#[test]
fn test_handles_survive_repeated_melds() {
    let (mut a, _) = build(&[50, 60]);
    let (mut b, hb) = build(&[70, 80]);
    let (c, hc) = build(&[90]);
    b.meld(c);
    a.meld(b);

    a.decrease_key(&hc[0], 89).unwrap();
    assert_eq!(a.find_min(), Some((1, &())));
    assert_eq!(a.delete(&hb[1]), Ok((80, ())));
    assert_eq!(drain_keys(a), vec![1, 50, 60, 70]);
}

#[test]
fn test_foreign_and_stale_handles_are_rejected() {
    let (mut a, ha) = build(&[1, 2, 3]);
    let (_b, hb) = build(&[4]);

    assert_eq!(a.delete(&hb[0]), Err(HeapError::ForeignHandle));
    assert_eq!(a.decrease_key(&hb[0], 1), Err(HeapError::ForeignHandle));

    a.delete(&ha[1]).unwrap();
    assert_eq!(a.delete(&ha[1]), Err(HeapError::StaleHandle));
    assert_eq!(a.len(), 2);
    a.check_invariants().unwrap();
}

#[test]
fn test_chained_melds_into_fresh_heaps_keep_segments_bounded() {
    // acc is repeatedly melded into a newly created heap
    let mut acc: FibonacciHeap = FibonacciHeap::new();
    let mut handles = vec![acc.push(0)];
    for key in 1..1_000 {
        let mut fresh = FibonacciHeap::new();
        handles.push(fresh.push(key));
        fresh.meld(acc);
        acc = fresh;
    }
    assert_eq!(acc.len(), 1_000);
    assert!(acc.segment_count() <= acc.len() + 1);

    for h in handles.iter().skip(1).step_by(2) {
        acc.delete(h).unwrap();
    }
    assert_eq!(acc.len(), 500);
    assert!(acc.segment_count() <= acc.len() + 1);
    acc.check_invariants().unwrap();

    // surviving handles still resolve after their neighbours' segments went away
    for (key, h) in handles.iter().enumerate().step_by(2) {
        assert_eq!(acc.key(h), Ok(key as Key));
    }
    acc.decrease_key(&handles[998], 2_000).unwrap();
    assert_eq!(acc.find_min(), Some((-1_002, &())));

    while acc.delete_min().is_some() {}
    assert_eq!(acc.segment_count(), 1);
}

#[test]
fn test_melding_empty_heaps_adds_no_segments() {
    let (mut heap, _) = build(&[3, 1]);
    for _ in 0..5_000 {
        heap.meld(FibonacciHeap::new());
    }
    assert_eq!(heap.segment_count(), 1);
    assert_eq!(heap.len(), 2);
}

#[test]
fn test_drained_absorbed_segment_is_released() {
    let (mut a, ha) = build(&[10, 20]);
    let (b, hb) = build(&[1, 2, 3]);
    a.meld(b);
    assert_eq!(a.segment_count(), 2);

    for h in &hb {
        a.delete(h).unwrap();
    }
    assert_eq!(a.segment_count(), 1);
    assert_eq!(a.delete(&hb[0]), Err(HeapError::ForeignHandle));

    assert_eq!(a.key(&ha[1]), Ok(20));
    assert_eq!(drain_keys(a), vec![10, 20]);
}
