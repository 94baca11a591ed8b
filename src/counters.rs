//! Link and cut tallies for empirical amortized analysis.
//!
//! A heap records every `link` (two equal-rank trees merged into one) and
//! every `cut` (a subtree detached from its parent) in an [`OpCounters`].
//! Each heap owns a private tally by default. Heaps built with
//! [`FibonacciHeap::with_counters`](crate::FibonacciHeap::with_counters)
//! share one tally, which is how to aggregate across instances.

use std::cell::Cell;
use std::rc::Rc;

/// Cumulative link and cut counts.
#[derive(Debug, Default)]
pub struct OpCounters {
    links: Cell<u64>,
    cuts: Cell<u64>,
}

impl OpCounters {
    /// Creates a zeroed, shareable tally.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Total links recorded.
    pub fn links(&self) -> u64 {
        self.links.get()
    }

    /// Total cuts recorded.
    pub fn cuts(&self) -> u64 {
        self.cuts.get()
    }

    pub(crate) fn record_link(&self) {
        self.links.set(self.links.get() + 1);
    }

    pub(crate) fn record_cut(&self) {
        self.cuts.set(self.cuts.get() + 1);
    }

    /// Adds another tally's counts into this one.
    pub fn absorb(&self, other: &OpCounters) {
        self.links.set(self.links.get() + other.links());
        self.cuts.set(self.cuts.get() + other.cuts());
    }

    /// Resets both counts to zero.
    pub fn reset(&self) {
        self.links.set(0);
        self.cuts.set(0);
    }
}
