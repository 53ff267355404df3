//! Deadline-ordered timer queue with cancellation.
//!
//! Timers fire in (deadline, issue order). Cancellation is lazy: the payload
//! is dropped from the pending map and the heap entry is discarded when it
//! surfaces.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

/// Cancellation token for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timers keyed by deadline `I` carrying payload `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<I, T> {
    heap: BinaryHeap<Reverse<(I, u64)>>,
    pending: HashMap<u64, T>,
    next_seq: u64,
}

impl<I: Ord + Copy, T> Default for TimerQueue<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Ord + Copy, T> TimerQueue<I, T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), pending: HashMap::new(), next_seq: 0 }
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: I, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((deadline, seq)));
        self.pending.insert(seq, payload);
        TimerId(seq)
    }

    /// Cancel a timer. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.pending.remove(&id.0)
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: I) -> Option<(TimerId, T)> {
        while let Some(&Reverse((deadline, seq))) = self.heap.peek() {
            if deadline > now {
                return None;
            }
            self.heap.pop();
            if let Some(payload) = self.pending.remove(&seq) {
                return Some((TimerId(seq), payload));
            }
        }
        None
    }

    /// Drop every timer.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.pending.clear();
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is live.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn fires_in_deadline_then_issue_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(20u64, "late");
        timers.schedule(10, "first");
        timers.schedule(10, "second");

        assert_eq!(timers.pop_due(5), None);
        assert_eq!(timers.pop_due(20).map(|(_, p)| p), Some("first"));
        assert_eq!(timers.pop_due(20).map(|(_, p)| p), Some("second"));
        assert_eq!(timers.pop_due(20).map(|(_, p)| p), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(10u64, "cancelled");
        timers.schedule(15, "kept");

        assert_eq!(timers.cancel(id), Some("cancelled"));
        assert_eq!(timers.cancel(id), None);
        assert_eq!(timers.len(), 1);

        assert_eq!(timers.pop_due(12), None);
        assert_eq!(timers.pop_due(100).map(|(_, p)| p), Some("kept"));
        assert_eq!(timers.pop_due(100), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut timers = TimerQueue::new();
        timers.schedule(1u64, ());
        timers.schedule(2, ());
        timers.clear();

        assert_eq!(timers.len(), 0);
        assert_eq!(timers.pop_due(u64::MAX), None);
    }

    proptest! {
        #[test]
        fn prop_pop_order_is_sorted(deadlines in prop::collection::vec(0u64..100, 0..50)) {
            let mut timers = TimerQueue::new();
            for (i, d) in deadlines.iter().enumerate() {
                timers.schedule(*d, i);
            }

            let mut fired = Vec::new();
            while let Some((_, i)) = timers.pop_due(u64::MAX) {
                fired.push((deadlines[i], i));
            }

            let mut expected: Vec<_> = deadlines.iter().copied().zip(0usize..).collect();
            expected.sort();
            prop_assert_eq!(fired, expected);
        }
    }
}
