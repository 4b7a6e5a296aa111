//! Time-ordered queue of pending timers
//!
//! Replaces free-running callbacks: timers only fire when the owner calls
//! [`Scheduler::advance`], and [`Scheduler::clear`] cancels everything at once.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<E> {
    due_ms: f64,
    seq: u64,
    epoch: u32,
    event: E,
}

impl<E> PartialEq for Timer<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Timer<E> {}

impl<E> PartialOrd for Timer<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Timer<E> {
    // Reversed so BinaryHeap pops the earliest (then lowest seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Fired timer with the epoch it was scheduled in
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub due_ms: f64,
    pub epoch: u32,
    pub event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    now_ms: f64,
    next_seq: u64,
    epoch: u32,
    queue: BinaryHeap<Timer<E>>,
    cancelled: HashSet<u64>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            epoch: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler-local time (advanced only by `advance`)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Epoch stamped onto newly scheduled timers
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schedule_in(&mut self, delay_ms: f64, event: E) -> TimerId {
        self.schedule_at(self.now_ms + delay_ms.max(0.0), event)
    }

    /// Schedule at an absolute time; times in the past fire on the next advance
    pub fn schedule_at(&mut self, due_ms: f64, event: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Timer {
            due_ms,
            seq,
            epoch: self.epoch,
            event,
        });
        TimerId(seq)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if self.queue.iter().any(|t| t.seq == id.0) {
            self.cancelled.insert(id.0)
        } else {
            false
        }
    }

    /// Move time forward and return every due timer in firing order
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Fired<E>> {
        self.now_ms += dt_ms;
        let mut fired = Vec::new();
        while self.queue.peek().is_some_and(|t| t.due_ms <= self.now_ms) {
            let Some(timer) = self.queue.pop() else { break };
            if self.cancelled.remove(&timer.seq) {
                continue;
            }
            fired.push(Fired {
                due_ms: timer.due_ms,
                epoch: timer.epoch,
                event: timer.event,
            });
        }
        fired
    }

    /// Drop all pending timers and start a new epoch
    pub fn clear(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
        self.now_ms = 0.0;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_time_order() {
        let mut sched = Scheduler::new();
        sched.schedule_in(300.0, "c");
        sched.schedule_in(100.0, "a");
        sched.schedule_in(200.0, "b");

        assert!(sched.advance(99.0).is_empty());
        let events: Vec<_> = sched.advance(250.0).into_iter().map(|f| f.event).collect();
        assert_eq!(events, vec!["a", "b", "c"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_equal_due_times_are_fifo() {
        let mut sched = Scheduler::new();
        sched.schedule_in(50.0, 1);
        sched.schedule_in(50.0, 2);
        sched.schedule_in(50.0, 3);
        let events: Vec<_> = sched.advance(50.0).into_iter().map(|f| f.event).collect();
        assert_eq!(events, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_in(10.0, "a");
        sched.schedule_in(20.0, "b");
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert_eq!(sched.len(), 1);

        let events: Vec<_> = sched.advance(30.0).into_iter().map(|f| f.event).collect();
        assert_eq!(events, vec!["b"]);
        assert!(!sched.cancel(a));
    }

    #[test]
    fn test_clear_drops_pending_and_bumps_epoch() {
        let mut sched = Scheduler::new();
        sched.schedule_in(10.0, "stale");
        let old_epoch = sched.epoch();
        sched.clear();
        assert!(sched.advance(100.0).is_empty());

        sched.schedule_in(10.0, "fresh");
        let fired = sched.advance(10.0);
        assert_eq!(fired.len(), 1);
        assert_ne!(fired[0].epoch, old_epoch);
    }

    #[test]
    fn test_periodic_reschedule_from_due_time() {
        let mut sched = Scheduler::new();
        sched.schedule_in(1000.0, ());
        let mut count = 0;
        let mut fired = sched.advance(3500.0);
        while let Some(f) = fired.pop() {
            count += 1;
            sched.schedule_at(f.due_ms + 1000.0, ());
            fired.extend(sched.advance(0.0));
        }
        assert_eq!(count, 3);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut sched = Scheduler::new();
        sched.advance(1000.0);
        sched.schedule_in(500.0, ());
        assert!(sched.advance(499.0).is_empty());
        assert_eq!(sched.advance(1.0).len(), 1);
        assert_eq!(sched.now_ms(), 1500.0);
    }
}
