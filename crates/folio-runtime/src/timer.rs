#![forbid(unsafe_code)]

//! Virtual-clock timer queue.
//!
//! [`TimerQueue`] keeps single-shot timers against a clock that only moves
//! when the driver calls [`TimerQueue::pop_due`]. Nothing here sleeps or
//! spawns; a host loop (or a test) decides how fast time passes.
//!
//! Due timers pop in deadline order; timers sharing a deadline pop in the
//! order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use web_time::Duration;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number (monotonic per queue).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<K> {
    deadline: Duration,
    id: TimerId,
    key: K,
}

impl<K> PartialEq for Entry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Entry<K> {}

impl<K> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first (max-heap, so reverse), then insertion order.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Single-threaded timer queue over a virtual clock.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    heap: BinaryHeap<Entry<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|e| e.deadline)
    }

    /// Schedule `key` to fire `after` from now.
    pub fn schedule(&mut self, after: Duration, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Entry {
            deadline: self.now.saturating_add(after),
            id,
            key,
        });
        id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let old_len = self.heap.len();
        let entries: Vec<_> = self.heap.drain().filter(|e| e.id != id).collect();
        self.heap = entries.into_iter().collect();
        old_len != self.heap.len()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Pop the earliest timer whose deadline is at or before `until`,
    /// moving the clock to its deadline.
    ///
    /// Returns `None` once nothing else is due; the clock then rests at
    /// `until`. The clock never moves backwards.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, K)> {
        match self.heap.peek() {
            Some(entry) if entry.deadline <= until => {
                let entry = self.heap.pop()?;
                self.now = self.now.max(entry.deadline);
                Some((entry.id, entry.key))
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_queue_is_empty_at_zero() {
        let q: TimerQueue<&str> = TimerQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.now(), Duration::ZERO);
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(30), "c");
        q.schedule(ms(10), "a");
        q.schedule(ms(20), "b");

        let mut fired = Vec::new();
        while let Some((_, k)) = q.pop_due(ms(100)) {
            fired.push((k, q.now()));
        }
        assert_eq!(fired, vec![("a", ms(10)), ("b", ms(20)), ("c", ms(30))]);
        assert_eq!(q.now(), ms(100));
    }

    #[test]
    fn equal_deadlines_pop_in_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(5), 1);
        q.schedule(ms(5), 2);
        q.schedule(ms(5), 3);
        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(ms(5)).map(|(_, k)| k)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_stays_pending() {
        let mut q = TimerQueue::new();
        q.schedule(ms(50), ());
        assert!(q.pop_due(ms(49)).is_none());
        assert_eq!(q.now(), ms(49));
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(ms(50)).is_some());
    }

    #[test]
    fn schedule_is_relative_to_now() {
        let mut q = TimerQueue::new();
        assert!(q.pop_due(ms(100)).is_none());
        q.schedule(ms(10), ());
        assert_eq!(q.next_deadline(), Some(ms(110)));
    }

    #[test]
    fn cancel_removes_timer() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(10), "a");
        q.schedule(ms(20), "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.pop_due(ms(100)).map(|(_, k)| k), Some("b"));
    }

    #[test]
    fn cancel_after_fire_returns_false() {
        let mut q = TimerQueue::new();
        let id = q.schedule(ms(1), ());
        assert_eq!(q.pop_due(ms(1)).map(|(id, _)| id), Some(id));
        assert!(!q.cancel(id));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut q: TimerQueue<()> = TimerQueue::new();
        q.pop_due(ms(40));
        q.pop_due(ms(10));
        assert_eq!(q.now(), ms(40));
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.schedule(ms(1), ());
        q.schedule(ms(2), ());
        q.clear();
        assert!(q.pop_due(ms(10)).is_none());
    }
}
