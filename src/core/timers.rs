//! Scheduled callbacks with cancellable handles.
//!
//! Deferred work (post-snap redraw, sparkle cleanup) is queued here as plain
//! data instead of detached closures, so re-rendering can drop everything
//! that is still pending and nothing leaks.

use std::time::{Duration, Instant};

/// Handle to a scheduled entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TimerHandle,
    deadline: Instant,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next);
        self.next += 1;
        self.entries.push(Entry {
            handle,
            deadline: now + delay,
            payload,
        });
        handle
    }

    /// Cancel a pending entry. Returns its payload if it was still queued.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let pos = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(pos).payload)
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Remove and return every entry due at `now`, earliest deadline first
    /// (ties in scheduling order).
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.handle.cmp(&b.handle)));
        due.into_iter().map(|e| e.payload).collect()
    }

    /// Remove every entry regardless of deadline, in scheduling order.
    pub fn drain_all(&mut self) -> Vec<T> {
        self.entries.drain(..).map(|e| e.payload).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_drain_in_deadline_order() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule(t0, ms(300), "c");
        q.schedule(t0, ms(100), "a");
        q.schedule(t0, ms(200), "b");
        q.schedule(t0, ms(900), "late");

        assert!(q.drain_due(t0 + ms(50)).is_empty());
        assert_eq!(q.drain_due(t0 + ms(300)), ["a", "b", "c"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(t0 + ms(900)));
    }

    #[test]
    fn test_cancel_removes_entry() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let h = q.schedule(t0, ms(100), 7);
        assert!(q.is_scheduled(h));
        assert_eq!(q.cancel(h), Some(7));
        assert_eq!(q.cancel(h), None);
        assert!(q.is_empty());
        assert!(q.drain_due(t0 + ms(1000)).is_empty());
    }
}
