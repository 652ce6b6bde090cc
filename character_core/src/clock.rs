//! Tick-driven timers.
//!
//! Time only moves when the owner calls [`TimerQueue::advance`], so every
//! expiry happens inside a normal mutating call.

/// A set of keyed one-shot timers.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: f64,
    next_seq: u64,
    timers: Vec<Timer<K>>,
}

#[derive(Debug, Clone)]
struct Timer<K> {
    key: K,
    deadline: f64,
    seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            timers: Vec::new(),
        }
    }
}

impl<K: PartialEq + Clone> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer for `key`, replacing any pending timer with that key.
    pub fn schedule(&mut self, key: K, delay_seconds: f32) {
        self.cancel(&key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            key,
            deadline: self.now + f64::from(delay_seconds.max(0.0)),
            seq,
        });
    }

    /// Stop the timer for `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| &timer.key != key);
        self.timers.len() != before
    }

    /// Move time forward and return the keys whose timers ran out, earliest
    /// deadline first.
    pub fn advance(&mut self, dt: f32) -> Vec<K> {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        let now = self.now;
        let (mut expired, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|timer| timer.deadline <= now);
        self.timers = pending;
        expired.sort_by(|a, b| a.deadline.total_cmp(&b.deadline).then(a.seq.cmp(&b.seq)));
        expired.into_iter().map(|timer| timer.key).collect()
    }

    /// Seconds until `key` fires.
    pub fn remaining(&self, key: &K) -> Option<f32> {
        self.timers
            .iter()
            .find(|timer| &timer.key == key)
            .map(|timer| (timer.deadline - self.now).max(0.0) as f32)
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.timers.iter().any(|timer| &timer.key == key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_order() {
        let mut timers = TimerQueue::new();
        timers.schedule("slow", 3.0);
        timers.schedule("fast", 1.0);
        timers.schedule("mid", 2.0);

        assert!(timers.advance(0.5).is_empty());
        assert_eq!(timers.advance(5.0), vec!["fast", "mid", "slow"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_schedule_replaces_existing() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, 1.0);
        timers.schedule(1, 4.0);

        assert_eq!(timers.len(), 1);
        assert!(timers.advance(2.0).is_empty());
        assert_eq!(timers.remaining(&1), Some(2.0));
        assert_eq!(timers.advance(2.0), vec![1]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        timers.schedule('a', 1.0);
        assert!(timers.cancel(&'a'));
        assert!(!timers.cancel(&'a'));
        assert!(timers.advance(10.0).is_empty());
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut timers = TimerQueue::new();
        timers.schedule(0, 1.0);
        assert!(timers.advance(-5.0).is_empty());
        assert!(timers.advance(f32::NAN).is_empty());
        assert_eq!(timers.remaining(&0), Some(1.0));
    }
}
