use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Trailing-edge debounce with one independent deadline per key.
///
/// `trigger` pushes a key's deadline out by `delay`; `take_due` hands back
/// every key whose quiet period has elapsed. Callers read the key's current
/// value when it fires, so only the latest input is ever acted on.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    deadlines: HashMap<K, Instant>,
}

impl<K: Copy + Eq + Hash + Ord> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadlines: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn trigger(&mut self, key: K, now: Instant) {
        self.deadlines.insert(key, now + self.delay);
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// Removes and returns the keys due at `now`, sorted for stable output.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<K> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| *key)
            .collect();
        for key in &due {
            self.deadlines.remove(key);
        }
        due.sort();
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_triggers_fires_once_after_quiet_period() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        let t0 = Instant::now();
        d.trigger(1u8, t0);
        d.trigger(1u8, t0 + Duration::from_millis(100));
        d.trigger(1u8, t0 + Duration::from_millis(200));

        assert!(d.take_due(t0 + Duration::from_millis(400)).is_empty());
        assert_eq!(d.take_due(t0 + Duration::from_millis(500)), vec![1]);
        assert!(d.take_due(t0 + Duration::from_millis(900)).is_empty());
    }

    #[test]
    fn keys_do_not_reset_each_other() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        let t0 = Instant::now();
        d.trigger(1u8, t0);
        d.trigger(2u8, t0 + Duration::from_millis(250));

        assert_eq!(d.take_due(t0 + Duration::from_millis(300)), vec![1]);
        assert!(d.is_pending(2));
        assert_eq!(d.take_due(t0 + Duration::from_millis(550)), vec![2]);
    }

    #[test]
    fn cancelled_key_never_fires() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        d.trigger(7u8, t0);
        assert!(d.cancel(7));
        assert!(!d.cancel(7));
        assert!(d.take_due(t0 + Duration::from_secs(1)).is_empty());
    }
}
