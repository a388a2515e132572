use std::hash::Hash;

use hashbrown::HashMap;
use tokio::time::{Duration, Instant};

/// Identifies one scheduled commit. Stale handles cancel nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerHandle<K> {
    key: K,
    generation: u64,
}

impl<K> TimerHandle<K> {
    /// Key the timer was scheduled for.
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct Pending<V> {
    value: V,
    deadline: Instant,
    generation: u64,
}

/// Keyed debounce timers with at most one live timer per key.
///
/// The debouncer is clock-agnostic: callers pass `now` in and ask for the
/// next deadline, so the owning task decides how to sleep. The latest value
/// for a key stays readable through [`Debouncer::pending`] until it is taken.
#[derive(Debug)]
pub struct Debouncer<K, V> {
    delay: Duration,
    pending: HashMap<K, Pending<V>>,
    next_generation: u64,
}

impl<K: Eq + Hash + Clone, V> Debouncer<K, V> {
    /// Debouncer that waits `delay` after the latest schedule.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `value` to come due `delay` after `now`, replacing any live
    /// timer for `key`.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) -> TimerHandle<K> {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending.insert(
            key.clone(),
            Pending {
                value,
                deadline: now + self.delay,
                generation,
            },
        );
        TimerHandle { key, generation }
    }

    /// Cancels the timer behind `handle` if it is still the live one.
    pub fn cancel(&mut self, handle: &TimerHandle<K>) -> Option<V> {
        let live = self
            .pending
            .get(&handle.key)
            .is_some_and(|p| p.generation == handle.generation);
        if !live {
            return None;
        }
        self.pending.remove(&handle.key).map(|p| p.value)
    }

    /// Cancels whatever timer is live for `key`.
    pub fn cancel_key(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|p| p.value)
    }

    /// Value waiting under `key`.
    pub fn pending(&self, key: &K) -> Option<&V> {
        self.pending.get(key).map(|p| &p.value)
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes and returns every entry whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, _)| k.clone())
            .collect();
        self.take_keys(due)
    }

    /// Removes and returns every entry regardless of deadline, earliest first.
    pub fn take_all(&mut self) -> Vec<(K, V)> {
        let keys: Vec<K> = self.pending.keys().cloned().collect();
        self.take_keys(keys)
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn take_keys(&mut self, keys: Vec<K>) -> Vec<(K, V)> {
        let mut out: Vec<(Instant, u64, K, V)> = keys
            .into_iter()
            .filter_map(|k| {
                let p = self.pending.remove(&k)?;
                Some((p.deadline, p.generation, k, p.value))
            })
            .collect();
        out.sort_by_key(|(deadline, generation, ..)| (*deadline, *generation));
        out.into_iter().map(|(_, _, k, v)| (k, v)).collect()
    }
}
