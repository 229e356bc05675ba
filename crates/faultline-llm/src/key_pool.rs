//! Round-robin API key pool with per-process quarantine. A key that comes
//! back rate-limited or otherwise rejected is parked for the rest of the
//! process and never retried.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct KeyPool {
    keys: Vec<String>,
    quarantined: Mutex<HashSet<usize>>,
    cursor: AtomicUsize,
}

impl KeyPool {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            quarantined: Mutex::new(HashSet::new()),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the next non-quarantined key in round-robin order, along
    /// with its index (passed back to [`KeyPool::quarantine_key`]). `None`
    /// once every key is quarantined -- quarantine is never cleared within
    /// a process.
    pub fn use_key(&self) -> Option<(usize, String)> {
        if self.keys.is_empty() {
            return None;
        }
        for _ in 0..self.keys.len() {
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst) % self.keys.len();
            if !self.quarantined.lock().unwrap().contains(&idx) {
                return Some((idx, self.keys[idx].clone()));
            }
        }
        None
    }

    pub fn quarantine_key(&self, index: usize) {
        self.quarantined.lock().unwrap().insert(index);
    }

    pub fn available_count(&self) -> usize {
        self.keys.len() - self.quarantined.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_keys_in_order() {
        let pool = KeyPool::new(vec!["a".into(), "b".into()]);
        let (_, first) = pool.use_key().unwrap();
        let (_, second) = pool.use_key().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn quarantined_key_is_skipped_until_all_are_quarantined() {
        let pool = KeyPool::new(vec!["a".into(), "b".into()]);
        let (idx_a, _) = pool.use_key().unwrap();
        pool.quarantine_key(idx_a);
        for _ in 0..4 {
            let (idx, key) = pool.use_key().unwrap();
            assert_ne!(idx, idx_a);
            assert_eq!(key, "b");
        }
    }

    #[test]
    fn quarantining_every_key_leaves_the_pool_exhausted() {
        let pool = KeyPool::new(vec!["a".into()]);
        let (idx, _) = pool.use_key().unwrap();
        pool.quarantine_key(idx);
        assert_eq!(pool.available_count(), 0);
        assert!(pool.use_key().is_none());
    }

    #[test]
    fn empty_pool_returns_none() {
        let pool = KeyPool::new(vec![]);
        assert!(pool.use_key().is_none());
    }
}
