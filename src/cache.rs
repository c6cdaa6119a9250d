use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::models::{ProblemInstance, SolveOutcome};

/// Bounded cache of deterministic solve outcomes, keyed by backend and problem data.
pub struct OutcomeCache {
    entries: Mutex<LruCache<String, SolveOutcome>>,
}

impl OutcomeCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        OutcomeCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The problem index is not part of the key, so identical problems share an entry.
    pub fn key(solver_name: &str, problem: &ProblemInstance) -> Option<String> {
        serde_json::to_string(&(solver_name, &problem.c, &problem.a, &problem.b, &problem.bounds)).ok()
    }

    pub fn get(&self, key: &str) -> Option<SolveOutcome> {
        self.entries.lock().get(key).cloned()
    }

    /// Errored outcomes are never stored.
    pub fn insert(&self, key: String, outcome: &SolveOutcome) {
        if outcome.is_deterministic() {
            self.entries.lock().put(key, outcome.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
