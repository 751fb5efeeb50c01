//! Ordered set of (service, environment) candidates

use std::collections::{HashMap, HashSet};

use crate::types::CandidatePair;

/// Candidate pairs in discovery order, each with a unique display key
///
/// Pairs are deduplicated by value. Two distinct pairs can render to the same
/// `service/environment` string (identifiers may contain `/`), so a key that
/// is already taken gets a ` (2)`, ` (3)`, ... suffix.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pairs: Vec<CandidatePair>,
    keys: Vec<String>,
    seen: HashSet<CandidatePair>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service-major cross product of `services` x `environments`
    pub fn cross_product<S, E>(services: &[S], environments: &[E]) -> Self
    where
        S: AsRef<str>,
        E: AsRef<str>,
    {
        let mut set = Self::new();
        for service in services {
            for environment in environments {
                set.insert(CandidatePair::new(service.as_ref(), environment.as_ref()));
            }
        }
        set
    }

    /// Append a pair. Returns false if the pair was already present.
    pub fn insert(&mut self, pair: CandidatePair) -> bool {
        if self.seen.contains(&pair) {
            return false;
        }
        let base = pair.display_key();
        let mut key = base.clone();
        let mut n = 2;
        while self.index.contains_key(&key) {
            key = format!("{} ({})", base, n);
            n += 1;
        }
        self.index.insert(key.clone(), self.pairs.len());
        self.keys.push(key);
        self.seen.insert(pair.clone());
        self.pairs.push(pair);
        true
    }

    /// Look up a pair by display key
    pub fn get(&self, key: &str) -> Option<&CandidatePair> {
        self.index.get(key).and_then(|&i| self.pairs.get(i))
    }

    /// Display keys in discovery order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &CandidatePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
