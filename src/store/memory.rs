//! Deterministic in-memory store backend.
//!
//! The substrate for tests and local experiments. Scan and key patterns use
//! the same glob dialect Redis's SCAN family implements (`?` single char,
//! `*` any run, `[...]` classes); a missing key behaves as an empty
//! container, and storing an empty set result drops the destination key,
//! both mirroring Redis.

use super::{Batch, Command, Store};
use crate::error::StoreError;
use glob::Pattern;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    hashes: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    sets: BTreeMap<String, BTreeSet<String>>,
    zsets: BTreeMap<String, BTreeMap<String, f64>>,
}

/// In-memory [`Store`] with BTree-backed keyspaces for deterministic
/// iteration order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Score of `member` in the sorted set at `key`.
    pub fn sorted_set_score(&self, key: &str, member: &str) -> Option<f64> {
        self.state()
            .zsets
            .get(key)
            .and_then(|zset| zset.get(member).copied())
    }
}

fn matcher(pattern: &str) -> Result<Pattern, StoreError> {
    Pattern::new(pattern).map_err(|e| StoreError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}

impl Store for MemoryStore {
    async fn apply(&self, batch: Batch) -> Result<(), StoreError> {
        let mut state = self.state();
        for command in batch {
            match command {
                Command::HashSet { key, field, value } => {
                    state.hashes.entry(key).or_default().insert(field, value);
                }
                Command::SetAdd { key, members } => {
                    state.sets.entry(key).or_default().extend(members);
                }
                Command::SortedSetAdd { key, score, member } => {
                    state.zsets.entry(key).or_default().insert(member, score);
                }
                Command::SetUnionStore { dest, sources } => {
                    let mut union = BTreeSet::new();
                    for src in &sources {
                        if let Some(set) = state.sets.get(src) {
                            union.extend(set.iter().cloned());
                        }
                    }
                    if union.is_empty() {
                        state.sets.remove(&dest);
                    } else {
                        state.sets.insert(dest, union);
                    }
                }
                Command::SetInterStore { dest, sources } => {
                    let mut iter = sources.iter();
                    let mut inter = iter
                        .next()
                        .and_then(|src| state.sets.get(src).cloned())
                        .unwrap_or_default();
                    for src in iter {
                        match state.sets.get(src) {
                            Some(set) => inter.retain(|m| set.contains(m)),
                            None => inter.clear(),
                        }
                    }
                    if inter.is_empty() {
                        state.sets.remove(&dest);
                    } else {
                        state.sets.insert(dest, inter);
                    }
                }
                Command::Delete { keys } => {
                    for key in keys {
                        state.hashes.remove(&key);
                        state.sets.remove(&key);
                        state.zsets.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, StoreError> {
        Ok(self
            .state()
            .hashes
            .get(key)
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .state()
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn set_scan(
        &self,
        key: &str,
        pattern: &str,
        _count: usize,
    ) -> Result<Vec<String>, StoreError> {
        let matcher = matcher(pattern)?;
        Ok(self
            .state()
            .sets
            .get(key)
            .map(|s| s.iter().filter(|m| matcher.matches(m)).cloned().collect())
            .unwrap_or_default())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let matcher = matcher(pattern)?;
        let state = self.state();
        let mut found: BTreeSet<String> = BTreeSet::new();
        found.extend(state.hashes.keys().filter(|k| matcher.matches(k)).cloned());
        found.extend(state.sets.keys().filter(|k| matcher.matches(k)).cloned());
        found.extend(state.zsets.keys().filter(|k| matcher.matches(k)).cloned());
        Ok(found.into_iter().collect())
    }

    async fn delete(&self, keys: &[String]) -> Result<usize, StoreError> {
        let mut state = self.state();
        let mut removed = 0;
        for key in keys {
            let mut hit = false;
            hit |= state.hashes.remove(key).is_some();
            hit |= state.sets.remove(key).is_some();
            hit |= state.zsets.remove(key).is_some();
            if hit {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
