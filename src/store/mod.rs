//! Store abstraction: the thin key-value client surface the engine needs.
//!
//! Writes travel exclusively through [`Batch`]es so that all commands of one
//! flush are submitted together and executed in submission order (pipeline
//! semantics); reads go direct. There is no cross-batch ordering guarantee.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;

use crate::error::StoreError;
use std::collections::HashMap;

/// Advisory element-count hint for cursored set scans.
pub const SCAN_COUNT: usize = 10_000;

/// One buffered store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `HSET key field value`
    HashSet {
        key: String,
        field: String,
        value: Vec<u8>,
    },
    /// `SADD key members...`
    SetAdd { key: String, members: Vec<String> },
    /// `ZADD key score member`
    SortedSetAdd {
        key: String,
        score: f64,
        member: String,
    },
    /// `SUNIONSTORE dest sources...`
    SetUnionStore { dest: String, sources: Vec<String> },
    /// `SINTERSTORE dest sources...`
    SetInterStore { dest: String, sources: Vec<String> },
    /// `DEL keys...`
    Delete { keys: Vec<String> },
}

/// A pipelined batch of commands, committed as one unit via [`Store::apply`].
#[derive(Debug, Default)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_set(&mut self, key: impl Into<String>, field: impl Into<String>, value: Vec<u8>) {
        self.commands.push(Command::HashSet {
            key: key.into(),
            field: field.into(),
            value,
        });
    }

    /// Stage a set add; a call with no members stages nothing (`SADD` needs
    /// at least one member).
    pub fn set_add(&mut self, key: impl Into<String>, members: impl IntoIterator<Item = String>) {
        let members: Vec<String> = members.into_iter().collect();
        if members.is_empty() {
            return;
        }
        self.commands.push(Command::SetAdd {
            key: key.into(),
            members,
        });
    }

    pub fn sorted_set_add(&mut self, key: impl Into<String>, score: f64, member: impl Into<String>) {
        self.commands.push(Command::SortedSetAdd {
            key: key.into(),
            score,
            member: member.into(),
        });
    }

    pub fn set_union_store(&mut self, dest: impl Into<String>, sources: Vec<String>) {
        self.commands.push(Command::SetUnionStore {
            dest: dest.into(),
            sources,
        });
    }

    pub fn set_inter_store(&mut self, dest: impl Into<String>, sources: Vec<String>) {
        self.commands.push(Command::SetInterStore {
            dest: dest.into(),
            sources,
        });
    }

    pub fn delete(&mut self, keys: Vec<String>) {
        if keys.is_empty() {
            return;
        }
        self.commands.push(Command::Delete { keys });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// The key-value store surface required by the engine.
///
/// Implementations may buffer or multiplex however they like as long as the
/// commands of one [`Batch`] execute in submission order.
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Commit a batch as one pipelined unit.
    async fn apply(&self, batch: Batch) -> Result<(), StoreError>;

    /// All field/value pairs of a hash. A missing key is an empty map.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, StoreError>;

    /// All members of a set. A missing key is an empty set.
    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Cursored scan of a set, filtering members against a glob pattern
    /// (`?` single char, `*` any run). `count` is an advisory per-step hint.
    async fn set_scan(
        &self,
        key: &str,
        pattern: &str,
        count: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Every key matching a glob pattern.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Delete keys, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<usize, StoreError>;
}
