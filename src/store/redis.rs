//! Redis-backed store.

use super::{Batch, Command, Store};
use crate::error::StoreError;
use redis::AsyncCommands;
use std::collections::HashMap;

/// [`Store`] backed by a Redis multiplexed connection.
///
/// Each [`Batch`] maps one-to-one onto a Redis pipeline: its commands are
/// submitted together and executed by the server in submission order, and
/// their replies are awaited together.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    /// Connect to a Redis instance, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::debug!(url, "connected to redis");
        Ok(Self { conn })
    }
}

impl Store for RedisStore {
    async fn apply(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for command in batch {
            match command {
                Command::HashSet { key, field, value } => {
                    pipe.hset(key, field, value).ignore();
                }
                Command::SetAdd { key, members } => {
                    pipe.sadd(key, members).ignore();
                }
                Command::SortedSetAdd { key, score, member } => {
                    pipe.zadd(key, member, score).ignore();
                }
                Command::SetUnionStore { dest, sources } => {
                    pipe.sunionstore(dest, sources).ignore();
                }
                Command::SetInterStore { dest, sources } => {
                    pipe.sinterstore(dest, sources).ignore();
                }
                Command::Delete { keys } => {
                    pipe.del(keys).ignore();
                }
            }
        }
        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.smembers(key).await?)
    }

    async fn set_scan(
        &self,
        key: &str,
        pattern: &str,
        count: usize,
    ) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let mut members = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, chunk): (u64, Vec<String>) = redis::cmd("SSCAN")
                .arg(key)
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(count)
                .query_async(&mut conn)
                .await?;
            members.extend(chunk);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(members)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.keys(pattern).await?)
    }

    async fn delete(&self, keys: &[String]) -> Result<usize, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        Ok(conn.del(keys).await?)
    }
}
