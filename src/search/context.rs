//! Per-query execution context.

use crate::config::CollectionConfig;
use crate::keys;
use crate::store::Batch;
use std::time::{SystemTime, UNIX_EPOCH};
use xxhash_rust::xxh3::xxh3_64;

/// State scoped to a single search evaluation: the collection under search,
/// the store handle, the batch that set operations are staged onto, and the
/// scratch-key generator.
///
/// A context is never shared across concurrent evaluations. Scratch keys are
/// recorded as they are handed out so the caller can delete them once the
/// final result has been read.
pub struct SearchContext<'a, S> {
    pub(crate) cfg: &'a CollectionConfig,
    pub(crate) store: &'a S,
    batch: Batch,
    scratch: Vec<String>,
    run_prefix: String,
}

impl<'a, S> SearchContext<'a, S> {
    pub fn new(cfg: &'a CollectionConfig, store: &'a S) -> Self {
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_owned());
        let pid = std::process::id();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let run_prefix = xxh3_64(format!("{host}-{pid}-{now}").as_bytes()).to_string();

        Self {
            cfg,
            store,
            batch: Batch::new(),
            scratch: Vec::new(),
            run_prefix,
        }
    }

    /// Allocate the next scratch key and record it for later cleanup.
    pub fn gen_key(&mut self) -> String {
        let key = keys::scratch(&self.run_prefix, self.scratch.len());
        self.scratch.push(key.clone());
        key
    }

    /// Every scratch key generated so far.
    pub fn scratch_keys(&self) -> &[String] {
        &self.scratch
    }

    pub(crate) fn batch(&mut self) -> &mut Batch {
        &mut self.batch
    }

    /// Hand the staged commands off for one pipelined flush.
    pub(crate) fn take_batch(&mut self) -> Batch {
        std::mem::take(&mut self.batch)
    }
}
