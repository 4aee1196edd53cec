//! Collection facade: a configuration bound to a store handle.

use crate::config::CollectionConfig;
use crate::error::Result;
use crate::index;
use crate::keys;
use crate::search::context::SearchContext;
use crate::search::expr::{self, Expr};
use crate::search::parse;
use crate::store::{Batch, Store};
use crate::types::Document;
use std::collections::{HashMap, HashSet};

/// A named namespace of documents and their indices in one store.
pub struct Collection<S> {
    store: S,
    cfg: CollectionConfig,
}

impl<S: Store> Collection<S> {
    /// Bind an immutable configuration to a store handle.
    pub fn new(store: S, cfg: CollectionConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { store, cfg })
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.cfg
    }

    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Index a single document as one pipelined flush.
    ///
    /// Returns the document's canonical id.
    pub async fn index_document(&self, doc: &Document) -> Result<String> {
        let mut batch = Batch::new();
        let doc_id = index::index_document(&mut batch, &self.cfg, doc)?;
        tracing::debug!(
            collection = %self.cfg.name,
            %doc_id,
            commands = batch.len(),
            "indexing document"
        );
        self.store.apply(batch).await?;
        Ok(doc_id)
    }

    /// Index documents in runs of at most `batch_size`, one pipelined flush
    /// per run (a zero batch size is treated as 1).
    ///
    /// Documents within a run commit in submission order. A schema violation
    /// aborts before its run is flushed; a store failure can leave the
    /// failing run partially applied. Batching buys throughput, not
    /// atomicity.
    pub async fn index_documents(&self, docs: &[Document], batch_size: usize) -> Result<usize> {
        let mut total = 0;
        for run in docs.chunks(batch_size.max(1)) {
            let mut batch = Batch::new();
            for doc in run {
                index::index_document(&mut batch, &self.cfg, doc)?;
            }
            self.store.apply(batch).await?;
            total += run.len();
            tracing::info!(collection = %self.cfg.name, indexed = total, "flushed indexing batch");
        }
        Ok(total)
    }

    /// The full document hash: id to raw JSON bytes.
    pub async fn get_all_docs(&self) -> Result<HashMap<String, Vec<u8>>> {
        Ok(self.store.hash_get_all(&keys::docs(&self.cfg.name)).await?)
    }

    /// Evaluate a search expression and return the matching document ids.
    ///
    /// Builds a fresh context, evaluates the tree (staging set reductions),
    /// flushes the staged batch, reads the final key's members and deletes
    /// the run's scratch keys. A store failure mid-search may orphan them.
    pub async fn search(&self, expr: &Expr) -> Result<HashSet<String>> {
        let mut ctx = SearchContext::new(&self.cfg, &self.store);
        let evaluated = expr.eval(&mut ctx).await?;
        let key = expr::lift_to_key(evaluated, &mut ctx);
        self.store.apply(ctx.take_batch()).await?;

        let ids: HashSet<String> = self.store.set_members(&key).await?.into_iter().collect();
        tracing::debug!(collection = %self.cfg.name, %expr, %key, hits = ids.len(), "search done");

        let scratch = ctx.scratch_keys().to_vec();
        if !scratch.is_empty() {
            self.store.delete(&scratch).await?;
        }
        Ok(ids)
    }

    /// Parse `query` against this collection's configuration, then search.
    pub async fn search_str(&self, query: &str) -> Result<HashSet<String>> {
        let expr = parse::parse(query, &self.cfg)?;
        tracing::debug!(collection = %self.cfg.name, query, %expr, "parsed query");
        self.search(&expr).await
    }

    /// Delete every key belonging to this collection. Returns how many keys
    /// were removed.
    pub async fn clear(&self) -> Result<usize> {
        let found = self
            .store
            .keys(&keys::collection_pattern(&self.cfg.name))
            .await?;
        tracing::info!(collection = %self.cfg.name, keys = found.len(), "clearing collection");
        if found.is_empty() {
            return Ok(0);
        }
        Ok(self.store.delete(&found).await?)
    }
}
