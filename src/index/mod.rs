//! Document indexing: turning one document into a batch of store mutations.
//!
//! Indexing is insert-only. Re-indexing a document is idempotent on every
//! set (postings, facets, shards) and last-writer-wins on the JSON body;
//! stale entries from a prior version of the document are not cleaned.

pub mod shards;
pub mod tokenize;

use crate::config::CollectionConfig;
use crate::error::IndexError;
use crate::keys;
use crate::store::Batch;
use crate::types::{self, Document, Scalar};
use ahash::AHashSet;
use self::shards::{ShardKind, shards};
use self::tokenize::tokenize;
use serde_json::Value as Json;

/// Stage every mutation for one document onto `batch`.
///
/// Returns the document's canonical id. Validation runs while staging, so a
/// schema violation surfaces before anything is flushed and the whole staged
/// batch is abandoned.
pub(crate) fn index_document(
    batch: &mut Batch,
    cfg: &CollectionConfig,
    doc: &Document,
) -> Result<String, IndexError> {
    let doc_id = types::doc_id(doc, &cfg.id_fld)?;

    let body = serde_json::to_vec(doc).map_err(|source| IndexError::Serialize {
        doc_id: doc_id.clone(),
        source,
    })?;
    batch.hash_set(keys::docs(&cfg.name), doc_id.clone(), body);

    for fld in &cfg.text_flds {
        // Sparse documents are fine; only string values carry text.
        if let Some(Json::String(text)) = doc.get(fld) {
            index_text(batch, cfg, &doc_id, text);
        }
    }

    for fld in &cfg.facet_flds {
        let Some(value) = doc.get(fld) else { continue };
        for item in types::as_list(value) {
            let scalar =
                Scalar::from_json(item).ok_or_else(|| IndexError::NonScalarFacet {
                    field: fld.clone(),
                    value: item.to_string(),
                    doc_id: doc_id.clone(),
                })?;
            batch.set_add(keys::facet(&cfg.name, fld, &scalar), [doc_id.clone()]);
            batch.set_add(
                keys::doc_facets(&cfg.name, &doc_id),
                [keys::facet_tag(fld, &scalar)],
            );
        }
    }

    for fld in &cfg.number_flds {
        let Some(value) = doc.get(fld) else { continue };
        for item in types::as_list(value) {
            if item.is_null() {
                continue;
            }
            let score = Scalar::from_json(item)
                .and_then(|s| s.as_f64())
                .ok_or_else(|| IndexError::NonNumericValue {
                    field: fld.clone(),
                    value: item.to_string(),
                    doc_id: doc_id.clone(),
                })?;
            batch.sorted_set_add(keys::numeric(&cfg.name, fld), score, doc_id.clone());
        }
    }

    Ok(doc_id)
}

/// Stage the vocabulary, shard and posting mutations for one text value.
fn index_text(batch: &mut Batch, cfg: &CollectionConfig, doc_id: &str, text: &str) {
    let tokens = tokenize(text, &cfg.translit, &cfg.stop_words);
    if tokens.is_empty() {
        return;
    }

    batch.set_add(keys::text_tokens(&cfg.name), tokens.iter().cloned());

    // Postings and shard sets are sets; one staged add per distinct token.
    let mut seen = AHashSet::with_capacity(tokens.len());
    for tok in &tokens {
        if !seen.insert(tok.as_str()) {
            continue;
        }
        for (kind, shard) in shards(tok) {
            let key = match kind {
                ShardKind::Start => keys::start_shard(&cfg.name, &shard),
                ShardKind::End => keys::end_shard(&cfg.name, &shard),
            };
            batch.set_add(key, [tok.clone()]);
        }
        batch.set_add(keys::token(&cfg.name, tok), [doc_id.to_owned()]);
    }
}
