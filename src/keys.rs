//! Store key encoding.
//!
//! Every key the engine touches, for a collection `C`:
//!
//! ```text
//! key template            | type       | contents
//! C/docs                  | hash       | doc id -> JSON document body
//! C/text_tokens           | set        | every token emitted by tokenization
//! C/docs/t:{tok}          | set        | doc ids whose text contains {tok}
//! C/docs/f:{fld}/v:{val}  | set        | doc ids with {fld} == {val}
//! C/doc_facets/{id}       | set        | every f:{fld}/v:{val} applying to {id}
//! C/docs/n:{fld}          | sorted set | members = doc ids, scores = values
//! C/s_pat/{shard}         | set        | tokens matching the start shard
//! C/e_pat/{shard}         | set        | tokens matching the end shard
//! t/{run-prefix}:{i}      | set        | per-query scratch intermediates
//! ```
//!
//! Encoders are pure and preserve case as given; callers must never rely on
//! store-side case folding. `/` and `%` in facet values are percent-encoded
//! so a value cannot escape its key namespace.

use crate::types::Scalar;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// `/` is the key-path separator, `%` the escape character itself.
const FACET_VALUE_ESCAPE: &AsciiSet = &CONTROLS.add(b'/').add(b'%');

/// Key of the set of doc ids whose text fields contain `tok`.
pub fn token(col: &str, tok: &str) -> String {
    format!("{col}/docs/t:{tok}")
}

/// Key of the set of doc ids carrying `val` in facet field `fld`.
pub fn facet(col: &str, fld: &str, val: &Scalar) -> String {
    format!("{col}/docs/{}", facet_tag(fld, val))
}

/// Key of the sorted set indexing numeric field `fld`.
pub fn numeric(col: &str, fld: &str) -> String {
    format!("{col}/docs/n:{fld}")
}

/// The `f:{fld}/v:{val}` fragment shared by the facet posting key and the
/// per-document reverse set.
pub(crate) fn facet_tag(fld: &str, val: &Scalar) -> String {
    let val = val.to_string();
    format!("f:{fld}/v:{}", utf8_percent_encode(&val, FACET_VALUE_ESCAPE))
}

/// Key of the hash holding all document bodies.
pub(crate) fn docs(col: &str) -> String {
    format!("{col}/docs")
}

/// Key of the whole-collection vocabulary set.
pub(crate) fn text_tokens(col: &str) -> String {
    format!("{col}/text_tokens")
}

/// Key of the reverse facet set for one document.
pub(crate) fn doc_facets(col: &str, doc_id: &str) -> String {
    format!("{col}/doc_facets/{doc_id}")
}

/// Key of a start-anchored shard set.
pub(crate) fn start_shard(col: &str, shard: &str) -> String {
    format!("{col}/s_pat/{shard}")
}

/// Key of an end-anchored shard set.
pub(crate) fn end_shard(col: &str, shard: &str) -> String {
    format!("{col}/e_pat/{shard}")
}

/// The `i`-th scratch key of a query run.
pub(crate) fn scratch(run_prefix: &str, i: usize) -> String {
    format!("t/{run_prefix}:{i}")
}

/// Glob matching every key belonging to a collection.
pub(crate) fn collection_pattern(col: &str) -> String {
    format!("{col}/*")
}
