//! Centralized error handling with typed error enums.
//!
//! Errors are grouped by the phase they arise in:
//!
//! ```text
//! ConfigError  - collection configuration rejected at bind time
//! IndexError   - schema violations while staging a document
//! QueryError   - unsupported or malformed queries
//! StoreError   - failures from the key-value store client
//! ```
//!
//! Public entry points return [`Result`] (an `anyhow::Result` alias); the
//! typed enums below stay downcastable so callers can tell a query problem
//! apart from a store outage.

use thiserror::Error;

/// A specialized Result type for search-engine operations.
///
/// This is an alias for `anyhow::Result`, with context added via `.context()`
/// where call sites know more than the error itself.
pub type Result<T> = anyhow::Result<T>;

/// Errors raised when a collection configuration is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The collection name cannot be used as a key-name fragment.
    #[error("invalid collection name '{name}': must be non-empty and contain no '/'")]
    InvalidCollectionName { name: String },
}

/// Schema violations detected while staging a document for indexing.
///
/// Any of these aborts the whole staged batch: nothing of the failing run
/// reaches the store.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A facet field held something other than a scalar.
    #[error("found non scalar value ({value}) in facet field '{field}' of document with id {doc_id}")]
    NonScalarFacet {
        field: String,
        value: String,
        doc_id: String,
    },

    /// A number field held something that is not numeric.
    #[error("found non numeric value ({value}) in number field '{field}' of document with id {doc_id}")]
    NonNumericValue {
        field: String,
        value: String,
        doc_id: String,
    },

    /// The document has no value under the configured id field.
    #[error("document is missing its id field '{field}'")]
    MissingId { field: String },

    /// The document body could not be serialized to JSON.
    #[error("failed to serialize document {doc_id} to JSON")]
    Serialize {
        doc_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while parsing or evaluating a query.
///
/// All variants are distinguishable from [`StoreError`] by type, so callers
/// can treat "this query cannot be answered" differently from "the store is
/// down".
#[derive(Debug, Error)]
pub enum QueryError {
    /// Facet equality was requested on a field outside `facet_flds`.
    #[error("facet equality not implemented for non facet field '{field}'")]
    NotFacetField { field: String },

    /// Approximate match cannot shard a pattern shorter than three characters.
    #[error("approximate match not implemented for pattern '{pattern}' (shorter than 3 characters)")]
    PatternTooShort { pattern: String },

    /// The pattern has wildcards in every anchor position.
    #[error("no wildcard-free shard anchor for pattern '{pattern}'")]
    UnshardablePattern { pattern: String },

    /// The grammar accepts this construct but no evaluator exists for it.
    #[error("unsupported query construct: {construct}")]
    Unsupported { construct: String },

    /// A connective was built without children.
    #[error("{connective} requires at least one child expression")]
    EmptyConnective { connective: &'static str },

    /// The query text does not match the grammar.
    #[error("parse error at offset {position}: {message}")]
    Parse { position: usize, message: String },

    /// The query normalizes to no tokens at all.
    #[error("query normalizes to no tokens")]
    EmptyQuery,
}

impl QueryError {
    /// Get optional help text for this error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::NotFacetField { .. } => {
                Some("Only fields listed in the collection's facet_flds can be matched with ':'.")
            }
            Self::PatternTooShort { .. } => {
                Some("Approximate search needs a word of at least 3 characters.")
            }
            Self::Unsupported { .. } => Some(
                "NOT, numeric ranges and numeric comparisons parse but have no\n\
                 evaluator in this engine yet.",
            ),
            Self::EmptyQuery => {
                Some("The query contained only stop words or separators after normalization.")
            }
            _ => None,
        }
    }
}

/// Errors surfaced by a store backend.
///
/// Store failures are passed through verbatim; scratch keys written before
/// the failure may be orphaned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or pipeline failure from the Redis client.
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// A scan pattern the glob matcher rejects.
    #[error("invalid scan pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
