//! Collection configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Character-to-character fold table applied between lowercasing and
/// separator splitting. The default removes Latin diacritics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslitTable(HashMap<char, char>);

impl TranslitTable {
    /// A table that folds nothing.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Build a table from explicit (from, to) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub(crate) fn fold(&self, c: char) -> char {
        self.0.get(&c).copied().unwrap_or(c)
    }
}

impl Default for TranslitTable {
    fn default() -> Self {
        Self("áéíóúàèìòùñç".chars().zip("aeiouaeiounc".chars()).collect())
    }
}

/// Configuration for a collection. Immutable once bound to a store handle.
///
/// A field name should not appear in more than one of the three role lists;
/// that invariant is the caller's to keep and is not checked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection namespace, used as a prefix in every store key.
    pub name: String,
    /// Field holding the document identifier.
    pub id_fld: String,
    /// Fields whose values are free text.
    #[serde(default)]
    pub text_flds: Vec<String>,
    /// Fields whose scalar values are categorical tags.
    #[serde(default)]
    pub facet_flds: Vec<String>,
    /// Fields whose values are numeric.
    #[serde(default)]
    pub number_flds: Vec<String>,
    /// Tokens excluded from text indexing.
    #[serde(default)]
    pub stop_words: HashSet<String>,
    /// Diacritic fold table.
    #[serde(default)]
    pub translit: TranslitTable,
}

impl CollectionConfig {
    /// A configuration with the given name and id field and no indexed fields.
    pub fn new(name: impl Into<String>, id_fld: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_fld: id_fld.into(),
            text_flds: Vec::new(),
            facet_flds: Vec::new(),
            number_flds: Vec::new(),
            stop_words: HashSet::new(),
            translit: TranslitTable::default(),
        }
    }

    pub fn with_text_fields<I, T>(mut self, flds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.text_flds = flds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_facet_fields<I, T>(mut self, flds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.facet_flds = flds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_number_fields<I, T>(mut self, flds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.number_flds = flds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stop_words<I, T>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_translit(mut self, translit: TranslitTable) -> Self {
        self.translit = translit;
        self
    }

    /// Whether `field` is one of the configured facet fields.
    pub fn is_facet_field(&self, field: &str) -> bool {
        self.facet_flds.iter().any(|f| f == field)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() || self.name.contains('/') {
            return Err(ConfigError::InvalidCollectionName {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}
