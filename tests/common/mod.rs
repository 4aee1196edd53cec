//! Shared fixtures for integration tests.

use redsearch::{Collection, CollectionConfig, Document, MemoryStore};
use serde_json::json;
use std::collections::HashSet;

pub fn cocktail_config() -> CollectionConfig {
    CollectionConfig::new("cocktails", "id")
        .with_facet_fields(["ingredients", "main_color"])
        .with_text_fields(["description", "name"])
        .with_number_fields(["num_ingredients"])
        .with_stop_words(["a", "and", "el", "y"])
}

pub fn cocktail_collection() -> Collection<MemoryStore> {
    Collection::new(MemoryStore::new(), cocktail_config()).expect("valid config")
}

/// Coerce a `json!` object literal into a [`Document`].
pub fn doc(value: serde_json::Value) -> Document {
    value
        .as_object()
        .cloned()
        .expect("document literals are JSON objects")
}

pub async fn populate_cocktails(col: &Collection<MemoryStore>) {
    let docs = [
        json!({
            "id": 1,
            "description": "acidic and highly alcohólico",
            "ingredients": ["vodka", "rum"],
            "main_color": "transparent",
            "num_ingredients": 4,
        }),
        json!({
            "id": 2,
            "description": "sweet and bitter",
            "ingredients": ["cointreau", "rum"],
            "main_color": "white",
            "num_ingredients": 6,
        }),
    ];
    for d in docs {
        col.index_document(&doc(d)).await.expect("fixture doc indexes");
    }
}

/// Sorted view of a result set, for stable comparisons.
pub fn sorted(ids: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = ids.iter().cloned().collect();
    out.sort();
    out
}
