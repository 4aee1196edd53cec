//! Tests for the ingest path: tokenization into the store, facet and
//! numeric indexing, idempotence and batch semantics.

mod common;

use assert2::{check, let_assert};
use common::{cocktail_collection, doc, populate_cocktails, sorted};
use redsearch::store::Store;
use redsearch::{Collection, CollectionConfig, Expr, IndexError, MemoryStore};
use serde_json::json;
use std::collections::BTreeMap;

#[tokio::test]
async fn text_fields_feed_vocabulary_and_postings() {
    let col = cocktail_collection();
    populate_cocktails(&col).await;

    let vocab = col
        .store()
        .set_members("cocktails/text_tokens")
        .await
        .unwrap();
    for tok in ["acidic", "highly", "alcoholico", "sweet", "bitter"] {
        check!(vocab.contains(&tok.to_string()), "vocabulary misses {tok}");
    }
    // the stop word never reaches the index
    check!(!vocab.contains(&"and".to_string()));

    let hits = col
        .search(&Expr::contains_token("alcoholico"))
        .await
        .unwrap();
    check!(sorted(&hits) == vec!["1".to_string()]);

    let hits = col.search(&Expr::contains_token("and")).await.unwrap();
    check!(hits.is_empty());
}

#[tokio::test]
async fn facet_membership_round_trips() {
    let col = cocktail_collection();
    populate_cocktails(&col).await;

    let postings = col
        .store()
        .set_members("cocktails/docs/f:ingredients/v:rum")
        .await
        .unwrap();
    check!(postings == vec!["1".to_string(), "2".into()]);

    let reverse = col.store().set_members("cocktails/doc_facets/1").await.unwrap();
    check!(reverse.contains(&"f:ingredients/v:vodka".to_string()));
    check!(reverse.contains(&"f:ingredients/v:rum".to_string()));
    check!(reverse.contains(&"f:main_color/v:transparent".to_string()));
}

#[tokio::test]
async fn numeric_fields_are_scored_but_not_queryable() {
    let col = cocktail_collection();
    col.index_document(&doc(json!({"id": 1, "num_ingredients": 4.5})))
        .await
        .unwrap();

    check!(col.store().sorted_set_score("cocktails/docs/n:num_ingredients", "1") == Some(4.5));
}

/// Snapshot every collection key and its set members, for state comparisons.
async fn index_state(col: &Collection<MemoryStore>) -> BTreeMap<String, Vec<String>> {
    let mut state = BTreeMap::new();
    for key in col.store().keys("cocktails/*").await.unwrap() {
        state.insert(key.clone(), col.store().set_members(&key).await.unwrap());
    }
    state
}

#[tokio::test]
async fn reindexing_a_document_is_idempotent() {
    let col = cocktail_collection();
    let d = doc(json!({
        "id": 1,
        "description": "acidic and highly alcohólico",
        "ingredients": ["vodka", "rum"],
        "num_ingredients": 4,
    }));

    col.index_document(&d).await.unwrap();
    let before = index_state(&col).await;

    col.index_document(&d).await.unwrap();
    let after = index_state(&col).await;

    check!(before == after);
}

#[tokio::test]
async fn reindexing_overwrites_the_body_last_writer_wins() {
    let col = cocktail_collection();
    col.index_document(&doc(json!({"id": 1, "main_color": "red"})))
        .await
        .unwrap();
    col.index_document(&doc(json!({"id": 1, "main_color": "blue"})))
        .await
        .unwrap();

    let docs = col.get_all_docs().await.unwrap();
    check!(docs.len() == 1);
    let body: serde_json::Value = serde_json::from_slice(&docs["1"]).unwrap();
    check!(body["main_color"] == "blue");
    // the stale posting is not cleaned; insert-only semantics
    let stale = col
        .store()
        .set_members("cocktails/docs/f:main_color/v:red")
        .await
        .unwrap();
    check!(stale == vec!["1".to_string()]);
}

#[tokio::test]
async fn sparse_documents_index_what_they_have() {
    let cfg = CollectionConfig::new("c", "id").with_text_fields(["a", "b"]);
    let col = Collection::new(MemoryStore::new(), cfg).unwrap();
    col.index_document(&doc(json!({"id": 1, "a": "foo"})))
        .await
        .unwrap();

    let hits = col.search(&Expr::contains_token("foo")).await.unwrap();
    check!(sorted(&hits) == vec!["1".to_string()]);
    let hits = col.search(&Expr::contains_token("bar")).await.unwrap();
    check!(hits.is_empty());
}

#[tokio::test]
async fn schema_violation_aborts_the_whole_run() {
    let col = cocktail_collection();
    let good = doc(json!({"id": 1, "ingredients": ["vodka"]}));
    let bad = doc(json!({"id": 2, "ingredients": [{"nested": true}]}));

    let err = col
        .index_documents(&[good.clone(), bad.clone()], 10)
        .await
        .unwrap_err();
    let_assert!(Some(IndexError::NonScalarFacet { field, doc_id, .. }) = err.downcast_ref());
    check!(field == "ingredients");
    check!(doc_id == "2");
    // the good document shared the staged run, so nothing was applied
    check!(col.store().keys("cocktails/*").await.unwrap().is_empty());

    // with one-document runs the good document commits before the failure
    let err = col.index_documents(&[good, bad], 1).await.unwrap_err();
    check!(err.downcast_ref::<IndexError>().is_some());
    let postings = col
        .store()
        .set_members("cocktails/docs/f:ingredients/v:vodka")
        .await
        .unwrap();
    check!(postings == vec!["1".to_string()]);
}

#[tokio::test]
async fn get_all_docs_returns_raw_bodies() {
    let col = cocktail_collection();
    populate_cocktails(&col).await;

    let docs = col.get_all_docs().await.unwrap();
    check!(docs.len() == 2);
    let body: serde_json::Value = serde_json::from_slice(&docs["2"]).unwrap();
    check!(body["ingredients"] == json!(["cointreau", "rum"]));
}

#[tokio::test]
async fn clear_removes_every_collection_key() {
    let col = cocktail_collection();
    populate_cocktails(&col).await;
    check!(!col.store().keys("cocktails/*").await.unwrap().is_empty());

    let deleted = col.clear().await.unwrap();
    check!(deleted > 0);
    check!(col.store().keys("cocktails/*").await.unwrap().is_empty());
    check!(col.clear().await.unwrap() == 0);
}
