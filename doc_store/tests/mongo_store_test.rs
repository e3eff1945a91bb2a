use doc_store::{DocumentStore, StoreConnector, StoreError, bson::doc, mongo::MongoConnector};

/// Needs a reachable MongoDB; set `MONGO_URI` (defaults to localhost).
#[tokio::test]
#[ignore]
async fn mongo_unique_index_and_unordered_insert() {
    let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let connector = MongoConnector::new(uri, "doc_store_it");
    let store = connector.connect().await.expect("connect");
    let coll = "it_bars";

    store.ensure_unique_index(coll, &["ticker", "date"]).await.expect("index");
    let before = store.count_documents(coll).await.expect("count");

    let docs = vec![
        doc! { "ticker": "IT", "date": 1_i64 },
        doc! { "ticker": "IT", "date": 2_i64 },
    ];
    let _ = store.insert_many_unordered(coll, docs.clone()).await.expect("first insert");
    let again = store.insert_many_unordered(coll, docs).await.expect("second insert");
    assert_eq!(again.inserted, 0);
    assert_eq!(again.duplicates, 2);

    let dup = store.insert_one(coll, doc! { "ticker": "IT", "date": 1_i64 }).await;
    assert!(matches!(dup, Err(StoreError::DuplicateKey { .. })));

    let after = store.count_documents(coll).await.expect("count");
    assert!(after - before <= 2);
    store.close().await;
}
