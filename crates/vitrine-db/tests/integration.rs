//! Offline tests for vitrine-db against the in-memory store.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use vitrine_core::{AppConfig, CatalogFixtures, Environment};
use vitrine_db::{
    seed_collections, Collection, CollectionHandle, DbError, DocumentStore, Filter,
    MemoryDocumentStore, PoolConfig,
};

fn fixtures(value: serde_json::Value) -> CatalogFixtures {
    serde_json::from_value(value).expect("valid fixtures")
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        seed_path: PathBuf::from("./config/catalog.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        store_timeout_ms: 5000,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn seed_loads_every_collection_and_is_idempotent() {
    let store = MemoryDocumentStore::new();
    let data = fixtures(json!({
        "collections": {
            "watches": [{"name": "Heritage", "price": 1000}],
            "new_watches": [
                {"title": "Aero", "mrp": 2000, "discountPercent": 10},
                {"title": "Pilot", "mrp": 3000}
            ],
            "orders": [{"status": "pending", "totalAmount": 10}]
        }
    }));

    assert_eq!(seed_collections(&store, &data).await.expect("seed"), 4);
    assert_eq!(seed_collections(&store, &data).await.expect("reseed"), 4);

    let new_watches = store
        .count(Collection::NewWatches, &Filter::All)
        .await
        .expect("count");
    assert_eq!(new_watches, 2);
}

#[tokio::test]
async fn seed_rejects_unknown_collection_before_writing() {
    let store = MemoryDocumentStore::new();
    let data = fixtures(json!({
        "collections": {
            "gadgets": [{"name": "Phone"}],
            "watches": [{"name": "Heritage"}]
        }
    }));

    let err = seed_collections(&store, &data).await.unwrap_err();
    assert!(matches!(err, DbError::UnknownCollection(ref name) if name == "gadgets"));
    assert_eq!(
        store
            .count(Collection::Watches, &Filter::All)
            .await
            .expect("count"),
        0
    );
}

#[tokio::test]
async fn collection_handle_is_scoped_to_its_collection() {
    let store = Arc::new(MemoryDocumentStore::new());
    let shoe = store
        .create(Collection::Shoes, json!({"name": "Runner", "category": "Sneakers"}))
        .await
        .expect("create");
    store
        .create(Collection::Accessories, json!({"name": "Belt", "category": "belts"}))
        .await
        .expect("create");

    let shoes = CollectionHandle::new(store.clone(), Collection::Shoes);
    assert_eq!(shoes.collection(), Collection::Shoes);

    let found = shoes
        .find(&Filter::prefix("category", "sneak"))
        .await
        .expect("find");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, shoe.id);

    assert_eq!(shoes.count(&Filter::All).await.expect("count"), 1);
    assert!(shoes.find_by_id(shoe.id).await.expect("lookup").is_some());

    let accessories = CollectionHandle::new(store, Collection::Accessories);
    assert!(accessories
        .find_by_id(shoe.id)
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn sum_skips_non_numeric_values() {
    let store = MemoryDocumentStore::new();
    for amount in [json!(100), json!("250"), json!(null), json!(49.5)] {
        store
            .create(Collection::Orders, json!({"status": "delivered", "totalAmount": amount}))
            .await
            .expect("create");
    }

    let total = store
        .sum(Collection::Orders, &Filter::All, "totalAmount")
        .await
        .expect("sum");
    assert_eq!(total, Decimal::new(1495, 1));
}

#[tokio::test]
async fn slow_collection_delays_reads() {
    let store = MemoryDocumentStore::new();
    store.set_latency(Collection::Skincare, std::time::Duration::from_millis(20));

    let started = std::time::Instant::now();
    store
        .find(Collection::Skincare, &Filter::All)
        .await
        .expect("find");
    assert!(started.elapsed() >= std::time::Duration::from_millis(20));
}
