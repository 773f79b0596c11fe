//! Integration tests for cart persistence across restarts.

use std::sync::Arc;

use rocketshoes_cart::notify::RecordingNotifier;
use rocketshoes_cart::store::{FileStore, KeyValueStore, MemoryStore, load_cart};
use rocketshoes_cart::{CartManager, CartServices};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::{FakeStorefront, Harness, STORAGE_KEY};
use serde_json::Value;

fn storefront() -> FakeStorefront {
    FakeStorefront::new()
        .with_product(1, 17990, 5)
        .with_product(2, 13990, 5)
        .with_product(3, 9990, 5)
}

#[tokio::test]
async fn test_restart_restores_ids_order_and_quantities() {
    let h = Harness::new(storefront());
    for id in [3, 1, 2, 1, 3, 3] {
        h.manager
            .add_product(ProductId::new(id))
            .await
            .expect("add succeeds");
    }
    let before = h.manager.cart();

    let restarted = h.restart();

    assert_eq!(restarted.manager.cart(), before);
    assert_eq!(restarted.ids(), vec![3, 1, 2]);
    assert_eq!(restarted.amount(3), Some(3));
    assert_eq!(restarted.amount(1), Some(2));
}

#[tokio::test]
async fn test_every_mutation_overwrites_store() {
    let h = Harness::new(storefront());

    h.manager
        .add_product(ProductId::new(1))
        .await
        .expect("add succeeds");
    assert_eq!(h.persisted(), Some(h.manager.cart()));

    h.manager
        .update_product_amount(ProductId::new(1), 3)
        .await
        .expect("update succeeds");
    assert_eq!(h.persisted(), Some(h.manager.cart()));

    h.manager
        .remove_product(ProductId::new(1))
        .expect("remove succeeds");
    assert_eq!(h.persisted(), Some(h.manager.cart()));
    assert_eq!(h.persisted_raw().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_rejected_operation_does_not_write() {
    let h = Harness::new(storefront());
    h.manager
        .add_product(ProductId::new(1))
        .await
        .expect("add succeeds");
    let raw = h.persisted_raw();

    h.manager
        .update_product_amount(ProductId::new(1), 9)
        .await
        .expect_err("update is rejected");
    h.manager
        .remove_product(ProductId::new(2))
        .expect_err("remove is rejected");

    assert_eq!(h.persisted_raw(), raw);
}

#[tokio::test]
async fn test_persisted_format_is_flat_product_array() {
    let h = Harness::new(storefront());
    h.manager
        .add_product(ProductId::new(2))
        .await
        .expect("add succeeds");

    let raw = h.persisted_raw().expect("cart persisted");
    let value: Value = serde_json::from_str(&raw).expect("valid json");
    let lines = value.as_array().expect("array of lines");
    assert_eq!(lines.len(), 1);
    let line = lines.first().expect("one line");
    assert_eq!(line.get("id"), Some(&Value::from(2)));
    assert_eq!(line.get("amount"), Some(&Value::from(1)));
    assert_eq!(line.get("title"), Some(&Value::from("Sneaker 2")));
    assert!(line.get("price").is_some());
    assert!(line.get("image").is_some());
}

#[tokio::test]
async fn test_loads_cart_written_with_numeric_prices() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            STORAGE_KEY,
            r#"[{"id":2,"title":"Tênis VR Caminhada","price":139.9,"image":"a.jpg","amount":2}]"#,
        )
        .expect("seed store");

    let h = Harness::with_store(Arc::new(storefront()), store);

    assert_eq!(h.ids(), vec![2]);
    assert_eq!(h.amount(2), Some(2));
    assert_eq!(h.manager.cart().subtotal().display(), "$279.80");
}

#[tokio::test]
async fn test_corrupt_store_starts_empty_and_recovers() {
    let store = Arc::new(MemoryStore::new());
    store.set(STORAGE_KEY, "{oops").expect("seed store");

    let h = Harness::with_store(Arc::new(storefront()), store);
    assert!(h.manager.cart().is_empty());

    h.manager
        .add_product(ProductId::new(1))
        .await
        .expect("add succeeds");
    assert_eq!(h.persisted(), Some(h.manager.cart()));
}

#[tokio::test]
async fn test_other_keys_are_left_alone() {
    let store = Arc::new(MemoryStore::new());
    store.set("@RocketShoes:theme", "dark").expect("seed store");

    let h = Harness::with_store(Arc::new(storefront()), Arc::clone(&store));
    h.manager
        .add_product(ProductId::new(1))
        .await
        .expect("add succeeds");

    assert_eq!(
        store.get("@RocketShoes:theme").expect("read").as_deref(),
        Some("dark")
    );
}

#[tokio::test]
async fn test_unreadable_storage_file_is_replaced_on_first_write() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{truncated").expect("seed storage file");

    let api = Arc::new(storefront());
    let store = Arc::new(FileStore::new(&path));
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = CartManager::load(
        CartServices {
            catalog: api.clone(),
            stock: api,
            store: store.clone(),
            notifier: notifier.clone(),
        },
        STORAGE_KEY,
    );
    assert!(manager.cart().is_empty());

    for _ in 0..3 {
        manager
            .add_product(ProductId::new(1))
            .await
            .expect("add succeeds");
    }

    assert!(notifier.notifications().is_empty());
    assert_eq!(
        manager.cart().get(ProductId::new(1)).map(|item| item.amount),
        Some(3)
    );
    assert_eq!(
        load_cart(store.as_ref(), STORAGE_KEY).expect("storage readable"),
        Some(manager.cart())
    );
}
