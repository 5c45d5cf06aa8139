use super::*;

async fn test_store() -> Store {
    Store::in_memory().await.unwrap()
}

fn ch(id: &str) -> Option<String> {
    Some(id.to_string())
}

#[tokio::test]
async fn test_upsert_creates_record() {
    let store = test_store().await;
    let record = store
        .upsert_server_channels("s1", &[ch("c1")])
        .await
        .unwrap();
    assert_eq!(record.server_id, "s1");
    assert_eq!(record.slots, vec![ch("c1"), None, None, None, None]);

    let loaded = store.get_server_channels("s1").await.unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn test_upsert_preserves_unspecified_slots() {
    let store = test_store().await;
    store
        .upsert_server_channels("s1", &[ch("c1")])
        .await
        .unwrap();
    store
        .upsert_server_channels("s1", &[None, ch("c2")])
        .await
        .unwrap();

    let loaded = store.get_server_channels("s1").await.unwrap().unwrap();
    assert_eq!(loaded.slots[0], ch("c1"));
    assert_eq!(loaded.slots[1], ch("c2"));

    // Overwrite slot 1 only.
    store
        .upsert_server_channels("s1", &[ch("c9")])
        .await
        .unwrap();
    let loaded = store.get_server_channels("s1").await.unwrap().unwrap();
    assert_eq!(loaded.slots[0], ch("c9"));
    assert_eq!(loaded.slots[1], ch("c2"));
}

#[tokio::test]
async fn test_one_record_per_server() {
    let store = test_store().await;
    store.upsert_server_channels("s1", &[ch("a")]).await.unwrap();
    store.upsert_server_channels("s1", &[ch("b")]).await.unwrap();
    store.upsert_server_channels("s2", &[ch("c")]).await.unwrap();

    let all = store.load_server_channels().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].server_id, "s1");
    assert_eq!(all[1].server_id, "s2");
}

#[tokio::test]
async fn test_upsert_rejects_too_many_slots() {
    let store = test_store().await;
    let overrides = vec![ch("x"); 6];
    let err = store
        .upsert_server_channels("s1", &overrides)
        .await
        .unwrap_err();
    assert!(matches!(err, TolkError::Validation(_)));
}

#[tokio::test]
async fn test_missing_server_is_none() {
    let store = test_store().await;
    assert!(store.get_server_channels("nope").await.unwrap().is_none());
    assert!(store.load_server_channels().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_words_reports_only_new_words() {
    let store = test_store().await;
    let added = store
        .add_words(&["Foo".into(), " bar ".into(), "".into()])
        .await
        .unwrap();
    assert_eq!(added, vec!["foo".to_string(), "bar".to_string()]);

    let added = store
        .add_words(&["foo".into(), "baz".into()])
        .await
        .unwrap();
    assert_eq!(added, vec!["baz".to_string()]);

    assert_eq!(
        store.list_words().await.unwrap(),
        vec!["bar".to_string(), "baz".to_string(), "foo".to_string()]
    );
}

#[tokio::test]
async fn test_remove_word() {
    let store = test_store().await;
    store.add_words(&["spam".into()]).await.unwrap();

    assert!(store.remove_word("  SPAM ").await.unwrap());
    assert!(!store.remove_word("spam").await.unwrap());
    assert!(!store.remove_word("   ").await.unwrap());
    assert!(store.list_words().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    store.add_words(&["keep".into()]).await.unwrap();
    Store::run_migrations(store.pool()).await.unwrap();
    assert_eq!(store.list_words().await.unwrap(), vec!["keep".to_string()]);
}

#[tokio::test]
async fn test_on_disk_store_persists() {
    let dir = std::env::temp_dir().join(format!("__tolk_store_test_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let db_path = dir.join("data/tolk.db").to_string_lossy().to_string();
    let config = tolk_core::config::StoreConfig {
        db_path: db_path.clone(),
    };

    {
        let store = Store::new(&config).await.unwrap();
        store.add_words(&["persist".into()]).await.unwrap();
        store
            .upsert_server_channels("s1", &[None, Some("c2".into())])
            .await
            .unwrap();
        store.pool().close().await;
    }

    let store = Store::new(&config).await.unwrap();
    assert_eq!(store.list_words().await.unwrap(), vec!["persist".to_string()]);
    let record = store.get_server_channels("s1").await.unwrap().unwrap();
    assert_eq!(record.slots[1].as_deref(), Some("c2"));
    store.pool().close().await;

    let _ = std::fs::remove_dir_all(&dir);
}
