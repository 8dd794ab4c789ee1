use std::time::Duration;

use serde::{Deserialize, Serialize};

use oftalmo_storage::error::StorageError;
use oftalmo_storage::records;
use oftalmo_storage::store::{MemoryStore, RecordStore};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Note {
    text: String,
}

fn note(text: &str) -> Note {
    Note {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let store = MemoryStore::default();
    let err = store.get("nope.json").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { key } if key == "nope.json"));

    let missing: Option<(Note, String)> = records::load_optional(&store, "nope.json").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn put_if_match_enforces_the_current_etag() {
    let store = MemoryStore::default();
    let first = records::save(&store, "notes/a.json", &note("one")).await.unwrap();

    let second = records::save_if_match(&store, "notes/a.json", &note("two"), &first)
        .await
        .unwrap();
    assert_ne!(first, second);

    // A writer holding the stale ETag loses.
    let err = records::save_if_match(&store, "notes/a.json", &note("three"), &first)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let (loaded, etag): (Note, String) = records::load(&store, "notes/a.json").await.unwrap();
    assert_eq!(loaded, note("two"));
    assert_eq!(etag, second);
}

#[tokio::test]
async fn put_if_match_on_missing_key_fails() {
    let store = MemoryStore::default();
    let err = store
        .put_if_match("x.json", b"{}".to_vec(), None, "\"1\"")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn list_and_load_all_respect_the_prefix() {
    let store = MemoryStore::default();
    records::save(&store, "notes/b.json", &note("b")).await.unwrap();
    records::save(&store, "notes/a.json", &note("a")).await.unwrap();
    records::save(&store, "notesx/c.json", &note("c")).await.unwrap();
    store
        .put("notes/raw.bin", vec![1, 2, 3], Some("application/octet-stream"))
        .await
        .unwrap();
    store.put("notes/bad.json", b"not json".to_vec(), None).await.unwrap();

    let keys = store.list("notes/").await.unwrap();
    assert_eq!(
        keys,
        vec!["notes/a.json", "notes/b.json", "notes/bad.json", "notes/raw.bin"]
    );

    let all: Vec<Note> = records::load_all(&store, "notes/").await.unwrap();
    assert_eq!(all, vec![note("a"), note("b")]);
}

#[tokio::test]
async fn delete_prefix_removes_only_matching_objects() {
    let store = MemoryStore::default();
    store.put("attachments/1/a.png", vec![0], None).await.unwrap();
    store.put("attachments/1/b.png", vec![0], None).await.unwrap();
    store.put("attachments/2/c.png", vec![0], None).await.unwrap();

    let removed = store.delete_prefix("attachments/1/").await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.len().await, 1);

    // Deleting again is harmless.
    store.delete("attachments/1/a.png").await.unwrap();
}

#[tokio::test]
async fn presigned_urls_carry_method_and_expiry() {
    let store = MemoryStore::new("oftalmo-test");
    let put = store
        .presign_put("attachments/1/x.png", Some("image/png"), Duration::from_secs(900))
        .await
        .unwrap();
    assert_eq!(put, "memory://oftalmo-test/attachments/1/x.png?method=PUT&expires=900");

    let get = store
        .presign_get("attachments/1/x.png", Duration::from_secs(60))
        .await
        .unwrap();
    assert!(get.ends_with("method=GET&expires=60"));
}
