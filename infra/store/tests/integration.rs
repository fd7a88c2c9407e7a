use addrmeta_store::*;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_write_read_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    let payload = br#"{"id":"data/XA"}"#;
    store.write("data/XA", payload).await.unwrap();
    assert!(store.contains("data/XA").await.unwrap());

    let data = store.read("data/XA").await.unwrap();
    assert_eq!(data, payload);
}

#[tokio::test]
async fn test_write_read_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let store =
        Store::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();

    let payload = vec![b'x'; 4096];
    store.write("data/XA/aa", &payload).await.unwrap();

    let on_disk = std::fs::read(store.path_for("data/XA/aa")).unwrap();
    assert!(on_disk.len() < payload.len());
    assert_eq!(store.read("data/XA/aa").await.unwrap(), payload);
}

#[tokio::test]
async fn test_keys_with_path_syntax_stay_in_root() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    store.write("../../escape", b"x").await.unwrap();

    let path = store.path_for("../../escape");
    assert!(path.starts_with(store.root()));
    assert_eq!(store.read("../../escape").await.unwrap(), b"x");
}

#[tokio::test]
async fn test_overwrite_replaces_contents() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    store.write("data/XA", b"first").await.unwrap();
    store.write("data/XA", b"second").await.unwrap();

    assert_eq!(store.read("data/XA").await.unwrap(), b"second");
}

#[tokio::test]
async fn test_delete_and_contains() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    store.write("data/XA", b"x").await.unwrap();
    store.delete("data/XA").await.unwrap();

    assert!(!store.contains("data/XA").await.unwrap());
    assert!(store.delete("data/XA").await.unwrap_err().is_not_found());
    assert!(store.read("data/XA").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_connect_without_create_requires_root() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    let result = Store::builder().root(&missing).create(false).connect().await;
    assert!(matches!(result, Err(StoreError::Io { .. })));
}

#[tokio::test]
async fn test_record_roundtrip_and_freshness() {
    let temp = TempDir::new().unwrap();
    let store =
        Store::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();

    let written_at = Utc::now() - ChronoDuration::days(40);
    let record = Record::with_timestamp(r#"{"id":"data/XA"}"#, written_at);
    store.write_record("data/XA", &record).await.unwrap();

    let loaded = store.read_record("data/XA").await.unwrap();
    assert!(loaded.is_valid());
    assert_eq!(loaded.payload, record.payload);
    assert_eq!(loaded.written_at.timestamp_millis(), written_at.timestamp_millis());
    assert!(!loaded.is_fresh(Duration::from_secs(30 * 24 * 60 * 60)));
    assert!(Record::new("{}").is_fresh(Duration::from_secs(60)));
}

#[tokio::test]
async fn test_tampered_record_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    let mut record = Record::new(r#"{"id":"data/XA"}"#);
    record.payload = r#"{"id":"data/XB"}"#.to_owned();
    store.write_record("data/XA", &record).await.unwrap();

    let err = store.read_record("data/XA").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[tokio::test]
async fn test_garbage_bytes_are_corrupt() {
    let temp = TempDir::new().unwrap();
    let store =
        Store::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();

    let path = store.path_for("data/XA");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, [0x10, 0, 0, 0, 0xff, 0xff]).unwrap();

    let err = store.read_record("data/XA").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[tokio::test]
async fn test_concurrent_writes_leave_a_complete_file() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16u8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.write("data/XA", &[i; 256]).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let data = store.read("data/XA").await.unwrap();
    assert_eq!(data.len(), 256);
    assert!(data.iter().all(|b| *b == data[0]));
}
