use contact_store::{ContactStore, Error, LocalStore};
use shardmap::ShardMap;
use std::time::Duration;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("contact_store_test_{}.json", name))
}

#[test]
fn open_missing_file_creates_empty() {
    let path = temp_path("missing");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<i32, ShardMap<String, i32>>::open(&path).unwrap();
    assert!(db.entries().is_empty());
    assert!(!path.exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn path_accessor() {
    let path = temp_path("path_acc");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<i32, ShardMap<String, i32>>::open(&path).unwrap();
    assert_eq!(db.path(), path.as_path());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn no_temp_file_left_behind() {
    let path = temp_path("no_tmp");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<i32, ShardMap<String, i32>>::open(&path).unwrap();
    db.set_item("n", 1).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn corrupt_file_is_an_error_not_an_empty_store() {
    let path = temp_path("corrupt");
    std::fs::write(&path, b"{\"version\": 1, \"entries\": ").unwrap();
    let err = LocalStore::<i32, ShardMap<String, i32>>::open(&path).unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn newer_format_version_is_rejected() {
    let path = temp_path("future_version");
    std::fs::write(&path, br#"{"version": 2, "entries": {"contacts": []}}"#).unwrap();
    let err = ContactStore::builder(&path)
        .max_latency(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_path_is_config_error() {
    let err = LocalStore::<i32, ShardMap<String, i32>>::open("").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn hand_written_file_loads() {
    let path = temp_path("hand_written");
    std::fs::write(
        &path,
        br#"{"version":1,"entries":{"contacts":[
            {"id":"abc1234","createdAt":5,"first":"Ada","last":"Lovelace","favorite":true}
        ]}}"#,
    )
    .unwrap();
    let store = ContactStore::builder(&path)
        .max_latency(Duration::ZERO)
        .build()
        .unwrap();
    let c = store.get("abc1234").await.unwrap().unwrap();
    assert_eq!(c.created_at, 5);
    assert!(c.is_favorite());
    assert_eq!(c.github, None);
    let _ = std::fs::remove_file(&path);
}
