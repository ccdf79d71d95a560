use contact_store::{Contact, ContactPatch, ContactStore, LocalStore};
use parking_lot::RwLock;
use shardmap::ShardMap;
use std::collections::HashMap;
use std::time::Duration;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("contact_store_test_{}.json", name))
}

type Contacts = Vec<Contact>;

#[test]
fn shardmap_set_get_remove_flush_persist() {
    let path = temp_path("sm_persist");
    let _ = std::fs::remove_file(&path);

    {
        let db = LocalStore::<Contacts, ShardMap<String, Contacts>>::open(&path).unwrap();
        let one = vec![Contact::new("a", 1)];
        assert!(db.set_item("contacts", one.clone()).unwrap().is_none());
        assert_eq!(db.get_item("contacts"), Some(one.clone()));
        assert_eq!(db.remove_item("contacts").unwrap(), Some(one));
        assert_eq!(db.get_item("contacts"), None);
        db.set_item("archive", vec![Contact::new("b", 2)]).unwrap();
    }

    let db2 = LocalStore::<Contacts, ShardMap<String, Contacts>>::open(&path).unwrap();
    assert_eq!(db2.get_item("contacts"), None);
    assert_eq!(db2.get_item("archive").unwrap()[0].id, "b");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn entries_and_keys_snapshot() {
    let path = temp_path("sm_entries");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<u8, ShardMap<String, u8>>::open(&path).unwrap();
    db.set_item("y", 20).unwrap();
    db.set_item("x", 10).unwrap();
    assert_eq!(db.keys(), vec!["x".to_string(), "y".to_string()]);
    let mut entries = db.entries();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(entries, vec![("x".into(), 10), ("y".into(), 20)]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn len_contains_is_empty() {
    let path = temp_path("len_contains");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<i32, ShardMap<String, i32>>::open(&path).unwrap();

    assert!(db.is_empty());
    assert!(!db.contains_item("a"));
    db.set_item("a", 1).unwrap();
    db.set_item("b", 2).unwrap();
    assert_eq!(db.len(), 2);
    assert!(db.contains_item("a"));

    db.remove_item("a").unwrap();
    assert_eq!(db.len(), 1);
    assert!(!db.contains_item("a"));
    assert_eq!(db.remove_item("a").unwrap(), None);

    db.clear().unwrap();
    assert!(db.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn rwlock_hashmap_crud() {
    let path = temp_path("rwlock");
    let _ = std::fs::remove_file(&path);
    let db = LocalStore::<i32, RwLock<HashMap<String, i32>>>::open(&path).unwrap();
    db.set_item("k", 100).unwrap();
    assert_eq!(db.get_item("k"), Some(100));
    assert!(db.contains_item("k"));
    assert_eq!(db.len(), 1);
    db.clear().unwrap();
    assert!(db.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn contact_store_on_rwlock_backend() {
    let path = temp_path("contacts_rwlock");
    let _ = std::fs::remove_file(&path);
    let store = ContactStore::builder(&path)
        .max_latency(Duration::ZERO)
        .build_with::<RwLock<HashMap<String, Contacts>>>()
        .unwrap();
    let c = store.create().await.unwrap();
    store
        .update(&c.id, ContactPatch::new().first("Barbara").last("Liskov"))
        .await
        .unwrap();
    assert_eq!(store.list("lisk").await.unwrap().len(), 1);
    assert!(store.delete(&c.id).await.unwrap());
    assert!(store.list("").await.unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

#[cfg(feature = "dashmap")]
mod dashmap_tests {
    use super::{temp_path, Contacts};
    use contact_store::{ContactStore, LocalStore};
    use dashmap::DashMap;
    use std::time::Duration;

    #[test]
    fn dashmap_crud() {
        let path = temp_path("dashmap_crud");
        let _ = std::fs::remove_file(&path);
        let db = LocalStore::<i32, DashMap<String, i32>>::open(&path).unwrap();
        db.set_item("a", 1).unwrap();
        assert_eq!(db.get_item("a"), Some(1));
        assert!(db.contains_item("a"));
        assert_eq!(db.len(), 1);
        db.remove_item("a").unwrap();
        assert!(db.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn dashmap_contacts_persist_and_reload() {
        let path = temp_path("dashmap_persist");
        let _ = std::fs::remove_file(&path);
        let id = {
            let store = ContactStore::builder(&path)
                .max_latency(Duration::ZERO)
                .build_with::<DashMap<String, Contacts>>()
                .unwrap();
            store.create().await.unwrap().id
        };
        let store = ContactStore::builder(&path)
            .max_latency(Duration::ZERO)
            .build_with::<DashMap<String, Contacts>>()
            .unwrap();
        assert!(store.get(&id).await.unwrap().is_some());
        let _ = std::fs::remove_file(&path);
    }
}
