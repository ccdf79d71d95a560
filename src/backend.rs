//! Pluggable in-memory backends for the local store.
//!
//! The local store keeps its entries (name -> value) in one of these maps and
//! writes a snapshot of them to disk. Implement [`EntryBackend`] to bring your
//! own concurrent map.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Map of entry name to value that can back a [`LocalStore`](crate::LocalStore).
///
/// Values are handed out by clone. The contact store keeps the whole contact
/// list under one entry, so every read copies the list; that's fine for the
/// small single-user datasets this crate targets.
pub trait EntryBackend<V>: Send + Sync
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned,
{
    /// Store `value` under `name`, returning the previous value if any.
    fn put(&self, name: String, value: V) -> Option<V>;

    /// Look up the value stored under `name`.
    fn fetch(&self, name: &str) -> Option<V>;

    /// Remove the entry, returning its value if it was present.
    fn take(&self, name: &str) -> Option<V>;

    /// Point-in-time copy of every entry. Must not hold locks once returned.
    fn snapshot(&self) -> Vec<(String, V)>;

    /// Number of entries.
    fn entry_count(&self) -> usize {
        self.snapshot().len()
    }

    /// `true` if an entry with this name exists.
    fn has(&self, name: &str) -> bool {
        self.fetch(name).is_some()
    }

    /// Drop every entry.
    fn purge(&self) {
        for (name, _) in self.snapshot() {
            self.take(&name);
        }
    }
}

// ---- ShardMap ----------------------------------------------------------------

impl<V> EntryBackend<V> for shardmap::ShardMap<String, V>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned,
{
    fn put(&self, name: String, value: V) -> Option<V> {
        self.insert(name, value).map(|arc| (*arc).clone())
    }

    fn fetch(&self, name: &str) -> Option<V> {
        self.get(&name.to_owned()).map(|arc| (*arc).clone())
    }

    fn take(&self, name: &str) -> Option<V> {
        self.remove(&name.to_owned()).map(|arc| (*arc).clone())
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        self.iter_snapshot()
            .map(|(name, arc)| (name, (*arc).clone()))
            .collect()
    }

    fn entry_count(&self) -> usize {
        self.len()
    }

    // get() hands back an Arc, so this is a refcount bump rather than a clone.
    fn has(&self, name: &str) -> bool {
        self.get(&name.to_owned()).is_some()
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl<V> EntryBackend<V> for parking_lot::RwLock<std::collections::HashMap<String, V>>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned,
{
    fn put(&self, name: String, value: V) -> Option<V> {
        self.write().insert(name, value)
    }

    fn fetch(&self, name: &str) -> Option<V> {
        self.read().get(name).cloned()
    }

    fn take(&self, name: &str) -> Option<V> {
        self.write().remove(name)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        self.read()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn entry_count(&self) -> usize {
        self.read().len()
    }

    fn has(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    fn purge(&self) {
        self.write().clear()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl<V> EntryBackend<V> for dashmap::DashMap<String, V>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned,
{
    fn put(&self, name: String, value: V) -> Option<V> {
        self.insert(name, value)
    }

    fn fetch(&self, name: &str) -> Option<V> {
        self.get(name).map(|r| r.value().clone())
    }

    fn take(&self, name: &str) -> Option<V> {
        self.remove(name).map(|(_, v)| v)
    }

    fn snapshot(&self) -> Vec<(String, V)> {
        self.iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn purge(&self) {
        self.clear()
    }
}
