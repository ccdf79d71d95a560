//! Persistent local key-value store: named entries, handle, and builder.
//!
//! This is the durable layer under [`ContactStore`](crate::ContactStore). It
//! knows nothing about contacts: it maps entry names to values of one type and
//! writes them out as a versioned JSON file.

use crate::backend::EntryBackend;
use crate::error::Result;
use crate::flush::{FlushPolicy, FlushTrigger, FlushWorker};
use crate::persist::{atomic_write, load};
use crate::serializer::{JsonSerializer, Serializer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persistent JSON-backed store of named entries.
///
/// Generic over the entry value `V` and map backend `M`. Use
/// [`open`](Self::open) for a quick start or [`builder`](Self::builder) for
/// control over flush policy and pretty-printing.
pub struct LocalStore<V, M> {
    pub(crate) map: Arc<M>,
    pub(crate) path: PathBuf,
    pub(crate) serializer: JsonSerializer,
    pub(crate) policy: FlushPolicy,
    pub(crate) trigger: Option<FlushTrigger>,
    pub(crate) _marker: PhantomData<V>,
}

impl<V, M> LocalStore<V, M>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned + 'static,
    M: EntryBackend<V> + 'static,
{
    /// Open (or create) a store at `path` with the default policy
    /// ([`FlushPolicy::Immediate`]) and compact JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<LocalStoreHandle<V, M>>
    where
        M: Default,
    {
        Self::builder(path).build()
    }

    /// Open with a specific flush policy.
    pub fn open_with_policy(
        path: impl AsRef<Path>,
        policy: FlushPolicy,
    ) -> Result<LocalStoreHandle<V, M>>
    where
        M: Default,
    {
        Self::builder(path).policy(policy).build()
    }

    /// Start configuring a new store.
    pub fn builder(path: impl AsRef<Path>) -> LocalStoreBuilder<V, M>
    where
        M: Default,
    {
        LocalStoreBuilder::new(path)
    }

    // ---- reads ----

    /// Value stored under `name`, or `None` if there is no such entry.
    #[must_use]
    pub fn get_item(&self, name: &str) -> Option<V> {
        self.map.fetch(name)
    }

    /// `true` if an entry called `name` exists.
    #[must_use]
    pub fn contains_item(&self, name: &str) -> bool {
        self.map.has(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.entry_count()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entry names, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map.snapshot().into_iter().map(|(k, _)| k).collect();
        names.sort();
        names
    }

    /// Snapshot of every `(name, value)` pair.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, V)> {
        self.map.snapshot()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The flush policy this store was opened with.
    #[must_use]
    pub fn policy(&self) -> &FlushPolicy {
        &self.policy
    }

    // ---- writes ----

    /// Store `value` under `name`, returning the previous value.
    pub fn set_item(&self, name: impl Into<String>, value: V) -> Result<Option<V>> {
        let prev = self.map.put(name.into(), value);
        self.notify_mutation()?;
        Ok(prev)
    }

    /// Remove the entry called `name`, returning its value if present. A
    /// missing entry is not an error and triggers no write.
    pub fn remove_item(&self, name: &str) -> Result<Option<V>> {
        let prev = self.map.take(name);
        if prev.is_some() {
            self.notify_mutation()?;
        }
        Ok(prev)
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<()> {
        self.map.purge();
        self.notify_mutation()
    }

    // ---- persistence ----

    /// Write the current entries to disk (atomic temp-file + rename).
    pub fn flush(&self) -> Result<()> {
        write_snapshot::<V, M>(self.map.as_ref(), &self.path, &self.serializer)
    }

    fn notify_mutation(&self) -> Result<()> {
        match &self.policy {
            FlushPolicy::Immediate => self.flush(),
            FlushPolicy::Async(_) => {
                if let Some(t) = &self.trigger {
                    t.poke();
                }
                Ok(())
            }
            FlushPolicy::Manual => Ok(()),
        }
    }
}

impl<V, M> std::fmt::Debug for LocalStore<V, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn write_snapshot<V, M>(map: &M, path: &Path, serializer: &JsonSerializer) -> Result<()>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned,
    M: EntryBackend<V>,
{
    let entries: BTreeMap<String, V> = map.snapshot().into_iter().collect();
    let bytes = serializer.serialize(&entries)?;
    atomic_write(path, &bytes)?;
    log::trace!("flushed {} entries to {}", entries.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`LocalStore`].
pub struct LocalStoreBuilder<V, M> {
    path: PathBuf,
    policy: FlushPolicy,
    pretty: bool,
    _marker: PhantomData<(V, M)>,
}

impl<V, M> LocalStoreBuilder<V, M>
where
    V: Send + Sync + Clone + Serialize + DeserializeOwned + 'static,
    M: EntryBackend<V> + Default + 'static,
{
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: FlushPolicy::default(),
            pretty: false,
            _marker: PhantomData,
        }
    }

    /// Set the flush policy (default: [`FlushPolicy::Immediate`]).
    pub fn policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Load (or create) the store and return a handle.
    pub fn build(self) -> Result<LocalStoreHandle<V, M>> {
        if self.path.as_os_str().is_empty() {
            return Err(crate::Error::Config("store path is empty".into()));
        }
        if let FlushPolicy::Async(interval) = &self.policy {
            if interval.is_zero() {
                return Err(crate::Error::Config(
                    "async flush interval must be non-zero".into(),
                ));
            }
        }

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let map = Arc::new(M::default());
        let data = load::<V, _>(&self.path, &serializer)?;
        log::debug!(
            "opened local store at {} with {} entries",
            self.path.display(),
            data.len()
        );
        for (name, value) in data {
            map.put(name, value);
        }

        let (worker, trigger) = match &self.policy {
            FlushPolicy::Async(interval) => {
                let map_ref = Arc::clone(&map);
                let path = self.path.clone();
                let ser = serializer.clone();
                let (w, t) = FlushWorker::spawn(*interval, move || {
                    write_snapshot::<V, M>(map_ref.as_ref(), &path, &ser)
                });
                (Some(w), Some(t))
            }
            _ => (None, None),
        };

        let store = LocalStore {
            map,
            path: self.path,
            serializer,
            policy: self.policy,
            trigger,
            _marker: PhantomData,
        };

        Ok(LocalStoreHandle {
            inner: Arc::new(store),
            worker,
        })
    }
}

impl<V, M> std::fmt::Debug for LocalStoreBuilder<V, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStoreBuilder")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("pretty", &self.pretty)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owns the store and (for the async policy) the background flush thread.
///
/// Derefs to [`LocalStore`]. Dropping it joins the flush thread after one
/// last write.
pub struct LocalStoreHandle<V, M> {
    // Declared before `worker`: the store's trigger must be dropped first so
    // the worker sees its channel disconnect.
    pub(crate) inner: Arc<LocalStore<V, M>>,
    #[allow(dead_code)]
    pub(crate) worker: Option<FlushWorker>,
}

impl<V, M> std::ops::Deref for LocalStoreHandle<V, M> {
    type Target = LocalStore<V, M>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<V, M> std::fmt::Debug for LocalStoreHandle<V, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner, f)
    }
}
