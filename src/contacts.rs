//! The contact record store: CRUD over the `"contacts"` entry.
//!
//! The whole collection lives under one entry and every mutation writes the
//! whole collection back. Reads and writes are synchronous; the only await
//! point in each operation is the simulated latency, which always comes
//! before the load. Load, mutate and persist therefore run without a
//! suspension in between.
//!
//! Two mutations started concurrently each load the collection before either
//! persists, and whichever persists last wins. That is accepted for a
//! single-user store.

use crate::backend::EntryBackend;
use crate::contact::{Contact, ContactPatch};
use crate::error::{Error, Result};
use crate::flush::FlushPolicy;
use crate::latency::{LatencySimulator, DEFAULT_MAX_DELAY};
use crate::query;
use crate::store::{LocalStore, LocalStoreHandle};
use crate::DefaultBackend;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Name of the local-store entry holding the contact list.
pub const CONTACTS_KEY: &str = "contacts";

const ID_LEN: usize = 7;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Durable contact CRUD with simulated latency.
///
/// ```rust,no_run
/// use contact_store::{ContactPatch, ContactStore};
///
/// # async fn demo() -> contact_store::Result<()> {
/// let store = ContactStore::open("contacts.json")?;
/// let ada = store.create().await?;
/// store
///     .update(&ada.id, ContactPatch::new().first("Ada").last("Lovelace"))
///     .await?;
/// let hits = store.list("lov").await?;
/// assert_eq!(hits.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ContactStore<M = DefaultBackend<Vec<Contact>>> {
    db: LocalStoreHandle<Vec<Contact>, M>,
    latency: LatencySimulator,
    ids: Mutex<StdRng>,
}

impl ContactStore<DefaultBackend<Vec<Contact>>> {
    /// Open (or create) a store at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a store.
    pub fn builder(path: impl AsRef<Path>) -> ContactStoreBuilder {
        ContactStoreBuilder::new(path)
    }
}

impl<M> ContactStore<M>
where
    M: EntryBackend<Vec<Contact>> + 'static,
{
    /// Contacts matching `query` (everything when it's empty), in canonical
    /// order: `last`, then `created_at`.
    pub async fn list(&self, query: &str) -> Result<Vec<Contact>> {
        self.latency
            .simulate(Some(&format!("list:{query}")))
            .await;
        let contacts = self.load();
        let out = query::apply(&contacts, query);
        log::debug!(
            "listed {} of {} contacts for query {query:?}",
            out.len(),
            contacts.len()
        );
        Ok(out)
    }

    /// Allocate a blank contact at the head of the collection and persist it.
    pub async fn create(&self) -> Result<Contact> {
        self.latency.simulate(None).await;
        let mut contacts = self.load();

        let id = self.fresh_id(&contacts);
        // Never stamp earlier than an existing record, even if the wall
        // clock stepped backwards.
        let newest = contacts.iter().map(|c| c.created_at).max().unwrap_or(0);
        let contact = Contact::new(id, now_millis().max(newest));

        contacts.insert(0, contact.clone());
        self.persist(contacts)?;
        log::info!("created contact {}", contact.id);
        Ok(contact)
    }

    /// The contact with this id, or `None`.
    pub async fn get(&self, id: &str) -> Result<Option<Contact>> {
        self.latency.simulate(Some(&format!("get:{id}"))).await;
        Ok(self.load().into_iter().find(|c| c.id == id))
    }

    /// Apply `patch` to the contact with this id and persist.
    ///
    /// # Errors
    /// [`Error::NotFound`] if no contact has this id.
    pub async fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact> {
        self.latency.simulate(None).await;
        let mut contacts = self.load();
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(id.to_owned()))?;
        contact.apply(&patch);
        let updated = contact.clone();
        self.persist(contacts)?;
        log::info!("updated contact {id}");
        Ok(updated)
    }

    /// [`update`](Self::update) from raw form fields; see
    /// [`ContactPatch::from_form`].
    pub async fn update_from_form<I, K, V>(&self, id: &str, fields: I) -> Result<Contact>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.update(id, ContactPatch::from_form(fields)).await
    }

    /// Remove the contact with this id. Returns `false` (and writes nothing)
    /// if there was none. No simulated latency.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut contacts = self.load();
        match contacts.iter().position(|c| c.id == id) {
            Some(index) => {
                contacts.remove(index);
                self.persist(contacts)?;
                log::info!("deleted contact {id}");
                Ok(true)
            }
            None => {
                log::debug!("delete of unknown contact {id} ignored");
                Ok(false)
            }
        }
    }

    /// The latency simulator owned by this store.
    #[must_use]
    pub fn latency(&self) -> &LatencySimulator {
        &self.latency
    }

    /// Clear the latency cache, marking a fresh interaction.
    pub fn reset_latency(&self) {
        self.latency.reset();
    }

    /// The underlying local store.
    #[must_use]
    pub fn local_store(&self) -> &LocalStore<Vec<Contact>, M> {
        &self.db
    }

    /// Write everything to disk now. Only needed with a non-immediate flush
    /// policy.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()
    }

    fn load(&self) -> Vec<Contact> {
        self.db.get_item(CONTACTS_KEY).unwrap_or_default()
    }

    fn persist(&self, contacts: Vec<Contact>) -> Result<()> {
        self.db.set_item(CONTACTS_KEY, contacts).map(|_| ())
    }

    fn fresh_id(&self, existing: &[Contact]) -> String {
        let mut rng = self.ids.lock();
        loop {
            let id: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            if !existing.iter().any(|c| c.id == id) {
                return id;
            }
            log::debug!("id collision on {id}, retrying");
        }
    }
}

impl<M> std::fmt::Debug for ContactStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactStore")
            .field("db", &*self.db)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`ContactStore`].
///
/// ```rust,no_run
/// use contact_store::{ContactStore, FlushPolicy};
/// use std::time::Duration;
///
/// let store = ContactStore::builder("contacts.json")
///     .pretty(true)
///     .max_latency(Duration::ZERO)
///     .policy(FlushPolicy::Immediate)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ContactStoreBuilder {
    path: PathBuf,
    policy: FlushPolicy,
    pretty: bool,
    max_latency: Duration,
    seed: Option<u64>,
}

impl ContactStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: FlushPolicy::Immediate,
            pretty: false,
            max_latency: DEFAULT_MAX_DELAY,
            seed: None,
        }
    }

    /// Flush policy of the backing local store (default: immediate).
    pub fn policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pretty-print the backing file (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Upper bound of the simulated delay (default 800ms). Zero disables it.
    pub fn max_latency(mut self, max: Duration) -> Self {
        self.max_latency = max;
        self
    }

    /// Seed both the id generator and the delay source, for reproducible
    /// runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Open with the default ShardMap backend.
    pub fn build(self) -> Result<ContactStore> {
        self.build_with::<DefaultBackend<Vec<Contact>>>()
    }

    /// Open with a specific backend.
    pub fn build_with<M>(self) -> Result<ContactStore<M>>
    where
        M: EntryBackend<Vec<Contact>> + Default + 'static,
    {
        let db = LocalStore::<Vec<Contact>, M>::builder(&self.path)
            .policy(self.policy)
            .pretty(self.pretty)
            .build()?;
        let (latency, ids) = match self.seed {
            Some(seed) => (
                LatencySimulator::with_seed(self.max_latency, seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (
                LatencySimulator::new(self.max_latency),
                StdRng::from_entropy(),
            ),
        };
        log::debug!(
            "contact store ready at {} ({} contacts)",
            self.path.display(),
            db.get_item(CONTACTS_KEY).map_or(0, |c| c.len())
        );
        Ok(ContactStore {
            db,
            latency,
            ids: Mutex::new(ids),
        })
    }
}
