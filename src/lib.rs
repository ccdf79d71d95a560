//! Local contact store with search-as-you-type filtering.
//!
//! [`ContactStore`] keeps every contact under a single `"contacts"` entry of a
//! persistent JSON-backed [`LocalStore`], lists them through the pure
//! [`query`] pipeline, and pretends to be a remote backend by sleeping for a
//! random, cached amount of time before most calls.
//!
//! ```rust,no_run
//! use contact_store::{ContactPatch, ContactStore};
//!
//! # async fn demo() -> contact_store::Result<()> {
//! let store = ContactStore::open("contacts.json")?;
//! let contact = store.create().await?;
//! store.update(&contact.id, ContactPatch::new().first("Grace").last("Hopper")).await?;
//! assert!(store.get(&contact.id).await?.is_some());
//! assert!(store.delete(&contact.id).await?);
//! assert!(store.get(&contact.id).await?.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! **Single-process only.** Two processes opening the same file will clobber
//! each other, and concurrent mutations within one process are
//! last-write-wins.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod contact;
pub mod contacts;
pub mod error;
pub mod flush;
pub mod latency;
pub mod logging;
pub mod persist;
pub mod query;
pub mod serializer;
pub mod store;

pub use contact::{optimistic_favorite, Contact, ContactPatch};
pub use contacts::{ContactStore, ContactStoreBuilder, CONTACTS_KEY};
pub use error::{Error, Result};
pub use flush::FlushPolicy;
pub use latency::LatencySimulator;
pub use query::HistoryMode;
pub use store::{LocalStore, LocalStoreBuilder, LocalStoreHandle};

/// Default backend: ShardMap keyed by entry name.
pub type DefaultBackend<V> = shardmap::ShardMap<String, V>;
