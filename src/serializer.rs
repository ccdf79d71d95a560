//! Serialization layer. Entries are written as a versioned JSON envelope:
//!
//! ```json
//! { "version": 1, "entries": { "contacts": [ ... ] } }
//! ```
//!
//! Implement [`Serializer`] if you need a different format.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk format version written by this crate. Bump it (and teach
/// [`JsonSerializer::deserialize`] how to upgrade) whenever the stored shape
/// of an entry changes.
pub const FORMAT_VERSION: u32 = 1;

/// Converts entry snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode entries to bytes.
    fn serialize<V: Serialize>(&self, entries: &BTreeMap<String, V>) -> Result<Vec<u8>>;

    /// Decode bytes back into entries.
    fn deserialize<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<BTreeMap<String, V>>;
}

#[derive(Serialize)]
struct EnvelopeOut<'a, V> {
    version: u32,
    entries: &'a BTreeMap<String, V>,
}

#[derive(Deserialize)]
struct EnvelopeIn<V> {
    version: u32,
    entries: BTreeMap<String, V>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: Option<u32>,
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize<V: Serialize>(&self, entries: &BTreeMap<String, V>) -> Result<Vec<u8>> {
        let envelope = EnvelopeOut {
            version: FORMAT_VERSION,
            entries,
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&envelope)
        } else {
            serde_json::to_vec(&envelope)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<BTreeMap<String, V>> {
        // Check the version before touching the entries so a newer file reports
        // a schema problem instead of a confusing shape mismatch.
        let header: VersionHeader =
            serde_json::from_slice(bytes).map_err(Error::from)?;
        match header.version {
            Some(FORMAT_VERSION) => {}
            Some(other) => {
                return Err(Error::Schema(format!(
                    "unsupported format version {other} (expected {FORMAT_VERSION})"
                )))
            }
            None => return Err(Error::Schema("missing format version".into())),
        }
        let envelope: EnvelopeIn<V> =
            serde_json::from_slice(bytes).map_err(Error::from)?;
        debug_assert_eq!(envelope.version, FORMAT_VERSION);
        Ok(envelope.entries)
    }
}
