//! Unified error type for store and contact operations.

/// Things that can go wrong when using the store.
///
/// Note that a missing contact is only an error for
/// [`ContactStore::update`](crate::ContactStore::update). `get` reports absence
/// as `None` and `delete` as `false`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename).
    Io(String),
    /// Failed to serialize the entries to bytes.
    Serialize(String),
    /// Failed to deserialize bytes back into entries.
    Deserialize(String),
    /// Bad configuration (invalid path, policy, etc.).
    Config(String),
    /// The backing file was written with an on-disk format we don't understand.
    Schema(String),
    /// `update` was asked to patch a contact id that isn't in the store.
    NotFound(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Schema(msg) => write!(f, "schema error: {msg}"),
            Error::NotFound(id) => write!(f, "no contact found for `{id}`"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Decode-side conversion: syntax, truncation and shape errors all become
/// [`Error::Deserialize`]. Encoding failures are mapped to
/// [`Error::Serialize`] explicitly where they happen.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else {
            Error::Deserialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_id() {
        let err = Error::NotFound("abc123".into());
        assert_eq!(err.to_string(), "no contact found for `abc123`");
    }

    #[test]
    fn malformed_json_maps_to_deserialize() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[test]
    fn wrong_shape_maps_to_deserialize() {
        let err: Error = serde_json::from_str::<Vec<u32>>(r#""nope""#)
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[test]
    fn io_error_maps_to_io() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk gone").into();
        assert_eq!(err, Error::Io("disk gone".into()));
    }
}
