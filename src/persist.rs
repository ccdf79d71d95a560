//! Disk I/O helpers: load from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On FAT32 or
//! network shares there are no hard guarantees. There is also no rollback: if
//! a write fails, memory and disk disagree until the next successful flush.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reads and decodes the file at `path`. A missing or empty file is an empty
/// store, not an error.
pub fn load<V, S>(path: &Path, serializer: &S) -> Result<BTreeMap<String, V>>
where
    V: DeserializeOwned,
    S: Serializer,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no backing file at {}, starting empty", path.display());
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(Error::from(e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    serializer.deserialize(&bytes)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`, so a crash
/// mid-write never leaves a half-written file behind.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    path.with_extension(format!("{ext}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonSerializer;

    #[test]
    fn temp_file_sits_next_to_target() {
        let tmp = temp_path_for(Path::new("/data/contacts.json"));
        assert_eq!(tmp, PathBuf::from("/data/contacts.json.tmp"));

        let tmp = temp_path_for(Path::new("/data/contacts"));
        assert_eq!(tmp, PathBuf::from("/data/contacts.json.tmp"));
    }

    #[test]
    fn whitespace_only_file_loads_empty() {
        let path = std::env::temp_dir().join("contact_store_unit_blank.json");
        std::fs::write(&path, b"  \n").unwrap();
        let entries = load::<Vec<u32>, _>(&path, &JsonSerializer::new()).unwrap();
        assert!(entries.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_path_is_io_error() {
        // Reading a directory fails with something other than NotFound.
        let dir = std::env::temp_dir();
        let err = load::<Vec<u32>, _>(&dir, &JsonSerializer::new()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
