//! On-disk fingerprints used to detect modified scripts.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// BLAKE3 content hash of a script file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a file's contents.
    pub fn of(contents: &[u8]) -> Self {
        Self(*blake3::hash(contents).as_bytes())
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Modification time, size and content hash recorded at the last successful parse.
///
/// Any differing component counts as a change, so edits made within the
/// filesystem's timestamp granularity are still detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Last modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// File size in bytes.
    pub size: u64,
    /// Hash of the file contents.
    pub hash: ContentHash,
}

impl Fingerprint {
    /// Build a fingerprint from already-read metadata and contents.
    pub fn from_parts(metadata: &Metadata, contents: &[u8]) -> Self {
        Self {
            modified: metadata.modified().ok(),
            size: metadata.len(),
            hash: ContentHash::of(contents),
        }
    }

    /// Read the current fingerprint of a file.
    pub fn of(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let contents = std::fs::read(path)?;
        Ok(Self::from_parts(&metadata, &contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_hex() {
        let hash = ContentHash::of(b"// Title: A\n");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, ContentHash::of(b"// Title: A\n"));
        assert_ne!(hash, ContentHash::of(b"// Title: B\n"));
    }

    #[test]
    fn test_same_size_edit_changes_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rhai");

        std::fs::write(&path, "// Title: A\n").unwrap();
        let before = Fingerprint::of(&path).unwrap();

        std::fs::write(&path, "// Title: B\n").unwrap();
        let after = Fingerprint::of(&path).unwrap();

        assert_eq!(before.size, after.size);
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Fingerprint::of(&dir.path().join("nope.rhai")).is_err());
    }
}
