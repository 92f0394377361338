//! File records and manifest entries.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::url::UrlBase;

/// SHA-1 content hash of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(pub [u8; 20]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 40-character hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 40 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid sha1 hex digest: {hex}")))
    }
}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Root-relative path, always `/`-separated.
    pub path: String,
    /// Content hash.
    pub hash: ContentHash,
    /// Byte count read while hashing.
    pub size: u64,
}

impl FileRecord {
    /// Create a new record.
    pub fn new(path: impl Into<String>, hash: ContentHash, size: u64) -> Self {
        Self {
            path: path.into(),
            hash,
            size,
        }
    }

    /// Attach a download URL built from `base`.
    pub fn into_entry(self, base: &UrlBase) -> ManifestEntry {
        let url = base.join(&self.path);
        ManifestEntry {
            path: self.path,
            hash: self.hash,
            size: self.size,
            url,
        }
    }
}

/// A file record plus its download URL. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub hash: ContentHash,
    pub size: u64,
    pub url: String,
}

/// Ordered list of manifest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from records in the order given.
    pub fn from_records<I>(records: I, base: &UrlBase) -> Self
    where
        I: IntoIterator<Item = FileRecord>,
    {
        Self {
            entries: records.into_iter().map(|r| r.into_entry(base)).collect(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry sizes.
    pub fn total_size(&self) -> u64 {
        self.iter().map(|e| e.size).sum()
    }

    /// Sort entries by path.
    pub fn sort_by_path(&mut self) {
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Look up an entry by its relative path.
    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.iter().find(|e| e.path == path)
    }

    /// Iterate over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let hash = ContentHash::new([0xab; 20]);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 40);
        assert_eq!(ContentHash::from_hex(&hex), Some(hash));
        assert_eq!(ContentHash::from_hex("abc"), None);
        assert_eq!(ContentHash::from_hex(&"zz".repeat(20)), None);
    }

    #[test]
    fn test_into_entry_builds_url() {
        let record = FileRecord::new("a/b.txt", ContentHash::new([0; 20]), 3);
        let entry = record.into_entry(&UrlBase::new("https://cdn.example.com/"));
        assert_eq!(entry.url, "https://cdn.example.com/a/b.txt");
        assert_eq!(entry.size, 3);
    }

    #[test]
    fn test_sort_by_path() {
        let base = UrlBase::new("https://x");
        let mut manifest = Manifest::from_records(
            vec![
                FileRecord::new("b", ContentHash::new([1; 20]), 1),
                FileRecord::new("a/z", ContentHash::new([2; 20]), 2),
            ],
            &base,
        );
        assert_eq!(manifest.entries[0].path, "b");
        manifest.sort_by_path();
        assert_eq!(manifest.entries[0].path, "a/z");
        assert_eq!(manifest.total_size(), 3);
    }
}
