//! Manifest construction from scanned records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use assetmanifest_core::{FileRecord, Manifest, ScanWarning, UrlBase};

/// Attaches download URLs to file records.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    base: UrlBase,
    sort: bool,
}

impl ManifestBuilder {
    /// Create a builder publishing under `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_base(UrlBase::new(base_url))
    }

    /// Create a builder from an already normalized base.
    pub fn with_base(base: UrlBase) -> Self {
        Self { base, sort: false }
    }

    /// Insert an instance segment between the base URL and each path.
    pub fn instance(mut self, name: &str) -> Self {
        self.base = self.base.scoped(name);
        self
    }

    /// Sort entries by path instead of keeping traversal order.
    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Build the manifest.
    pub fn build<I>(&self, records: I) -> Manifest
    where
        I: IntoIterator<Item = FileRecord>,
    {
        let mut manifest = Manifest::from_records(records, &self.base);
        if self.sort {
            manifest.sort_by_path();
        }
        manifest
    }
}

/// What one manifest write produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSummary {
    /// Label used in logs (instance name or scanned folder).
    pub label: String,
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    /// Number of entries.
    pub entries: usize,
    /// Sum of entry sizes.
    pub total_bytes: u64,
    /// Files skipped under the lenient policy.
    pub warnings: Vec<ScanWarning>,
    /// Scan time in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetmanifest_core::ContentHash;

    fn records() -> Vec<FileRecord> {
        vec![
            FileRecord::new("z.txt", ContentHash::new([1; 20]), 1),
            FileRecord::new("a/b.txt", ContentHash::new([2; 20]), 2),
        ]
    }

    #[test]
    fn test_build_keeps_order_and_urls() {
        let manifest = ManifestBuilder::new("https://cdn.example.com/").build(records());
        assert_eq!(manifest.entries[0].path, "z.txt");
        assert_eq!(manifest.entries[1].url, "https://cdn.example.com/a/b.txt");
    }

    #[test]
    fn test_build_with_instance() {
        let manifest = ManifestBuilder::new("https://cdn.example.com/")
            .instance("modpack1")
            .build(records());
        assert_eq!(
            manifest.get("a/b.txt").unwrap().url,
            "https://cdn.example.com/modpack1/a/b.txt"
        );
    }

    #[test]
    fn test_sorted_build() {
        let manifest = ManifestBuilder::new("https://x").sorted(true).build(records());
        assert_eq!(manifest.entries[0].path, "a/b.txt");
    }

    #[test]
    fn test_duplicate_content_gets_separate_entries() {
        let hash = ContentHash::new([9; 20]);
        let manifest = ManifestBuilder::new("https://x").build(vec![
            FileRecord::new("a.bin", hash, 4),
            FileRecord::new("b.bin", hash, 4),
        ]);
        assert_eq!(manifest.len(), 2);
    }
}
