//! Directory walking and content hashing for assetmanifest.
//!
//! This crate turns a directory tree into an ordered list of
//! [`FileRecord`]s: jwalk does the traversal, rayon hashes the files, and
//! results come back in traversal order.
//!
//! # Example
//!
//! ```rust,no_run
//! use assetmanifest_scan::{FileScanner, GenerateConfig};
//!
//! let config = GenerateConfig::new("/srv/files/pack", "https://cdn.example.com");
//! let scan = FileScanner::new().scan(&config).unwrap();
//!
//! for record in &scan.records {
//!     println!("{} {} {}", record.hash, record.size, record.path);
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use assetmanifest_scan::FileScanner;
//!
//! let scanner = FileScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Hashed {}/{} files", progress.files_hashed, progress.total_files);
//!     }
//! });
//! ```

mod hasher;
mod progress;
mod scanner;
mod walker;

pub use hasher::{CHUNK_SIZE, hash_file, hash_reader};
pub use progress::HashProgress;
pub use scanner::{FileScanner, ScanOutput};
pub use walker::{TreeWalker, WalkedFile, WalkOutput};

// Re-export core types for convenience
pub use assetmanifest_core::{
    ContentHash, ErrorPolicy, FileRecord, GenerateConfig, IncludeSet, ManifestError,
    ScanWarning, WarningKind,
};
