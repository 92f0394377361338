//! Walk-then-hash pipeline producing ordered file records.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::broadcast;

use assetmanifest_core::{
    ErrorPolicy, FileRecord, GenerateConfig, ManifestError, ScanWarning, WarningKind,
};

use crate::hasher::hash_file;
use crate::progress::HashProgress;
use crate::walker::{TreeWalker, WalkedFile};

/// Send a progress snapshot every this many hashed files.
const PROGRESS_INTERVAL: u64 = 64;

/// Result of scanning one root.
#[derive(Debug)]
pub struct ScanOutput {
    /// Canonical root that was scanned.
    pub root: PathBuf,
    /// Hashed files, in traversal order.
    pub records: Vec<FileRecord>,
    /// Files skipped under the lenient policy.
    pub warnings: Vec<ScanWarning>,
    /// Wall time for walk and hash.
    pub duration: Duration,
}

impl ScanOutput {
    /// Total bytes hashed.
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

/// Scanner that walks a tree and hashes its files on a bounded rayon pool.
///
/// Hashing runs in parallel but records are collected in traversal order, so
/// output never depends on which file finished hashing first.
pub struct FileScanner {
    pool: Option<Arc<ThreadPool>>,
    progress_tx: broadcast::Sender<HashProgress>,
}

impl FileScanner {
    /// Create a scanner on rayon's global pool.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            pool: None,
            progress_tx,
        }
    }

    /// Create a scanner sized by `config.threads` (0 = rayon's global pool).
    pub fn for_config(config: &GenerateConfig) -> Result<Self, ManifestError> {
        let mut scanner = Self::new();
        if config.threads > 0 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("assetmanifest-hash-{i}"))
                .build()
                .map_err(|e| ManifestError::invalid_config(format!("thread pool: {e}")))?;
            scanner.pool = Some(Arc::new(pool));
        }
        Ok(scanner)
    }

    /// Subscribe to hashing progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<HashProgress> {
        self.progress_tx.subscribe()
    }

    /// Run `op` inside this scanner's pool.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Scan `config.root`.
    pub fn scan(&self, config: &GenerateConfig) -> Result<ScanOutput, ManifestError> {
        self.scan_dir(config, &config.root)
    }

    /// Scan an arbitrary directory with the settings in `config`.
    pub fn scan_dir(&self, config: &GenerateConfig, root: &Path) -> Result<ScanOutput, ManifestError> {
        let start = Instant::now();

        let walked = TreeWalker::from_config(config).walk(root)?;
        let mut warnings = walked.warnings;
        let files = walked.files;

        tracing::debug!(
            root = %walked.root.display(),
            files = files.len(),
            "hashing discovered files"
        );

        let tracker = ProgressTracker::new(files.len() as u64, start, &self.progress_tx);

        let records = match config.error_policy {
            ErrorPolicy::Strict => self.install(|| {
                files
                    .par_iter()
                    .map(|file| hash_walked(file, &tracker))
                    .collect::<Result<Vec<_>, _>>()
            })?,
            ErrorPolicy::Lenient => {
                let results: Vec<Result<FileRecord, ManifestError>> = self.install(|| {
                    files
                        .par_iter()
                        .map(|file| hash_walked(file, &tracker))
                        .collect()
                });

                let mut records = Vec::with_capacity(results.len());
                for result in results {
                    match result {
                        Ok(record) => records.push(record),
                        Err(error) => {
                            tracing::warn!("{error}; skipping");
                            warnings.push(ScanWarning::from_error(&error, WarningKind::HashError));
                        }
                    }
                }
                records
            }
        };

        tracker.finish();

        Ok(ScanOutput {
            root: walked.root,
            records,
            warnings,
            duration: start.elapsed(),
        })
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_walked(file: &WalkedFile, tracker: &ProgressTracker<'_>) -> Result<FileRecord, ManifestError> {
    let (hash, size) = hash_file(&file.path)?;
    tracing::trace!(path = %file.relative, %hash, size, "hashed");
    tracker.record(&file.path, size);
    Ok(FileRecord::new(file.relative.clone(), hash, size))
}

/// Shared counters updated from hashing workers.
struct ProgressTracker<'a> {
    total_files: u64,
    files_hashed: AtomicU64,
    bytes_hashed: AtomicU64,
    start: Instant,
    tx: &'a broadcast::Sender<HashProgress>,
}

impl<'a> ProgressTracker<'a> {
    fn new(total_files: u64, start: Instant, tx: &'a broadcast::Sender<HashProgress>) -> Self {
        Self {
            total_files,
            files_hashed: AtomicU64::new(0),
            bytes_hashed: AtomicU64::new(0),
            start,
            tx,
        }
    }

    fn record(&self, path: &Path, size: u64) {
        let bytes = self.bytes_hashed.fetch_add(size, Ordering::Relaxed) + size;
        let count = self.files_hashed.fetch_add(1, Ordering::Relaxed) + 1;
        if count % PROGRESS_INTERVAL == 0 {
            self.send(count, bytes, path.to_path_buf());
        }
    }

    fn finish(&self) {
        let count = self.files_hashed.load(Ordering::Relaxed);
        let bytes = self.bytes_hashed.load(Ordering::Relaxed);
        let progress = self.snapshot(count, bytes, PathBuf::new());
        tracing::debug!(
            files = progress.files_hashed,
            bytes = progress.bytes_hashed,
            bytes_per_second = progress.bytes_per_second() as u64,
            "hashing finished"
        );
        // No subscribers is fine.
        let _ = self.tx.send(progress);
    }

    fn send(&self, files_hashed: u64, bytes_hashed: u64, current_path: PathBuf) {
        let _ = self.tx.send(self.snapshot(files_hashed, bytes_hashed, current_path));
    }

    fn snapshot(&self, files_hashed: u64, bytes_hashed: u64, current_path: PathBuf) -> HashProgress {
        HashProgress {
            files_hashed,
            total_files: self.total_files,
            bytes_hashed,
            current_path,
            elapsed: self.start.elapsed(),
        }
    }
}
