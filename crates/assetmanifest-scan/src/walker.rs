//! Recursive file discovery.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};

use assetmanifest_core::{
    ErrorPolicy, GenerateConfig, IncludeSet, ManifestError, ScanWarning, WarningKind,
};

/// A regular file found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Path relative to the walked root, `/`-separated.
    pub relative: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

/// Files discovered under one root, in traversal order.
#[derive(Debug, Default)]
pub struct WalkOutput {
    /// Canonical root that was walked.
    pub root: PathBuf,
    /// Discovered files.
    pub files: Vec<WalkedFile>,
    /// Entries skipped under the lenient policy.
    pub warnings: Vec<ScanWarning>,
    /// Number of directories descended into (root excluded).
    pub dirs_visited: u64,
}

/// Walks a directory tree and yields every admitted regular file.
///
/// Directories are descended into but never emitted. Files named like the
/// reserved manifest are skipped at any depth, so a previous run's output is
/// never scanned.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    include: Arc<IncludeSet>,
    reserved_name: String,
    sort: bool,
    follow_symlinks: bool,
    threads: usize,
    policy: ErrorPolicy,
}

impl TreeWalker {
    /// Create a walker from a run configuration.
    pub fn from_config(config: &GenerateConfig) -> Self {
        Self {
            include: Arc::new(config.include.clone()),
            reserved_name: config.manifest_name.clone(),
            sort: config.sort,
            follow_symlinks: config.follow_symlinks,
            threads: config.threads,
            policy: config.error_policy,
        }
    }

    /// Walk `root`, returning admitted files in traversal order.
    ///
    /// Order follows the directory listing unless sorting is enabled, in
    /// which case each directory is read in file-name order.
    pub fn walk(&self, root: &Path) -> Result<WalkOutput, ManifestError> {
        let root_path = root.canonicalize().map_err(|e| ManifestError::io(root, e))?;

        if !root_path.is_dir() {
            return Err(ManifestError::NotADirectory { path: root_path });
        }

        let parallelism = self.parallelism();

        // Prune excluded top-level subtrees before they are read.
        let include = Arc::clone(&self.include);
        let walker = WalkDir::new(&root_path)
            .parallelism(parallelism)
            .skip_hidden(false)
            .sort(self.sort)
            .follow_links(self.follow_symlinks)
            .min_depth(1)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|entry| match entry {
                    Ok(e) if e.depth == 1 => include.permits(&e.file_name.to_string_lossy()),
                    _ => true,
                });
            });

        let mut output = WalkOutput {
            root: root_path.clone(),
            ..WalkOutput::default()
        };

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root_path.clone());
                    let error = ManifestError::Walk {
                        path,
                        message: err.to_string(),
                    };
                    // A busy pool loses the whole subtree, not one entry.
                    if err.is_busy() {
                        return Err(error);
                    }
                    self.tolerate(error, WarningKind::ReadError, &mut output.warnings)?;
                    continue;
                }
            };

            let file_type = entry.file_type();
            let path = entry.path();

            if file_type.is_dir() {
                output.dirs_visited += 1;
                continue;
            }
            if file_type.is_symlink() {
                tracing::debug!(path = %path.display(), "skipping symbolic link");
                continue;
            }
            if !file_type.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-regular file");
                continue;
            }
            if entry.file_name().to_string_lossy() == self.reserved_name.as_str() {
                tracing::debug!(path = %path.display(), "skipping reserved manifest file");
                continue;
            }

            let Some(relative) = relative_slash_path(&root_path, &path) else {
                continue;
            };
            if !self.include.permits_path(&relative) {
                continue;
            }

            output.files.push(WalkedFile { relative, path });
        }

        tracing::debug!(
            root = %output.root.display(),
            files = output.files.len(),
            dirs = output.dirs_visited,
            "walk complete"
        );

        Ok(output)
    }

    /// Pick jwalk's read-dir parallelism.
    ///
    /// Walks started from a rayon worker run serially: jwalk would otherwise
    /// queue its reader on a pool whose workers may all be blocked in
    /// sibling walks, and give up with a busy error.
    fn parallelism(&self) -> Parallelism {
        if rayon::current_thread_index().is_some() {
            return Parallelism::Serial;
        }
        match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        }
    }

    /// Apply the error policy: fail in strict mode, record a warning otherwise.
    fn tolerate(
        &self,
        error: ManifestError,
        kind: WarningKind,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ManifestError> {
        match self.policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Lenient => {
                tracing::warn!("{error}; skipping");
                warnings.push(ScanWarning::from_error(&error, kind));
                Ok(())
            }
        }
    }
}

/// Express `path` relative to `root` with `/` separators.
///
/// Returns `None` for the root itself or a path outside it.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
