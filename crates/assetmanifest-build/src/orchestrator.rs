//! Per-instance manifest generation under a shared root.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use assetmanifest_core::{GenerateConfig, ManifestError};
use assetmanifest_scan::FileScanner;

use crate::builder::{ManifestBuilder, ManifestSummary};
use crate::writer::write_manifest;

/// Outcome for one instance folder.
#[derive(Debug)]
pub struct InstanceReport {
    /// Instance directory name, also its URL segment.
    pub name: String,
    /// Instance directory.
    pub dir: PathBuf,
    /// Summary on success, the error that stopped this instance otherwise.
    pub result: Result<ManifestSummary, ManifestError>,
}

impl InstanceReport {
    /// Whether this instance's manifest was written.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of a multi-instance run.
#[derive(Debug)]
pub struct RunReport {
    /// Canonical root that was scanned.
    pub root: PathBuf,
    /// One report per instance, in discovery order.
    pub instances: Vec<InstanceReport>,
}

impl RunReport {
    /// Whether no instance folders were found.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances whose manifests were written.
    pub fn succeeded(&self) -> impl Iterator<Item = &InstanceReport> {
        self.instances.iter().filter(|i| i.is_ok())
    }

    /// Instances that failed.
    pub fn failed(&self) -> impl Iterator<Item = &InstanceReport> {
        self.instances.iter().filter(|i| !i.is_ok())
    }

    /// Whether every instance succeeded.
    pub fn is_success(&self) -> bool {
        self.instances.iter().all(InstanceReport::is_ok)
    }
}

/// Generates one manifest inside each immediate subdirectory of a root.
///
/// Instances are independent: each touches only its own folder, so they are
/// processed in parallel on the scanner's pool and a failure in one leaves
/// the others' manifests intact.
pub struct InstanceOrchestrator {
    config: GenerateConfig,
}

impl InstanceOrchestrator {
    /// Create an orchestrator for `config.root`.
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Validate the root, discover instances, and generate every manifest.
    ///
    /// Returns `Err` only for failures before per-instance work starts.
    /// Per-instance failures are reported in [`RunReport::instances`].
    pub fn run(&self) -> Result<RunReport, ManifestError> {
        self.config.validate()?;

        let root = self.validate_root()?;
        let instances = self.discover_instances(&root)?;

        if instances.is_empty() {
            tracing::warn!(root = %root.display(), "no instance folders found");
            return Ok(RunReport {
                root,
                instances: Vec::new(),
            });
        }

        tracing::info!(
            root = %root.display(),
            instances = instances.len(),
            include = %self.config.include,
            "generating instance manifests"
        );

        let scanner = FileScanner::for_config(&self.config)?;
        let reports: Vec<InstanceReport> = scanner.install(|| {
            instances
                .par_iter()
                .map(|(name, dir)| {
                    let result = self.generate_instance(&scanner, name, dir);
                    if let Err(ref error) = result {
                        tracing::error!(instance = name.as_str(), "{error}");
                    }
                    InstanceReport {
                        name: name.clone(),
                        dir: dir.clone(),
                        result,
                    }
                })
                .collect()
        });

        Ok(RunReport {
            root,
            instances: reports,
        })
    }

    fn validate_root(&self) -> Result<PathBuf, ManifestError> {
        let root = &self.config.root;
        let root = root.canonicalize().map_err(|e| ManifestError::io(root, e))?;
        if !root.is_dir() {
            return Err(ManifestError::NotADirectory { path: root });
        }
        Ok(root)
    }

    /// List immediate subdirectories; other entries are ignored.
    fn discover_instances(&self, root: &Path) -> Result<Vec<(String, PathBuf)>, ManifestError> {
        let entries = fs::read_dir(root).map_err(|e| ManifestError::io(root, e))?;

        let mut instances = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ManifestError::io(root, e))?;
            let file_type = entry.file_type().map_err(|e| ManifestError::io(entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            instances.push((name, entry.path()));
        }

        if self.config.sort {
            instances.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Ok(instances)
    }

    fn generate_instance(
        &self,
        scanner: &FileScanner,
        name: &str,
        dir: &Path,
    ) -> Result<ManifestSummary, ManifestError> {
        let scan = scanner.scan_dir(&self.config, dir)?;

        let builder = ManifestBuilder::with_base(self.config.url_base())
            .instance(name)
            .sorted(self.config.sort);
        let manifest = builder.build(scan.records);

        let manifest_path = self.config.instance_manifest_path(dir);
        write_manifest(&manifest_path, &manifest)?;

        tracing::info!(
            instance = name,
            entries = manifest.len(),
            "wrote {name}/{}",
            self.config.manifest_name
        );

        Ok(ManifestSummary {
            label: name.to_string(),
            manifest_path,
            entries: manifest.len(),
            total_bytes: manifest.total_size(),
            warnings: scan.warnings,
            duration_ms: scan.duration.as_millis() as u64,
        })
    }
}
