//! Generation configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ManifestError;
use crate::include::IncludeSet;
use crate::url::UrlBase;

/// File name each manifest is written under.
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Top-level folders scanned in multi-instance mode unless overridden.
pub const DEFAULT_INCLUDE: &str = "mods,config,resourcepacks,versions,libraries,shaderpacks";

/// What to do when a single file cannot be read.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ErrorPolicy {
    /// Abort the run on the first I/O error.
    #[default]
    Strict,
    /// Skip unreadable files, record a warning, and continue.
    Lenient,
}

/// Configuration for one manifest generation run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct GenerateConfig {
    /// Directory to scan. In multi-instance mode, the directory holding instances.
    pub root: PathBuf,

    /// Base URL entries are published under.
    pub base_url: String,

    /// Top-level include filter.
    #[builder(default)]
    #[serde(default)]
    pub include: IncludeSet,

    /// Reserved manifest file name, never scanned.
    #[builder(default = "DEFAULT_MANIFEST_NAME.to_string()")]
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,

    /// Explicit output path (single-root mode only).
    #[builder(default)]
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Number of hashing threads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Read directories sorted by file name.
    #[builder(default = "false")]
    #[serde(default)]
    pub sort: bool,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Per-file error handling.
    #[builder(default)]
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_NAME.to_string()
}

fn check_base_url(base_url: &str) -> Result<(), String> {
    if base_url.trim().trim_end_matches('/').is_empty() {
        return Err("Base URL is required".to_string());
    }
    Ok(())
}

fn check_manifest_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(format!("Manifest name must be a plain file name: {name:?}"));
    }
    Ok(())
}

impl GenerateConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        match self.base_url {
            Some(ref url) => check_base_url(url)?,
            None => return Err("Base URL is required".to_string()),
        }
        if let Some(ref name) = self.manifest_name {
            check_manifest_name(name)?;
        }
        Ok(())
    }
}

impl GenerateConfig {
    /// Create a new config builder.
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder::default()
    }

    /// Create a config with defaults for everything but root and base URL.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            include: IncludeSet::All,
            manifest_name: default_manifest_name(),
            output: None,
            threads: 0,
            sort: false,
            follow_symlinks: false,
            error_policy: ErrorPolicy::Strict,
        }
    }

    /// Re-check the invariants the builder enforces, for configs built directly
    /// or deserialized.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.root.as_os_str().is_empty() {
            return Err(ManifestError::invalid_config("Root path cannot be empty"));
        }
        check_base_url(&self.base_url).map_err(ManifestError::invalid_config)?;
        check_manifest_name(&self.manifest_name).map_err(ManifestError::invalid_config)?;
        Ok(())
    }

    /// Normalized base URL.
    pub fn url_base(&self) -> UrlBase {
        UrlBase::new(&self.base_url)
    }

    /// Where the single-root manifest is written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.manifest_name))
    }

    /// Path of an instance's manifest.
    pub fn instance_manifest_path(&self, instance_dir: &Path) -> PathBuf {
        instance_dir.join(&self.manifest_name)
    }

    /// Whether unreadable files are skipped.
    pub fn is_lenient(&self) -> bool {
        self.error_policy == ErrorPolicy::Lenient
    }
}
