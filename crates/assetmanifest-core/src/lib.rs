//! Core types and configuration for assetmanifest.
//!
//! This crate holds the data model shared by the scanner and the manifest
//! builder: file records, manifest entries, the include filter, the run
//! configuration and the error types.

mod config;
mod error;
mod include;
mod record;
mod url;

pub use config::{
    DEFAULT_INCLUDE, DEFAULT_MANIFEST_NAME, ErrorPolicy, GenerateConfig, GenerateConfigBuilder,
};
pub use error::{ManifestError, ScanWarning, WarningKind};
pub use include::IncludeSet;
pub use record::{ContentHash, FileRecord, Manifest, ManifestEntry};
pub use url::UrlBase;
