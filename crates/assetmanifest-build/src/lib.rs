//! Manifest building and orchestration for assetmanifest.
//!
//! This crate turns scanned [`FileRecord`]s into a [`Manifest`], writes it to
//! disk in a single atomic step, and fans a scan out over every instance
//! folder beneath a root.
//!
//! # Single root
//!
//! ```rust,no_run
//! use assetmanifest_build::generate_single;
//! use assetmanifest_core::GenerateConfig;
//!
//! let mut config = GenerateConfig::new("dist", "https://cdn.example.com/");
//! config.output = Some("dist-manifest.json".into());
//! let summary = generate_single(&config).unwrap();
//! println!("Wrote {} entries to {}", summary.entries, summary.manifest_path.display());
//! ```
//!
//! # Instances
//!
//! ```rust,no_run
//! use assetmanifest_build::InstanceOrchestrator;
//! use assetmanifest_core::{GenerateConfig, IncludeSet};
//!
//! let mut config = GenerateConfig::new("files", "https://cdn.example.com/");
//! config.include = IncludeSet::parse("mods,config");
//!
//! let report = InstanceOrchestrator::new(config).run().unwrap();
//! for instance in &report.instances {
//!     println!("{}: {}", instance.name, if instance.is_ok() { "ok" } else { "failed" });
//! }
//! ```

mod builder;
mod generate;
mod orchestrator;
mod writer;

pub use builder::{ManifestBuilder, ManifestSummary};
pub use generate::generate_single;
pub use orchestrator::{InstanceOrchestrator, InstanceReport, RunReport};
pub use writer::{render_manifest, write_manifest};

// Re-export core types
pub use assetmanifest_core::{FileRecord, Manifest, ManifestEntry, ManifestError};
