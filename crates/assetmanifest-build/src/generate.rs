//! Single-root manifest generation.

use assetmanifest_core::{GenerateConfig, ManifestError};
use assetmanifest_scan::FileScanner;

use crate::builder::{ManifestBuilder, ManifestSummary};
use crate::writer::write_manifest;

/// Scan `config.root` and write one manifest to `config.output_path()`.
///
/// Nothing is written unless the whole scan succeeds.
pub fn generate_single(config: &GenerateConfig) -> Result<ManifestSummary, ManifestError> {
    config.validate()?;

    let output_path = config.output_path();
    let scanner = FileScanner::for_config(config)?;
    let scan = scanner.scan(config)?;

    let manifest = ManifestBuilder::with_base(config.url_base())
        .sorted(config.sort)
        .build(scan.records);

    write_manifest(&output_path, &manifest)?;

    let label = scan
        .root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| scan.root.display().to_string());

    tracing::info!(
        root = %scan.root.display(),
        output = %output_path.display(),
        entries = manifest.len(),
        "wrote manifest"
    );

    Ok(ManifestSummary {
        label,
        manifest_path: output_path,
        entries: manifest.len(),
        total_bytes: manifest.total_size(),
        warnings: scan.warnings,
        duration_ms: scan.duration.as_millis() as u64,
    })
}
