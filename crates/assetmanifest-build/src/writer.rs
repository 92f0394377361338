//! Manifest serialization and atomic file output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use assetmanifest_core::{Manifest, ManifestError};

/// Render a manifest as an indented JSON array with a trailing newline.
pub fn render_manifest(manifest: &Manifest) -> Result<String, ManifestError> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// Write a manifest to `path` in one step.
///
/// The document is rendered in memory, written to a temporary file in the
/// destination directory, then renamed over `path`. Readers see either the
/// previous manifest or the complete new one.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    let json = render_manifest(manifest)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| ManifestError::io(dir, e))?;
    temp.write_all(json.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ManifestError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| ManifestError::io(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "manifest written");
    Ok(())
}
