use std::collections::HashSet;
use std::fs;

use assetmanifest_scan::{
    ErrorPolicy, FileRecord, FileScanner, GenerateConfig, IncludeSet, ManifestError, WarningKind,
    hash_file,
};
use tempfile::TempDir;

fn asset_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("mods/client")).unwrap();
    fs::create_dir(root.join("config")).unwrap();
    fs::create_dir(root.join("cache")).unwrap();

    fs::write(root.join("mods/a.jar"), b"abc").unwrap();
    fs::write(root.join("mods/client/b.jar"), vec![7u8; 200_000]).unwrap();
    fs::write(root.join("config/options.txt"), b"").unwrap();
    fs::write(root.join("cache/index.bin"), b"cache").unwrap();

    temp
}

fn record_set(records: &[FileRecord]) -> HashSet<(String, String, u64)> {
    records
        .iter()
        .map(|r| (r.path.clone(), r.hash.to_hex(), r.size))
        .collect()
}

#[test]
fn test_hash_file_matches_known_digest() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("abc.txt");
    fs::write(&path, b"abc").unwrap();

    let (hash, size) = hash_file(&path).unwrap();
    assert_eq!(hash.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(size, 3);
}

#[test]
fn test_sizes_match_file_lengths() {
    let temp = asset_tree();
    let config = GenerateConfig::new(temp.path(), "https://cdn.example.com");
    let output = FileScanner::new().scan(&config).unwrap();

    for record in &output.records {
        let on_disk = fs::metadata(temp.path().join(&record.path)).unwrap().len();
        assert_eq!(record.size, on_disk, "size mismatch for {}", record.path);
    }
}

#[test]
fn test_paths_are_relative_and_slash_separated() {
    let temp = asset_tree();
    let config = GenerateConfig::new(temp.path(), "https://cdn.example.com");
    let output = FileScanner::new().scan(&config).unwrap();

    let root_str = temp.path().to_string_lossy().to_string();
    for record in &output.records {
        assert!(!record.path.contains('\\'));
        assert!(!record.path.starts_with('/'));
        assert!(!record.path.contains(&root_str));
    }
    assert!(output.records.iter().any(|r| r.path == "mods/client/b.jar"));
}

#[test]
fn test_filter_excludes_cache() {
    let temp = asset_tree();
    let mut config = GenerateConfig::new(temp.path(), "https://cdn.example.com");
    config.include = IncludeSet::parse("mods,config");

    let output = FileScanner::new().scan(&config).unwrap();
    assert_eq!(output.records.len(), 3);
    assert!(!output.records.iter().any(|r| r.path.starts_with("cache/")));
}

#[test]
fn test_rescan_is_idempotent_and_self_excluding() {
    let temp = asset_tree();
    let config = GenerateConfig::new(temp.path(), "https://cdn.example.com");
    let scanner = FileScanner::new();

    let first = scanner.scan(&config).unwrap();
    fs::write(temp.path().join("manifest.json"), "[]").unwrap();
    let second = scanner.scan(&config).unwrap();

    assert_eq!(record_set(&first.records), record_set(&second.records));
    assert!(!second.records.iter().any(|r| r.path == "manifest.json"));
}

#[test]
fn test_sorted_scans_are_identical() {
    let temp = asset_tree();
    let mut config = GenerateConfig::new(temp.path(), "https://cdn.example.com");
    config.sort = true;
    let scanner = FileScanner::new();

    let first = scanner.scan(&config).unwrap();
    let second = scanner.scan(&config).unwrap();
    assert_eq!(first.records, second.records);
}

#[test]
fn test_missing_root_fails_before_hashing() {
    let temp = TempDir::new().unwrap();
    let config = GenerateConfig::new(temp.path().join("nope"), "https://cdn.example.com");
    let err = FileScanner::new().scan(&config).unwrap_err();
    assert!(matches!(err, ManifestError::NotFound { .. }));
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_unless_followed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("real.txt"), b"data").unwrap();
    std::os::unix::fs::symlink(temp.path().join("real.txt"), temp.path().join("link.txt"))
        .unwrap();

    let mut config = GenerateConfig::new(temp.path(), "https://x");
    let output = FileScanner::new().scan(&config).unwrap();
    assert_eq!(output.records.len(), 1);

    config.follow_symlinks = true;
    let output = FileScanner::new().scan(&config).unwrap();
    assert_eq!(output.records.len(), 2);
    let link = output.records.iter().find(|r| r.path == "link.txt").unwrap();
    assert_eq!(link.size, 4);
}

#[test]
fn test_lenient_policy_scans_clean_tree_without_warnings() {
    let temp = asset_tree();
    let mut config = GenerateConfig::new(temp.path(), "https://x");
    config.error_policy = ErrorPolicy::Lenient;

    let output = FileScanner::new().scan(&config).unwrap();
    assert_eq!(output.records.len(), 4);
    assert!(output.warnings.is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_entry_fails_strict_and_warns_lenient() {
    let temp = asset_tree();
    let dangling = temp.path().join("mods/broken.jar");
    std::os::unix::fs::symlink(temp.path().join("does-not-exist"), &dangling).unwrap();

    let mut config = GenerateConfig::new(temp.path(), "https://x");
    config.follow_symlinks = true;
    let err = FileScanner::new().scan(&config).unwrap_err();
    assert!(matches!(err, ManifestError::Walk { .. }));

    config.error_policy = ErrorPolicy::Lenient;
    let output = FileScanner::new().scan(&config).unwrap();
    assert_eq!(output.records.len(), 4);
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].kind, WarningKind::ReadError);
    assert!(output.warnings[0].path.ends_with("mods/broken.jar"));
}
