//! Streaming SHA-1 content hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha1::{Digest, Sha1};

use assetmanifest_core::{ContentHash, ManifestError};

/// Read buffer size used while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Hash everything a reader yields, returning the digest and the byte count.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<(ContentHash, u64)> {
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    let digest: [u8; 20] = hasher.finalize().into();
    Ok((ContentHash::new(digest), total))
}

/// Compute the SHA-1 hash and exact size of a file.
pub fn hash_file(path: &Path) -> Result<(ContentHash, u64), ManifestError> {
    let file = File::open(path).map_err(|e| ManifestError::io(path, e))?;
    hash_reader(file).map_err(|e| ManifestError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Reader that fails after yielding some bytes.
    struct FailingReader {
        remaining: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk vanished"));
            }
            let n = buf.len().min(self.remaining);
            buf[..n].fill(b'x');
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_known_vectors() {
        let (hash, size) = hash_reader(&b""[..]).unwrap();
        assert_eq!(hash.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(size, 0);

        let (hash, size) = hash_reader(&b"abc"[..]).unwrap();
        assert_eq!(hash.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(size, 3);

        let (hash, _) =
            hash_reader(&b"The quick brown fox jumps over the lazy dog"[..]).unwrap();
        assert_eq!(hash.to_hex(), "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12");
    }

    #[test]
    fn test_multi_chunk_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.bin");
        // Spans several read chunks; one million 'a' is a published vector.
        fs::write(&path, vec![b'a'; 1_000_000]).unwrap();

        let (hash, size) = hash_file(&path).unwrap();
        assert_eq!(hash.to_hex(), "34aa973cd4c4daa4f61eeb2bdbad27316534016f");
        assert_eq!(size, 1_000_000);
    }

    #[test]
    fn test_read_failure_propagates() {
        let result = hash_reader(FailingReader {
            remaining: CHUNK_SIZE + 10,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = hash_file(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }
}
