//! Content fingerprinting.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Produces content-addressed fingerprints independent of name or location.
pub struct ContentHasher;

impl ContentHasher {
    /// Generate the SHA-256 hex digest of file contents.
    ///
    /// Streams the file in 64KB chunks so large RAW files are never loaded
    /// into memory whole.
    pub fn content_hash(path: &Path) -> PipelineResult<String> {
        let unavailable = |source| PipelineError::HashUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        let mut hasher = Sha256::new();

        let mut buffer = [0u8; 64 * 1024];
        loop {
            let bytes_read = reader.read(&mut buffer).map_err(unavailable)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Best-effort fingerprint: `None` when the file cannot be read.
    pub fn fingerprint(path: &Path) -> Option<String> {
        match Self::content_hash(path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_hash_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.bin");
        fs::write(&path, b"hello world").unwrap();

        let hash1 = ContentHasher::content_hash(&path).unwrap();
        let hash2 = ContentHasher::content_hash(&path).unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(
            hash1,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_identical_bytes_under_different_names_match() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("copy")).unwrap();
        let original = tmp.path().join("IMG_0001.jpg");
        let moved = tmp.path().join("copy").join("holiday.jpg");
        fs::write(&original, b"same pixels").unwrap();
        fs::write(&moved, b"same pixels").unwrap();

        assert_eq!(
            ContentHasher::content_hash(&original).unwrap(),
            ContentHasher::content_hash(&moved).unwrap()
        );
    }

    #[test]
    fn test_different_content_differs() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");
        fs::write(&a, b"content A").unwrap();
        fs::write(&b, b"content B").unwrap();

        assert_ne!(
            ContentHasher::content_hash(&a).unwrap(),
            ContentHasher::content_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_hash_spans_multiple_chunks() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("large.bin");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let streamed = ContentHasher::content_hash(&path).unwrap();
        let direct = format!("{:x}", Sha256::digest(&data));
        assert_eq!(streamed, direct);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let path = Path::new("/nonexistent/file.jpg");
        assert!(matches!(
            ContentHasher::content_hash(path),
            Err(PipelineError::HashUnavailable { .. })
        ));
        assert_eq!(ContentHasher::fingerprint(path), None);
    }
}
