//! BLAKE3 content hashing for uploads and downloaded model artifacts.

use blake3::Hasher as Blake3Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Content hashing helpers.
pub struct Hasher;

impl Hasher {
    /// BLAKE3 hash of a file, streamed in 64KB chunks.
    pub fn content_hash(path: &Path) -> std::io::Result<String> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Blake3Hasher::new();

        let mut buffer = [0u8; 65536];
        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.finalize().to_hex().to_string())
    }

    /// BLAKE3 hash of an in-memory buffer.
    pub fn content_hash_from_bytes(data: &[u8]) -> String {
        blake3::hash(data).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_bytes_hash_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal.jpg");
        let data = b"not really a jpeg, but hashable".repeat(5000);
        std::fs::write(&path, &data).unwrap();

        let from_file = Hasher::content_hash(&path).unwrap();
        let from_bytes = Hasher::content_hash_from_bytes(&data);
        assert_eq!(from_file, from_bytes);
        assert_eq!(from_file.len(), 64);
    }

    #[test]
    fn test_content_hash_missing_file() {
        assert!(Hasher::content_hash(Path::new("/nonexistent/meal.jpg")).is_err());
    }
}
