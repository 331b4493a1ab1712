//! Content checksums.
//!
//! MD5 is kept because stored checksums were produced with it; it is an
//! identity key for duplicate detection, not a security boundary.

use cliplog_core::Result;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Produces a hex digest of a file's bytes.
pub trait ContentHasher {
    fn hash_file(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl Md5Hasher {
    /// Digest everything `reader` yields, in fixed-size chunks.
    pub fn hash_reader<R: Read>(&self, reader: R) -> Result<String> {
        let mut reader = BufReader::with_capacity(CHUNK_SIZE, reader);
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl ContentHasher for Md5Hasher {
    fn hash_file(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let digest = self.hash_reader(file)?;
        tracing::debug!(path = %path.display(), %digest, "Hashed file");
        Ok(digest)
    }
}
