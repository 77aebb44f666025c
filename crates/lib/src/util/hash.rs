//! Hashing utilities for content-derived cache validators.
//!
//! This module provides:
//! - `ContentHash`: a 64-character lowercase hex SHA-256 digest
//! - `hash_file()`: streaming file hashing on the async runtime
//! - `read_hashed()`: file contents plus digest from a single read
//! - `hash_bytes()`: arbitrary byte hashing
//!
//! The digests exist for change detection only. Collision resistance is a
//! side effect of the algorithm, not something callers rely on.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::consts::HASH_CHUNK_SIZE;

/// A full 64-character SHA-256 digest of some content.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters), used verbatim
/// as an `ETag` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub String);

impl ContentHash {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while reading a file for hashing.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to open {}: {source}", path.display())]
  Open { path: PathBuf, source: std::io::Error },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },
}

/// Hash a file's contents by folding fixed-size chunks into the digest.
pub async fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let mut hasher = Sha256::new();
  fold_chunks(path, |chunk| hasher.update(chunk)).await?;
  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// A file's bytes and their digest, taken from one open handle.
#[derive(Debug, Clone)]
pub struct HashedContents {
  pub bytes: Vec<u8>,
  pub hash: ContentHash,
}

/// Read a file and hash it in the same pass.
///
/// The digest always describes exactly the returned bytes, even if the path
/// is replaced while the read is in progress.
pub async fn read_hashed(path: &Path) -> Result<HashedContents, HashError> {
  let mut hasher = Sha256::new();
  let mut bytes = Vec::new();
  fold_chunks(path, |chunk| {
    hasher.update(chunk);
    bytes.extend_from_slice(chunk);
  })
  .await?;

  Ok(HashedContents {
    bytes,
    hash: ContentHash(format!("{:x}", hasher.finalize())),
  })
}

/// Feed a file to `on_chunk` in `HASH_CHUNK_SIZE` pieces.
///
/// The file handle lives only inside this future, so it is released on
/// success, on error, and when the future is dropped mid-read.
async fn fold_chunks<F>(path: &Path, mut on_chunk: F) -> Result<(), HashError>
where
  F: FnMut(&[u8]),
{
  let mut file = tokio::fs::File::open(path).await.map_err(|source| HashError::Open {
    path: path.to_path_buf(),
    source,
  })?;

  let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

  loop {
    let bytes_read = file.read(&mut buffer).await.map_err(|source| HashError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    if bytes_read == 0 {
      break;
    }
    on_chunk(&buffer[..bytes_read]);
  }

  Ok(())
}

/// Hash arbitrary bytes.
///
/// Returns the full 64-character SHA256 hash.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(format!("{:x}", hasher.finalize()))
}
