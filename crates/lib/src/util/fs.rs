//! Atomic writes for generated artifacts.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Error writing a file atomically.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
  pub path: PathBuf,
  pub source: std::io::Error,
}

/// Write `contents` to `path` through a temp file in the same directory,
/// then rename it into place.
///
/// Readers of `path` observe either the previous file or the complete new
/// one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
  let err = |source: std::io::Error| WriteError {
    path: path.to_path_buf(),
    source,
  };

  let dir = path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or_else(|| Path::new("."));
  let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(err)?;
  temp.write_all(contents).map_err(err)?;
  temp.as_file().sync_all().map_err(err)?;
  temp.persist(path).map_err(|e| err(e.error))?;

  Ok(())
}
