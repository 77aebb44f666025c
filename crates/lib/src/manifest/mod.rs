//! Asset manifest generation.
//!
//! The manifest is the list of files a service worker pre-caches: every
//! regular file under the asset root, as a root-relative web path
//! (`/assets/index.js`), sorted so that an unchanged tree always yields the
//! same list regardless of directory iteration order.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::consts::WORKER_WEB_PATH;

/// Errors while enumerating the asset tree.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("asset root not found: {}", path.display())]
  RootNotFound { path: PathBuf },

  #[error("asset root is not a directory: {}", path.display())]
  NotADirectory { path: PathBuf },

  #[error("failed to walk asset root {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },
}

/// Sorted, root-relative paths of every file in an asset tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetManifest(Vec<String>);

impl AssetManifest {
  /// Build a manifest from arbitrary entries, sorting them.
  pub fn from_entries<I, S>(entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut entries: Vec<String> = entries.into_iter().map(Into::into).collect();
    entries.sort();
    Self(entries)
  }

  pub fn entries(&self) -> &[String] {
    &self.0
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, web_path: &str) -> bool {
    self.0.binary_search_by(|e| e.as_str().cmp(web_path)).is_ok()
  }
}

/// Walk `asset_root` and collect every file as a `/`-prefixed web path.
///
/// Directories are not emitted. Symlinks are not traversed; a symlink that
/// resolves to a file is listed like a file. A previously generated
/// `/sw.js` is left out because the worker always lists itself first.
///
/// # Errors
///
/// Fails if the root is missing, is not a directory, or any entry under it
/// cannot be read. The caller treats this as fatal.
pub fn generate_manifest(asset_root: &Path) -> Result<AssetManifest, ManifestError> {
  if !asset_root.exists() {
    return Err(ManifestError::RootNotFound {
      path: asset_root.to_path_buf(),
    });
  }
  if !asset_root.is_dir() {
    return Err(ManifestError::NotADirectory {
      path: asset_root.to_path_buf(),
    });
  }

  let mut entries = Vec::new();

  for entry in WalkDir::new(asset_root).min_depth(1) {
    let entry = entry.map_err(|e| ManifestError::Walk {
      path: asset_root.to_path_buf(),
      message: e.to_string(),
    })?;

    let file_type = entry.file_type();
    let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
    if !is_file {
      continue;
    }

    let rel_path = entry.path().strip_prefix(asset_root).unwrap_or(entry.path());
    let web_path = to_web_path(rel_path);

    if web_path == WORKER_WEB_PATH {
      continue;
    }

    entries.push(web_path);
  }

  let manifest = AssetManifest::from_entries(entries);
  debug!(root = %asset_root.display(), entries = manifest.len(), "generated asset manifest");
  Ok(manifest)
}

/// Join the normal components of a relative path with `/`, prefixed by `/`.
fn to_web_path(rel_path: &Path) -> String {
  let mut web_path = String::new();
  for component in rel_path.components() {
    if let Component::Normal(part) = component {
      web_path.push('/');
      web_path.push_str(&part.to_string_lossy());
    }
  }
  web_path
}
