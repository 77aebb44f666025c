//! Service worker generation.
//!
//! The worker template declares its pre-cache list as
//! `const cacheData = [ ... ];`. Generation swaps that single declaration
//! for one built from the [`AssetManifest`], leaving every other byte of the
//! template untouched. This is plain text substitution, so the template
//! must contain the declaration exactly once.

mod templates;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::{CACHE_LIST_NAME, WORKER_SCRIPT, WORKER_WEB_PATH};
use crate::manifest::AssetManifest;
use crate::util::fs::{WriteError, write_atomic};

pub use templates::{BOOTSTRAP_TEMPLATE, TemplateError, WORKER_TEMPLATE, load_template};

/// Errors while rendering or writing the service worker.
#[derive(Debug, Error)]
pub enum WorkerError {
  #[error("worker template has no `const cacheData = [...];` declaration")]
  MissingDeclaration,

  #[error("worker template declares `cacheData` {count} times, expected exactly once")]
  DuplicateDeclaration { count: usize },

  #[error("worker template `cacheData` declaration is not closed with `];`")]
  UnterminatedDeclaration,

  #[error(transparent)]
  Write(#[from] WriteError),
}

/// Render the `cacheData` declaration for a manifest.
///
/// The worker's own path always comes first, followed by the manifest
/// entries in manifest order.
pub fn cache_list_declaration(manifest: &AssetManifest) -> String {
  let entries: Vec<String> = std::iter::once(WORKER_WEB_PATH)
    .chain(manifest.iter())
    .map(|entry| format!("  \"{}\"", escape_js_string(entry)))
    .collect();

  format!("const {} = [\n{}\n];", CACHE_LIST_NAME, entries.join(",\n"))
}

/// Replace the template's cache-list declaration with one built from `manifest`.
///
/// # Errors
///
/// The declaration must appear exactly once and be terminated by `];`.
pub fn render_worker(template: &str, manifest: &AssetManifest) -> Result<String, WorkerError> {
  let opening = format!("const {} = [", CACHE_LIST_NAME);

  let starts: Vec<usize> = template.match_indices(&opening).map(|(i, _)| i).collect();
  let start = match starts.as_slice() {
    [] => return Err(WorkerError::MissingDeclaration),
    [start] => *start,
    _ => return Err(WorkerError::DuplicateDeclaration { count: starts.len() }),
  };

  let body_start = start + opening.len();
  let close = template[body_start..]
    .find("];")
    .ok_or(WorkerError::UnterminatedDeclaration)?;
  let end = body_start + close + "];".len();

  let mut rendered = String::with_capacity(template.len() + manifest.len() * 32);
  rendered.push_str(&template[..start]);
  rendered.push_str(&cache_list_declaration(manifest));
  rendered.push_str(&template[end..]);

  Ok(rendered)
}

/// Render the worker and write it to `<asset_root>/sw.js`.
pub fn write_worker(asset_root: &Path, template: &str, manifest: &AssetManifest) -> Result<PathBuf, WorkerError> {
  let rendered = render_worker(template, manifest)?;
  let path = asset_root.join(WORKER_SCRIPT);
  write_atomic(&path, rendered.as_bytes())?;

  info!(path = %path.display(), entries = manifest.len() + 1, "wrote service worker");
  Ok(path)
}

fn escape_js_string(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"")
}
