//! Script templates compiled into the binary, and loading of overrides.

use std::path::{Path, PathBuf};

/// Service worker template; its `cacheData` declaration is replaced at build time.
pub const WORKER_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/sw.template.js"));

/// Bootstrap script referenced from the entry HTML; registers `/sw.js`.
pub const BOOTSTRAP_TEMPLATE: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/service-worker.template.js"));

/// Error reading a template override.
#[derive(Debug, thiserror::Error)]
#[error("failed to read template {}: {source}", path.display())]
pub struct TemplateError {
  pub path: PathBuf,
  pub source: std::io::Error,
}

/// Read the template at `path`, or fall back to the compiled-in `builtin`.
pub fn load_template(path: Option<&Path>, builtin: &str) -> Result<String, TemplateError> {
  match path {
    Some(path) => std::fs::read_to_string(path).map_err(|source| TemplateError {
      path: path.to_path_buf(),
      source,
    }),
    None => Ok(builtin.to_string()),
  }
}
