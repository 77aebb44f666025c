//! Build orchestration.
//!
//! A build runs the external UI build command, then post-processes its
//! output directory in one pass:
//!
//! 1. install the bootstrap script (`service-worker.js`)
//! 2. instrument `index.html`
//! 3. generate the asset manifest
//! 4. write the service worker (`sw.js`) with the manifest embedded
//!
//! Every step runs once. The first failure aborts the build; there is no
//! retry and no partial-success result.
//!
//! # Submodules
//!
//! - [`cmd`] - External build command execution

pub mod cmd;
mod types;

use std::fs;
use std::time::Instant;

use tracing::info;

use crate::consts::INDEX_DOCUMENT;
use crate::html::{install_bootstrap, instrument_html, is_instrumented};
use crate::manifest::{AssetManifest, generate_manifest};
use crate::util::fs::write_atomic;
use crate::worker::{BOOTSTRAP_TEMPLATE, WORKER_TEMPLATE, load_template, render_worker, write_worker};

pub use cmd::run_build_command;
pub use types::*;

/// Run the build command (unless skipped) and generate the offline artifacts.
pub async fn build(options: &BuildOptions) -> Result<BuildResult, BuildError> {
  let started = Instant::now();

  let build_ran = match &options.build_command {
    Some(command) => {
      run_build_command(command, &options.frontend_dir).await?;
      true
    }
    None => {
      info!("skipping UI build command");
      false
    }
  };

  let generated = generate(options)?;

  Ok(BuildResult {
    generated,
    build_ran,
    elapsed: started.elapsed(),
  })
}

/// Post-process an already built asset tree.
///
/// Templates are loaded and checked before anything is written, so a missing
/// or malformed template leaves the tree untouched. Entry HTML that already carries the
/// registration tag is refused: instrumenting it again would duplicate the
/// tag and re-wrap every stylesheet.
pub fn generate(options: &BuildOptions) -> Result<GenerateResult, BuildError> {
  let asset_root = &options.asset_root;
  if !asset_root.is_dir() {
    return Err(BuildError::MissingAssetRoot {
      path: asset_root.clone(),
    });
  }

  let bootstrap_template = load_template(options.bootstrap_template.as_deref(), BOOTSTRAP_TEMPLATE)?;
  let worker_template = load_template(options.worker_template.as_deref(), WORKER_TEMPLATE)?;
  // Reject a malformed worker template before the tree is modified.
  render_worker(&worker_template, &AssetManifest::default())?;

  let index_path = asset_root.join(INDEX_DOCUMENT);
  let html = fs::read_to_string(&index_path).map_err(|source| BuildError::MissingEntry {
    path: index_path.clone(),
    source,
  })?;
  if is_instrumented(&html) {
    return Err(BuildError::AlreadyInstrumented { path: index_path });
  }
  let instrumented = instrument_html(&html)?;

  let bootstrap_path = install_bootstrap(asset_root, &bootstrap_template)?;

  write_atomic(&index_path, instrumented.as_bytes())?;
  info!(path = %index_path.display(), "instrumented entry HTML");

  let manifest = generate_manifest(asset_root)?;
  let worker_path = write_worker(asset_root, &worker_template, &manifest)?;

  Ok(GenerateResult {
    manifest,
    index_path,
    bootstrap_path,
    worker_path,
  })
}
