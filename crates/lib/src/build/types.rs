//! Types for build orchestration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;
use crate::html::InstrumentError;
use crate::manifest::{AssetManifest, ManifestError};
use crate::util::fs::WriteError;
use crate::worker::{TemplateError, WorkerError};

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The build command could not be started.
  #[error("failed to run build command `{cmd}`: {source}")]
  Spawn { cmd: String, source: std::io::Error },

  /// The build command exited unsuccessfully.
  #[error("build command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  #[error("asset root not found: {}", path.display())]
  MissingAssetRoot { path: PathBuf },

  #[error("entry HTML missing or unreadable at {}: {source}", path.display())]
  MissingEntry { path: PathBuf, source: std::io::Error },

  /// The entry HTML was instrumented by an earlier run.
  #[error("entry HTML is already instrumented: {}", path.display())]
  AlreadyInstrumented { path: PathBuf },

  #[error(transparent)]
  Template(#[from] TemplateError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Worker(#[from] WorkerError),

  #[error(transparent)]
  Instrument(#[from] InstrumentError),

  #[error(transparent)]
  Write(#[from] WriteError),
}

/// Everything a build needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Directory the UI build writes into.
  pub asset_root: PathBuf,
  /// Working directory for the build command.
  pub frontend_dir: PathBuf,
  /// Shell command producing the asset tree. `None` skips straight to generation.
  pub build_command: Option<String>,
  pub worker_template: Option<PathBuf>,
  pub bootstrap_template: Option<PathBuf>,
}

impl BuildOptions {
  pub fn from_config(config: &Config, skip_build: bool) -> Self {
    Self {
      asset_root: config.asset_root(),
      frontend_dir: config.frontend_dir(),
      build_command: (!skip_build).then(|| config.frontend.build_command.clone()),
      worker_template: config.worker_template(),
      bootstrap_template: config.bootstrap_template(),
    }
  }
}

/// Artifacts written by [`generate`](super::generate).
#[derive(Debug)]
pub struct GenerateResult {
  pub manifest: AssetManifest,
  pub index_path: PathBuf,
  pub bootstrap_path: PathBuf,
  pub worker_path: PathBuf,
}

/// Outcome of a full [`build`](super::build).
#[derive(Debug)]
pub struct BuildResult {
  pub generated: GenerateResult,
  /// Whether the external build command ran.
  pub build_ran: bool,
  pub elapsed: Duration,
}
