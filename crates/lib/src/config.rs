//! Configuration for the build and serve commands.
//!
//! Configuration is a JSON file; every field is optional. Relative paths are
//! resolved against the directory containing the file, so a project can keep
//! `swcache.json` at its root and point at `client/dist`:
//!
//! ```json
//! {
//!   "root": ".",
//!   "frontend": { "build_command": "npm run build", "root": "client", "dist": "dist" },
//!   "server": { "host": "0.0.0.0", "port": 3000 },
//!   "templates": { "worker": null, "bootstrap": null }
//! }
//! ```
//!
//! The resolved [`Config`] is passed explicitly into each component; nothing
//! below this module reads the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("invalid server address {host}:{port}")]
  InvalidAddress { host: String, port: u16 },
}

/// The UI project that produces the asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
  /// Shell command that builds the UI, run inside `root`.
  pub build_command: String,
  /// UI project directory, relative to the top-level `root`.
  pub root: PathBuf,
  /// Build output directory, relative to the UI project directory.
  pub dist: PathBuf,
}

impl Default for FrontendConfig {
  fn default() -> Self {
    Self {
      build_command: "npm run build".to_string(),
      root: PathBuf::from("client"),
      dist: PathBuf::from("dist"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".to_string(),
      port: 3000,
    }
  }
}

/// Optional template overrides. `None` uses the templates compiled into the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
  pub worker: Option<PathBuf>,
  pub bootstrap: Option<PathBuf>,
}

/// Top-level configuration as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Project root, relative to the config file's directory.
  pub root: PathBuf,
  pub frontend: FrontendConfig,
  pub server: ServerConfig,
  pub templates: TemplateConfig,
  /// Directory relative paths are resolved against. Not part of the file.
  #[serde(skip)]
  pub base_dir: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      frontend: FrontendConfig::default(),
      server: ServerConfig::default(),
      templates: TemplateConfig::default(),
      base_dir: PathBuf::from("."),
    }
  }
}

impl Config {
  /// Load configuration.
  ///
  /// Lookup order:
  /// 1. `explicit`, which must exist
  /// 2. `$SWCACHE_CONFIG`, which must exist
  /// 3. `swcache.json` in the working directory, if present
  /// 4. built-in defaults rooted at the working directory
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    if let Some(path) = explicit {
      return Self::from_file(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
      return Self::from_file(Path::new(&path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
      return Self::from_file(default_path);
    }

    debug!("no config file found, using defaults");
    Ok(Self::default())
  }

  /// Parse a config file; relative paths in it become relative to its directory.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    if !path.is_file() {
      return Err(ConfigError::NotFound {
        path: path.to_path_buf(),
      });
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let mut config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let parent = path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));
    config.base_dir = dunce::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());

    debug!(path = %path.display(), base_dir = %config.base_dir.display(), "loaded config");
    Ok(config)
  }

  /// UI project directory; the build command runs here.
  pub fn frontend_dir(&self) -> PathBuf {
    self.base_dir.join(&self.root).join(&self.frontend.root)
  }

  /// Asset root produced by the build and served at runtime.
  pub fn asset_root(&self) -> PathBuf {
    self.frontend_dir().join(&self.frontend.dist)
  }

  pub fn worker_template(&self) -> Option<PathBuf> {
    self.templates.worker.as_ref().map(|p| self.base_dir.join(p))
  }

  pub fn bootstrap_template(&self) -> Option<PathBuf> {
    self.templates.bootstrap.as_ref().map(|p| self.base_dir.join(p))
  }

  /// Socket address the server binds to.
  pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
    let invalid = || ConfigError::InvalidAddress {
      host: self.server.host.clone(),
      port: self.server.port,
    };
    let ip = self.server.host.parse().map_err(|_| invalid())?;
    Ok(SocketAddr::new(ip, self.server.port))
  }
}
