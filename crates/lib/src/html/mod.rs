//! Entry HTML instrumentation.
//!
//! Three textual rewrites make the entry document offline-capable and stop
//! it from blocking on scripts and stylesheets:
//!
//! 1. a `<script src="/service-worker.js" defer>` tag right after `</title>`
//! 2. `defer` on every empty script tag (`></script>` → ` defer></script>`)
//! 3. `media="print" onload="this.media='all'"` on every `rel="stylesheet"`
//!
//! The rewrites are substring replacements, not a DOM rewrite, and they are
//! not idempotent: instrumenting twice adds a second registration tag and
//! wraps stylesheets again. Callers must instrument freshly built HTML only.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::consts::BOOTSTRAP_SCRIPT;
use crate::util::fs::{WriteError, write_atomic};

const TITLE_CLOSE: &str = "</title>";

const SCRIPT_CLOSE: &str = "></script>";
const DEFERRED_SCRIPT_CLOSE: &str = " defer></script>";

const STYLESHEET_REL: &str = r#"rel="stylesheet""#;
const ASYNC_STYLESHEET_REL: &str = r#"media="print" onload="this.media='all'" rel="stylesheet""#;

/// Tag inserted after `</title>` to load the bootstrap script.
pub const REGISTRATION_TAG: &str = r#"<script src="/service-worker.js" defer></script>"#;

#[derive(Debug, Error)]
pub enum InstrumentError {
  #[error("entry HTML contains {count} `{marker}` markers, expected at most one")]
  AmbiguousMarker { marker: &'static str, count: usize },

  #[error(transparent)]
  Write(#[from] WriteError),
}

/// Apply all three rewrites to `html`.
///
/// Scripts are deferred before the registration tag goes in, so the tag
/// carries a single `defer`.
///
/// A document without `</title>` gets no registration tag; this is logged
/// and otherwise ignored. A document with several `</title>` markers is
/// rejected because the insertion point would be ambiguous.
pub fn instrument_html(html: &str) -> Result<String, InstrumentError> {
  let html = defer_scripts(html);
  let html = async_stylesheets(&html);
  insert_registration(&html)
}

/// Whether `html` already carries the registration tag.
pub fn is_instrumented(html: &str) -> bool {
  html.contains(REGISTRATION_TAG)
}

fn insert_registration(html: &str) -> Result<String, InstrumentError> {
  match html.matches(TITLE_CLOSE).count() {
    0 => {
      warn!("entry HTML has no {} marker, service worker registration not inserted", TITLE_CLOSE);
      Ok(html.to_string())
    }
    1 => Ok(html.replacen(TITLE_CLOSE, &format!("{}\n    {}", TITLE_CLOSE, REGISTRATION_TAG), 1)),
    count => Err(InstrumentError::AmbiguousMarker {
      marker: TITLE_CLOSE,
      count,
    }),
  }
}

fn defer_scripts(html: &str) -> String {
  html.replace(SCRIPT_CLOSE, DEFERRED_SCRIPT_CLOSE)
}

fn async_stylesheets(html: &str) -> String {
  html.replace(STYLESHEET_REL, ASYNC_STYLESHEET_REL)
}

/// Write the bootstrap script to `<asset_root>/service-worker.js`.
pub fn install_bootstrap(asset_root: &Path, template: &str) -> Result<PathBuf, InstrumentError> {
  let path = asset_root.join(BOOTSTRAP_SCRIPT);
  write_atomic(&path, template.as_bytes())?;

  info!(path = %path.display(), "installed bootstrap script");
  Ok(path)
}
