//! `swcache manifest`: list what the service worker would pre-cache.

use std::path::Path;

use anyhow::{Context, Result};

use swcache_lib::config::Config;
use swcache_lib::manifest::generate_manifest;

use crate::output::{OutputFormat, print_json, print_warning};

pub fn cmd_manifest(config_path: Option<&Path>, output: OutputFormat) -> Result<()> {
  let config = Config::load(config_path).context("Failed to load configuration")?;
  let asset_root = config.asset_root();

  let manifest = generate_manifest(&asset_root)
    .with_context(|| format!("Failed to read asset root {}", asset_root.display()))?;

  if output.is_json() {
    return print_json(&manifest);
  }

  if manifest.is_empty() {
    print_warning(&format!("No assets under {}", asset_root.display()));
    return Ok(());
  }

  for entry in manifest.iter() {
    println!("{}", entry);
  }

  Ok(())
}
