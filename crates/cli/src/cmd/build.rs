//! Implementation of the `swcache build` command.
//!
//! Runs the frontend build command, then generates the service worker and
//! instruments the entry HTML under the asset root.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use swcache_lib::build::{BuildOptions, build};
use swcache_lib::config::Config;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

/// Execute the build command.
///
/// Prints a summary with the number of pre-cached entries, the written
/// artifacts, and the elapsed time.
pub fn cmd_build(config_path: Option<&Path>, skip_build: bool, output: OutputFormat) -> Result<()> {
  let config = Config::load(config_path).context("Failed to load configuration")?;
  let options = BuildOptions::from_config(&config, skip_build);

  if !output.is_json() {
    match &options.build_command {
      Some(cmd) => print_info(&format!("Running `{}` in {}", cmd, options.frontend_dir.display())),
      None => print_info("Skipping frontend build"),
    }
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(build(&options)).context("Build failed")?;

  let generated = &result.generated;
  // The worker lists itself ahead of the manifest.
  let cached = generated.manifest.len() + 1;
  let elapsed = humantime::format_duration(Duration::from_millis(result.elapsed.as_millis() as u64));

  if output.is_json() {
    let json_output = serde_json::json!({
      "build_ran": result.build_ran,
      "asset_root": options.asset_root,
      "index": generated.index_path,
      "bootstrap": generated.bootstrap_path,
      "worker": generated.worker_path,
      "manifest": generated.manifest,
      "elapsed_ms": result.elapsed.as_millis() as u64,
    });
    print_json(&json_output)?;
  } else {
    print_success("Build complete!");
    print_stat("Asset root", &options.asset_root.display().to_string());
    print_stat("Worker", &generated.worker_path.display().to_string());
    print_stat("Bootstrap", &generated.bootstrap_path.display().to_string());
    print_stat("Cached entries", &cached.to_string());
    print_stat("Elapsed", &elapsed.to_string());
  }

  Ok(())
}
