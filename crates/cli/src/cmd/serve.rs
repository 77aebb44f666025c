use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use swcache_lib::config::Config;
use swcache_lib::serve::serve_until;

use crate::output::{print_info, print_success};

pub fn cmd_serve(
  config_path: Option<&Path>,
  host: Option<String>,
  port: Option<u16>,
  shutdown_after: Option<Duration>,
) -> Result<()> {
  let mut config = Config::load(config_path).context("Failed to load configuration")?;
  if let Some(host) = host {
    config.server.host = host;
  }
  if let Some(port) = port {
    config.server.port = port;
  }

  let addr = config.listen_addr()?;
  let asset_root = config.asset_root();

  print_info(&format!("Serving {} on http://{}", asset_root.display(), addr));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(serve_until(addr, asset_root, shutdown_signal(shutdown_after)))
    .context("Server failed")?;

  print_success("Server stopped");
  Ok(())
}

/// Resolves on Ctrl-C, or when `after` elapses if given.
async fn shutdown_signal(after: Option<Duration>) {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
    info!("received ctrl-c, shutting down");
  };

  match after {
    Some(duration) => {
      tokio::select! {
        _ = ctrl_c => {}
        _ = tokio::time::sleep(duration) => {
          info!(after = %humantime::format_duration(duration), "shutdown timer elapsed");
        }
      }
    }
    None => ctrl_c.await,
  }
}
