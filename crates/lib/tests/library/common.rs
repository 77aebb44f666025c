//! Shared helpers for library integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use tempfile::TempDir;

use swcache_lib::build::BuildOptions;
use swcache_lib::serve::CacheServer;

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Shop</title>
    <script type="module" src="/assets/main.js"></script>
    <link rel="stylesheet" href="/assets/main.css">
  </head>
  <body><div id="app"></div></body>
</html>
"#;

/// A project directory whose `dist/` looks like fresh bundler output.
pub struct TestSite {
  pub temp: TempDir,
}

impl TestSite {
  pub fn new() -> Self {
    let site = Self {
      temp: TempDir::new().unwrap(),
    };
    site.write_asset("index.html", INDEX_HTML);
    site.write_asset("assets/main.js", "import './chunk.js';");
    site.write_asset("assets/chunk.js", "export const x = 1;");
    site.write_asset("assets/main.css", "body { margin: 0 }");
    site
  }

  pub fn asset_root(&self) -> PathBuf {
    self.temp.path().join("dist")
  }

  /// Write a file relative to the asset root.
  pub fn write_asset(&self, relative_path: &str, content: &str) {
    let path = self.asset_root().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn read_asset(&self, relative_path: &str) -> String {
    fs::read_to_string(self.asset_root().join(relative_path)).unwrap()
  }

  pub fn build_options(&self) -> BuildOptions {
    BuildOptions {
      asset_root: self.asset_root(),
      frontend_dir: self.temp.path().to_path_buf(),
      build_command: None,
      worker_template: None,
      bootstrap_template: None,
    }
  }

  pub async fn start_server(&self) -> CacheServer {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    CacheServer::start(addr, self.asset_root()).await.unwrap()
  }
}
