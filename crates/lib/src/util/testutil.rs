//! Test utilities for swcache-lib.
//!
//! Helpers for laying out fake build output and for shell snippets that
//! stand in for the external UI build.

use std::fs;
use std::path::Path;

/// Entry HTML shaped like typical bundler output.
pub const SAMPLE_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>App</title>
    <script type="module" crossorigin src="/assets/index.js"></script>
    <link rel="stylesheet" crossorigin href="/assets/index.css">
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

/// Write each `(relative path, content)` pair under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
  for (relative, content) in files {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }
}

/// Shell snippet that creates `filename` in the working directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> String {
  format!("touch {}", filename)
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> String {
  format!("type nul > {}", filename)
}

/// Shell snippet that exits with `code`.
pub fn exit_with(code: i32) -> String {
  format!("exit {}", code)
}
