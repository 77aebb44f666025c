//! Request path resolution confined to the asset root.

use std::path::{Component, Path, PathBuf};

use crate::consts::INDEX_DOCUMENT;

/// Percent-decode a raw request path.
///
/// `%XX` escapes become bytes; a `%` not followed by two hex digits is kept
/// as is. Returns `None` when the decoded bytes are not UTF-8, since no
/// asset name can match such a path.
pub fn decode_path(raw: &str) -> Option<String> {
  let bytes = raw.as_bytes();
  let mut decoded = Vec::with_capacity(bytes.len());
  let mut i = 0;

  while i < bytes.len() {
    if bytes[i] == b'%' && i + 2 < bytes.len() {
      if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
        decoded.push(hi << 4 | lo);
        i += 3;
        continue;
      }
    }
    decoded.push(bytes[i]);
    i += 1;
  }

  String::from_utf8(decoded).ok()
}

fn hex_value(byte: u8) -> Option<u8> {
  match byte {
    b'0'..=b'9' => Some(byte - b'0'),
    b'a'..=b'f' => Some(byte - b'a' + 10),
    b'A'..=b'F' => Some(byte - b'A' + 10),
    _ => None,
  }
}

/// Map a decoded request path to a path relative to the asset root.
///
/// One leading `/` is stripped and an empty remainder maps to
/// `index.html`. Returns `None` for anything that could name a file outside
/// the root: `..` segments, absolute paths, drive prefixes, and backslashes
/// (a separator on Windows).
pub fn request_target(request_path: &str) -> Option<PathBuf> {
  let relative = request_path.strip_prefix('/').unwrap_or(request_path);
  let relative = if relative.is_empty() { INDEX_DOCUMENT } else { relative };

  if relative.contains('\\') {
    return None;
  }

  let mut target = PathBuf::new();
  for component in Path::new(relative).components() {
    match component {
      Component::Normal(part) => target.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
    }
  }

  if target.as_os_str().is_empty() {
    target.push(INDEX_DOCUMENT);
  }
  Some(target)
}

/// Whether a resolved target is the index document itself.
pub fn is_index(target: &Path) -> bool {
  target == Path::new(INDEX_DOCUMENT)
}

/// Content type for a served file, by extension.
pub fn content_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();

  match ext.as_str() {
    "html" | "htm" => "text/html; charset=utf-8",
    "js" | "mjs" => "text/javascript; charset=utf-8",
    "css" => "text/css; charset=utf-8",
    "json" | "map" => "application/json",
    "webmanifest" => "application/manifest+json",
    "txt" => "text/plain; charset=utf-8",
    "svg" => "image/svg+xml",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "avif" => "image/avif",
    "ico" => "image/x-icon",
    "woff" => "font/woff",
    "woff2" => "font/woff2",
    "ttf" => "font/ttf",
    "otf" => "font/otf",
    "wasm" => "application/wasm",
    "pdf" => "application/pdf",
    "xml" => "application/xml",
    _ => "application/octet-stream",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_are_decoded() {
    assert_eq!(decode_path("/assets/my%20file.js").as_deref(), Some("/assets/my file.js"));
    assert_eq!(decode_path("/caf%C3%A9").as_deref(), Some("/café"));
    assert_eq!(decode_path("/..%2Fsecret.txt").as_deref(), Some("/../secret.txt"));
  }

  #[test]
  fn malformed_escapes_are_kept() {
    assert_eq!(decode_path("/100%").as_deref(), Some("/100%"));
    assert_eq!(decode_path("/a%zz").as_deref(), Some("/a%zz"));
    assert_eq!(decode_path("/a%4").as_deref(), Some("/a%4"));
  }

  #[test]
  fn invalid_utf8_is_undecodable() {
    assert_eq!(decode_path("/%FF"), None);
    assert_eq!(decode_path("/route/%C3%28"), None);
  }

  #[test]
  fn root_maps_to_index() {
    assert_eq!(request_target("/"), Some(PathBuf::from("index.html")));
    assert_eq!(request_target(""), Some(PathBuf::from("index.html")));
    assert!(is_index(&request_target("/").unwrap()));
  }

  #[test]
  fn nested_paths_are_kept() {
    assert_eq!(
      request_target("/assets/index.js"),
      Some(PathBuf::from("assets").join("index.js"))
    );
    assert_eq!(request_target("/unknown/route"), Some(PathBuf::from("unknown").join("route")));
  }

  #[test]
  fn traversal_is_rejected() {
    assert_eq!(request_target("/../secret.txt"), None);
    assert_eq!(request_target("/assets/../../secret.txt"), None);
    assert_eq!(request_target("//etc/passwd"), None);
    assert_eq!(request_target("/..\\secret.txt"), None);
  }

  #[test]
  fn current_dir_segments_are_dropped() {
    assert_eq!(request_target("/./app.js"), Some(PathBuf::from("app.js")));
    assert_eq!(request_target("/."), Some(PathBuf::from("index.html")));
  }

  #[test]
  fn index_is_detected_only_at_root() {
    assert!(is_index(Path::new("index.html")));
    assert!(!is_index(&PathBuf::from("docs").join("index.html")));
  }

  #[test]
  fn content_types_by_extension() {
    assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
    assert_eq!(content_type(Path::new("assets/app.JS")), "text/javascript; charset=utf-8");
    assert_eq!(content_type(Path::new("fonts/a.woff2")), "font/woff2");
    assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
  }
}
