//! Generation over a realistic asset tree, then serving the result.

use reqwest::StatusCode;

use swcache_lib::build::{BuildError, build, generate};
use swcache_lib::manifest::generate_manifest;

use super::common::TestSite;

#[test]
fn generated_worker_embeds_sorted_manifest() {
  let site = TestSite::new();

  let result = generate(&site.build_options()).unwrap();

  let worker = site.read_asset("sw.js");
  assert_eq!(worker.matches("const cacheData = [").count(), 1);
  assert!(worker.contains(
    "const cacheData = [\n  \"/sw.js\",\n  \"/assets/chunk.js\",\n  \"/assets/main.css\",\n  \"/assets/main.js\",\n  \"/index.html\",\n  \"/service-worker.js\"\n];"
  ));
  assert_eq!(result.manifest.len(), 5);

  let html = site.read_asset("index.html");
  assert!(html.contains("<title>Shop</title>\n    <script src=\"/service-worker.js\" defer></script>"));
  assert!(html.contains(r#"<script type="module" src="/assets/main.js" defer></script>"#));
  assert!(html.contains(r#"<link media="print" onload="this.media='all'" rel="stylesheet" href="/assets/main.css">"#));
}

#[test]
fn manifest_is_stable_after_generation() {
  let site = TestSite::new();
  generate(&site.build_options()).unwrap();

  let first = generate_manifest(&site.asset_root()).unwrap();
  let second = generate_manifest(&site.asset_root()).unwrap();

  assert_eq!(first, second);
  assert!(!first.contains("/sw.js"));
}

#[test]
fn rerun_without_rebuild_is_refused() {
  let site = TestSite::new();
  generate(&site.build_options()).unwrap();

  let err = generate(&site.build_options()).unwrap_err();

  assert!(matches!(err, BuildError::AlreadyInstrumented { .. }));
  assert_eq!(site.read_asset("index.html").matches("/service-worker.js").count(), 1);
}

#[tokio::test]
async fn build_output_is_servable() {
  let site = TestSite::new();
  build(&site.build_options()).await.unwrap();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  let response = client.get(server.url("/sw.js")).send().await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert!(response.text().await.unwrap().contains("\"/assets/main.js\""));

  let response = client.get(server.url("/service-worker.js")).send().await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert!(response.text().await.unwrap().contains("/sw.js"));

  server.shutdown().await;
}
