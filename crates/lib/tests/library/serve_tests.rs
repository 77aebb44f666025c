//! Cache server behaviour over real HTTP.

use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH};

use swcache_lib::util::hash::hash_bytes;

use super::common::{INDEX_HTML, TestSite};

fn etag_of(response: &reqwest::Response) -> String {
  response.headers()[ETAG].to_str().unwrap().to_string()
}

#[tokio::test]
async fn spa_fallback_and_revalidation_sequence() {
  let site = TestSite::new();
  site.write_asset("app.js", "console.log('app');");
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  let response = client.get(server.url("/unknown/route")).send().await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(etag_of(&response), hash_bytes(INDEX_HTML.as_bytes()).0);
  assert_eq!(response.text().await.unwrap(), INDEX_HTML);

  let response = client.get(server.url("/app.js")).send().await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let etag = etag_of(&response);
  assert_eq!(response.text().await.unwrap(), "console.log('app');");

  let response = client
    .get(server.url("/app.js"))
    .header(IF_NONE_MATCH, &etag)
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
  assert_eq!(etag_of(&response), etag);
  assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=31536000");
  assert!(response.bytes().await.unwrap().is_empty());

  server.shutdown().await;
}

#[tokio::test]
async fn etag_tracks_content_changes() {
  let site = TestSite::new();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  let first = etag_of(&client.get(server.url("/assets/main.css")).send().await.unwrap());
  let again = etag_of(&client.get(server.url("/assets/main.css")).send().await.unwrap());
  assert_eq!(first, again);

  site.write_asset("assets/main.css", "body { margin: 1 }");

  let response = client
    .get(server.url("/assets/main.css"))
    .header(IF_NONE_MATCH, &first)
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_ne!(etag_of(&response), first);
  assert_eq!(response.text().await.unwrap(), "body { margin: 1 }");

  server.shutdown().await;
}

#[tokio::test]
async fn missing_index_is_not_found() {
  let site = TestSite::new();
  std::fs::remove_file(site.asset_root().join("index.html")).unwrap();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  for path in ["/", "/index.html", "/some/route"] {
    let response = client.get(server.url(path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {}", path);
    assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert_eq!(
      response.text().await.unwrap(),
      r#"<h1 style="text-align: center">Not Found</h1>"#
    );
  }

  // Existing assets are still served.
  let response = client.get(server.url("/assets/main.js")).send().await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  server.shutdown().await;
}

#[tokio::test]
async fn encoded_traversal_is_rejected() {
  let site = TestSite::new();
  std::fs::write(site.temp.path().join("secret.txt"), "top secret").unwrap();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  let response = client.get(server.url("/..%2Fsecret.txt")).send().await.unwrap();

  assert_eq!(response.status(), StatusCode::NOT_FOUND);
  assert!(!response.text().await.unwrap().contains("top secret"));

  server.shutdown().await;
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
  let site = TestSite::new();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  let mut handles = Vec::new();
  for i in 0..32 {
    let client = client.clone();
    let url = if i % 2 == 0 {
      server.url("/assets/main.js")
    } else {
      server.url(&format!("/route/{}", i))
    };
    handles.push(tokio::spawn(async move {
      let response = client.get(url).send().await.unwrap();
      (response.status(), response.text().await.unwrap())
    }));
  }

  for (i, handle) in handles.into_iter().enumerate() {
    let (status, body) = handle.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    if i % 2 == 0 {
      assert_eq!(body, "import './chunk.js';");
    } else {
      assert_eq!(body, INDEX_HTML);
    }
  }

  server.shutdown().await;
}

#[tokio::test]
async fn undecodable_path_gets_index_over_http() {
  let site = TestSite::new();
  let server = site.start_server().await;
  let client = reqwest::Client::new();

  for path in ["/%FF", "/route/%C3%28"] {
    let response = client.get(server.url(path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "path {}", path);
    assert_eq!(response.text().await.unwrap(), INDEX_HTML);
  }

  server.shutdown().await;
}
