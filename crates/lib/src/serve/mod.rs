//! Static asset server with ETag validation and SPA fallback.
//!
//! Every `GET` resolves to one of:
//! - the requested file (200, or 304 when `If-None-Match` matches)
//! - `index.html` when no file matches, so client-side routing can take over
//! - 404 when `index.html` itself is missing
//! - 500 when the file cannot be read
//!
//! Paths whose percent-decoding is not UTF-8 cannot name an asset and take
//! the `index.html` fallback.
//!
//! The `ETag` is the SHA-256 of the file's bytes, recomputed per request, so
//! a rebuilt asset is revalidated immediately even under the one-year
//! `Cache-Control`. Requests share no mutable state; the asset root is
//! read-only from the server's perspective.

pub mod resolve;

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
  Router,
  extract::State,
  http::{HeaderMap, StatusCode, Uri, header},
  response::{Html, IntoResponse, Response},
  routing::get,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::consts::{CACHE_CONTROL, INDEX_DOCUMENT, NOT_FOUND_BODY};
use crate::util::hash::read_hashed;

use resolve::{content_type, decode_path, is_index, request_target};

#[derive(Debug, Error)]
pub enum ServeError {
  #[error("failed to bind {addr}: {source}")]
  Bind { addr: SocketAddr, source: std::io::Error },

  #[error("server error: {0}")]
  Io(#[from] std::io::Error),
}

/// Shared, immutable per-server state.
#[derive(Debug, Clone)]
struct AssetRoot(Arc<PathBuf>);

/// Build the router serving `asset_root`.
pub fn router(asset_root: PathBuf) -> Router {
  Router::new()
    .route("/", get(serve_request))
    .route("/{*path}", get(serve_request))
    .with_state(AssetRoot(Arc::new(asset_root)))
}

/// A running server bound to a local address.
pub struct CacheServer {
  addr: SocketAddr,
  shutdown_tx: Option<oneshot::Sender<()>>,
  task: JoinHandle<()>,
}

impl CacheServer {
  /// Bind `addr` and serve `asset_root` in the background.
  ///
  /// Pass port 0 to let the OS pick a free port; [`CacheServer::addr`]
  /// reports the bound address.
  pub async fn start(addr: SocketAddr, asset_root: PathBuf) -> Result<Self, ServeError> {
    let listener = bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = router(prepare_root(asset_root));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
      let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
          let _ = shutdown_rx.await;
        })
        .await;
      if let Err(e) = result {
        error!(error = %e, "server stopped with error");
      }
    });

    info!(addr = %addr, "cache server listening");

    Ok(Self {
      addr,
      shutdown_tx: Some(shutdown_tx),
      task,
    })
  }

  /// The address the server is listening on.
  pub fn addr(&self) -> SocketAddr {
    self.addr
  }

  /// Build a URL for a request path on this server.
  pub fn url(&self, path: &str) -> String {
    format!("http://{}{}", self.addr, path)
  }

  /// Stop accepting connections and wait for in-flight requests to finish.
  pub async fn shutdown(mut self) {
    if let Some(tx) = self.shutdown_tx.take() {
      let _ = tx.send(());
    }
    let _ = self.task.await;
  }
}

/// Serve `asset_root` on `addr` until `shutdown` resolves.
pub async fn serve_until<F>(addr: SocketAddr, asset_root: PathBuf, shutdown: F) -> Result<(), ServeError>
where
  F: Future<Output = ()> + Send + 'static,
{
  let listener = bind(addr).await?;
  let bound = listener.local_addr()?;
  let app = router(prepare_root(asset_root));

  info!(addr = %bound, "cache server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
  info!("cache server stopped");

  Ok(())
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, ServeError> {
  TcpListener::bind(addr)
    .await
    .map_err(|source| ServeError::Bind { addr, source })
}

fn prepare_root(asset_root: PathBuf) -> PathBuf {
  if !asset_root.is_dir() {
    warn!(root = %asset_root.display(), "asset root does not exist yet, requests will 404");
    return asset_root;
  }
  dunce::canonicalize(&asset_root).unwrap_or(asset_root)
}

/// `GET /` and `GET /{*path}`: any asset, falling back to the index document.
///
/// The raw URI path is decoded here rather than by a path extractor, so
/// paths that do not decode to UTF-8 still get a regular response.
async fn serve_request(State(root): State<AssetRoot>, uri: Uri, headers: HeaderMap) -> Response {
  respond(&root.0, uri.path(), &headers).await
}

async fn respond(asset_root: &Path, request_path: &str, headers: &HeaderMap) -> Response {
  // `None` when the path cannot name any asset and goes straight to fallback.
  let target = match decode_path(request_path) {
    Some(decoded) => match request_target(&decoded) {
      Some(target) => Some(target),
      None => {
        warn!(path = %request_path, "rejected path outside asset root");
        return not_found();
      }
    },
    None => {
      debug!(path = %request_path, "path is not valid UTF-8 after decoding");
      None
    }
  };

  let mut asset = None;
  if let Some(target) = &target {
    let candidate = asset_root.join(target);
    if is_file(&candidate).await {
      asset = Some(candidate);
    } else if is_index(target) {
      debug!(path = %request_path, "index document missing");
      return not_found();
    }
  }

  let file = match asset {
    Some(file) => file,
    None => {
      let index = asset_root.join(INDEX_DOCUMENT);
      if !is_file(&index).await {
        debug!(path = %request_path, "no asset and no index document");
        return not_found();
      }
      debug!(path = %request_path, "falling back to index document");
      index
    }
  };

  let contents = match read_hashed(&file).await {
    Ok(contents) => contents,
    Err(e) => {
      error!(error = %e, "failed to read asset");
      return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
  };
  let etag = contents.hash;

  let cache_headers = [
    (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
    (header::ETAG, etag.to_string()),
  ];

  let if_none_match = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok());
  if if_none_match == Some(etag.as_str()) {
    debug!(path = %request_path, etag = %etag, "not modified");
    return (StatusCode::NOT_MODIFIED, cache_headers).into_response();
  }

  debug!(path = %request_path, file = %file.display(), bytes = contents.bytes.len(), "serving asset");
  (
    StatusCode::OK,
    cache_headers,
    [(header::CONTENT_TYPE, content_type(&file))],
    contents.bytes,
  )
    .into_response()
}

async fn is_file(path: &Path) -> bool {
  tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

fn not_found() -> Response {
  (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
}
