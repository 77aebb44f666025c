//! Fixed names shared by the build and serve halves.

/// Environment variable that points at the configuration file.
pub const CONFIG_ENV_VAR: &str = "SWCACHE_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "swcache.json";

/// Entry document of the asset tree, also the SPA fallback target.
pub const INDEX_DOCUMENT: &str = "index.html";

/// File name of the generated service worker.
pub const WORKER_SCRIPT: &str = "sw.js";

/// Web-root path of the generated service worker, always first in the cache list.
pub const WORKER_WEB_PATH: &str = "/sw.js";

/// File name of the bootstrap script that registers the worker.
pub const BOOTSTRAP_SCRIPT: &str = "service-worker.js";

/// Name of the cache-list array declared in the worker template.
pub const CACHE_LIST_NAME: &str = "cacheData";

/// One year, public.
pub const CACHE_CONTROL: &str = "public, max-age=31536000";

pub const NOT_FOUND_BODY: &str = r#"<h1 style="text-align: center">Not Found</h1>"#;

/// Chunk size used when streaming files through the hasher.
pub const HASH_CHUNK_SIZE: usize = 8192;
