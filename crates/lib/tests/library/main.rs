//! End-to-end tests for swcache-lib: build generation and the cache server.

mod build_tests;
mod common;
mod serve_tests;
