//! swcache-lib: Offline caching for single-page application builds
//!
//! This crate provides the two halves of the asset caching subsystem:
//! - `build`: runs the UI build, then generates the service worker and
//!   instruments the entry HTML
//! - `serve`: serves the built assets with ETag validation and SPA fallback
//!
//! The build-time pieces (`manifest`, `worker`, `html`) are usable on their
//! own against any asset directory.

pub mod build;
pub mod config;
pub mod consts;
pub mod html;
pub mod manifest;
pub mod serve;
pub mod util;
pub mod worker;
