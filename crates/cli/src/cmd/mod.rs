mod build;
mod manifest;
mod serve;

pub use build::cmd_build;
pub use manifest::cmd_manifest;
pub use serve::cmd_serve;
