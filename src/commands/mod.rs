//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `manifest` - Derive the manifest for one image request
//! - `batch` - Derive manifests for a directory of requests
//! - `show` - Display configuration and supported values

pub mod batch;
pub mod manifest;
pub mod show;

pub use batch::cmd_batch;
pub use manifest::cmd_manifest;
pub use show::cmd_show;
