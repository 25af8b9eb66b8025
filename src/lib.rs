//! Stagegen - derives build stage options for disk images and installer media.
//!
//! The library is pure: it takes a partition table, an output format and
//! architecture parameters, and returns serializable stage options for an
//! external pipeline executor. It never touches the filesystem.
//!
//! - `disk` - read-only partition table model
//! - `arch` - closed set of architectures and their boot media table
//! - `stages` - per-stage option derivers
//! - `pipeline` - ordered stage lists per image kind
//! - `manifest` - stage lists with content ids

pub mod arch;
pub mod config;
pub mod disk;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod stages;

pub use arch::Arch;
pub use config::Config;
pub use disk::{Partition, PartitionRole, PartitionScheme, PartitionTable};
pub use error::{Result, StageError};
pub use manifest::Manifest;
pub use pipeline::{assemble, ImageKind, ImageRequest, Payload};
pub use stages::Stage;
