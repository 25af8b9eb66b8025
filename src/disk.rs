//! Read-only model of an allocated partition table.
//!
//! Tables are sized and aligned by the partition allocator before they get
//! here. This module only answers questions about them: which partition is
//! the boot target, and where things are in sectors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StageError};

/// Logical sector size assumed when a table does not state one.
pub const DEFAULT_SECTOR_SIZE: u64 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionScheme {
    Gpt,
    Dos,
}

impl PartitionScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            PartitionScheme::Gpt => "gpt",
            PartitionScheme::Dos => "dos",
        }
    }
}

impl fmt::Display for PartitionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a partition is used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionRole {
    /// Holds /boot.
    Boot,
    /// Holds /.
    Root,
    #[default]
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Offset from the start of the disk, in bytes.
    pub start: u64,
    /// Length in bytes.
    pub size: u64,
    #[serde(default)]
    pub bootable: bool,
    /// Partition type GUID (gpt) or hex id (dos).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub role: PartitionRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    #[serde(rename = "type")]
    pub scheme: PartitionScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default = "default_sector_size")]
    pub sector_size: u64,
    pub partitions: Vec<Partition>,
}

fn default_sector_size() -> u64 {
    DEFAULT_SECTOR_SIZE
}

impl PartitionTable {
    /// Convert a byte offset to sectors, truncating any remainder.
    pub fn bytes_to_sectors(&self, bytes: u64) -> Result<u64> {
        self.check_sector_size()?;
        Ok(bytes / self.sector_size)
    }

    /// Convert a byte offset to sectors, refusing offsets that do not fall on
    /// a sector boundary.
    pub fn sectors_exact(&self, bytes: u64, what: impl FnOnce() -> String) -> Result<u64> {
        let sectors = self.bytes_to_sectors(bytes)?;
        if bytes % self.sector_size != 0 {
            return Err(StageError::Misaligned {
                what: what(),
                bytes,
                sector_size: self.sector_size,
            });
        }
        Ok(sectors)
    }

    /// Index of the partition bootloaders should be installed against.
    ///
    /// A partition tagged `boot` wins. Without one, the first `root`
    /// partition is used since /boot then lives on it.
    pub fn boot_partition_index(&self) -> Option<usize> {
        self.partitions
            .iter()
            .position(|p| p.role == PartitionRole::Boot)
            .or_else(|| {
                self.partitions
                    .iter()
                    .position(|p| p.role == PartitionRole::Root)
            })
    }

    pub fn boot_partition(&self) -> Option<&Partition> {
        self.boot_partition_index().map(|idx| &self.partitions[idx])
    }

    fn check_sector_size(&self) -> Result<()> {
        if self.sector_size == 0 || !self.sector_size.is_power_of_two() {
            return Err(StageError::InvalidSectorSize(self.sector_size));
        }
        Ok(())
    }
}
