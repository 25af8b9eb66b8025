//! Partition table and bootloader install stages.
//!
//! Both work in sectors. The partition table is in bytes, so every offset
//! goes through [`PartitionTable::sectors_exact`] and a misaligned table
//! fails here instead of producing a layout that silently shifts data.

use serde::{Deserialize, Serialize};

use crate::disk::PartitionTable;
use crate::error::{Result, StageError};

const ZIPL_INST_STAGE: &str = "org.osbuild.zipl.inst";

/// One partition as sfdisk sees it, in sectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfdiskPartition {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bootable: bool,
    pub start: u64,
    pub size: u64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfdiskStageOptions {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub partitions: Vec<SfdiskPartition>,
}

/// Options for writing the partition table with sfdisk.
///
/// Partition order is kept. Starts and sizes are divided by the sector size
/// and must divide evenly.
pub fn sfdisk_stage_options(pt: &PartitionTable) -> Result<SfdiskStageOptions> {
    let partitions = pt
        .partitions
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            Ok(SfdiskPartition {
                bootable: p.bootable,
                start: pt.sectors_exact(p.start, || format!("partition {} start", idx + 1))?,
                size: pt.sectors_exact(p.size, || format!("partition {} size", idx + 1))?,
                part_type: p.part_type.clone(),
                uuid: p.uuid.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        label = %pt.scheme,
        partitions = partitions.len(),
        "derived sfdisk layout"
    );

    Ok(SfdiskStageOptions {
        label: pt.scheme.to_string(),
        uuid: pt.uuid.clone(),
        partitions,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiplInstStageOptions {
    pub kernel: String,
    /// Start sector of the partition holding /boot.
    pub location: u64,
}

/// Options for installing zipl against the boot partition.
pub fn zipl_inst_stage_options(kernel: &str, pt: &PartitionTable) -> Result<ZiplInstStageOptions> {
    let idx = pt
        .boot_partition_index()
        .ok_or(StageError::BootPartitionMissing {
            stage: ZIPL_INST_STAGE,
        })?;
    let location = pt.sectors_exact(pt.partitions[idx].start, || {
        format!("boot partition {} start", idx + 1)
    })?;

    tracing::debug!(kernel, partition = idx + 1, location, "derived zipl location");

    Ok(ZiplInstStageOptions {
        kernel: kernel.to_string(),
        location,
    })
}
