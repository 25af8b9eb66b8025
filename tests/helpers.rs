//! Shared test utilities for stagegen tests.

#![allow(dead_code)]

use stagegen::{Partition, PartitionRole, PartitionScheme, PartitionTable};

pub const MIB: u64 = 1024 * 1024;

/// Build a partition with the given byte geometry.
pub fn partition(start: u64, size: u64, role: PartitionRole) -> Partition {
    Partition {
        start,
        size,
        bootable: role == PartitionRole::Boot,
        part_type: Some("0FC63DAF-8483-4772-8E79-3D69D8477DE4".to_string()),
        uuid: None,
        role,
    }
}

/// GPT table with 512 byte sectors.
pub fn gpt_table(partitions: Vec<Partition>) -> PartitionTable {
    PartitionTable {
        scheme: PartitionScheme::Gpt,
        uuid: Some("D209C89E-EA5E-4FBD-B161-B461CCE297E0".to_string()),
        sector_size: 512,
        partitions,
    }
}

/// Typical x86_64 guest layout: BIOS boot, ESP, /boot, root.
pub fn guest_table() -> PartitionTable {
    gpt_table(vec![
        partition(MIB, MIB, PartitionRole::Data),
        partition(2 * MIB, 100 * MIB, PartitionRole::Data),
        partition(102 * MIB, 500 * MIB, PartitionRole::Boot),
        partition(602 * MIB, 4096 * MIB, PartitionRole::Root),
    ])
}

/// JSON for a disk image request around `table`.
pub fn disk_request_json(arch: &str, format: Option<&str>, table: &PartitionTable) -> String {
    let mut kind = serde_json::json!({ "partition_table": table });
    if let Some(format) = format {
        kind["format"] = serde_json::json!(format);
    }
    serde_json::json!({
        "name": format!("{}-disk", arch),
        "arch": arch,
        "kernel": "4.18.0-348.el8",
        "filename": "disk.img",
        "kind": { "disk": kind }
    })
    .to_string()
}

/// JSON for an installer ISO request.
pub fn installer_request_json(arch: &str) -> String {
    serde_json::json!({
        "name": format!("{}-installer", arch),
        "arch": arch,
        "kernel": "4.18.0-348.el8",
        "filename": "installer.iso",
        "kind": { "installer": { "payload": { "tar": { "url": "file:///liveimg.tar.gz" } } } }
    })
    .to_string()
}
