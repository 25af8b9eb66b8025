//! CPU architectures and the per-architecture boot media table.
//!
//! The set of architectures is closed. Anything that branches on the
//! architecture reads it from [`BOOT_MEDIA`] rather than comparing strings,
//! so adding an architecture is one table edit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
    X86_64,
    Aarch64,
    Ppc64le,
    S390x,
}

impl Arch {
    pub const ALL: [Arch; 4] = [Arch::X86_64, Arch::Aarch64, Arch::Ppc64le, Arch::S390x];

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Ppc64le => "ppc64le",
            Arch::S390x => "s390x",
        }
    }

    /// Boot media parameters, or `None` when no bootable ISO can be made.
    pub fn boot_media(self) -> Option<&'static BootMedia> {
        BOOT_MEDIA
            .iter()
            .find(|(arch, _)| *arch == self)
            .map(|(_, media)| media)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| StageError::UnknownArch(s.to_string()))
    }
}

impl TryFrom<String> for Arch {
    type Error = StageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.as_str().to_string()
    }
}

/// How bootable media is composed for one architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootMedia {
    /// UEFI architecture names shipped on the image.
    pub efi_architectures: &'static [&'static str],
    /// Whether isolinux (BIOS) boot is set up.
    pub legacy_boot: bool,
    /// Branch/call/jump filter xz runs over the root filesystem image.
    pub bcj_filter: Option<&'static str>,
}

pub const BOOT_MEDIA: &[(Arch, BootMedia)] = &[
    (
        Arch::X86_64,
        BootMedia {
            efi_architectures: &["IA32", "X64"],
            legacy_boot: true,
            bcj_filter: Some("x86"),
        },
    ),
    (
        Arch::Aarch64,
        BootMedia {
            efi_architectures: &["AA64"],
            legacy_boot: false,
            bcj_filter: Some("arm"),
        },
    ),
];
