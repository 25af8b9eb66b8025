//! Image format conversion with qemu-img.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StageError};

/// Container formats the qemu stage can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Qcow2,
    /// Fixed geometry VHD.
    Vpc,
    /// Stream optimized VMDK.
    Vmdk,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Qcow2, ImageFormat::Vpc, ImageFormat::Vmdk];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Qcow2 => "qcow2",
            ImageFormat::Vpc => "vpc",
            ImageFormat::Vmdk => "vmdk",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self> {
        ImageFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| StageError::UnknownFormat(s.to_string()))
    }
}

/// Format specific options, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QemuFormat {
    Qcow2 {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        compat: String,
    },
    Vpc,
    Vmdk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QemuStageOptions {
    pub filename: String,
    pub format: QemuFormat,
}

/// Options for converting the raw image into `format`.
///
/// `compat` only applies to qcow2 and is ignored for the other formats.
pub fn qemu_stage_options(filename: &str, format: &str, compat: &str) -> Result<QemuStageOptions> {
    let format = match format.parse::<ImageFormat>()? {
        ImageFormat::Qcow2 => QemuFormat::Qcow2 {
            compat: compat.to_string(),
        },
        ImageFormat::Vpc => QemuFormat::Vpc,
        ImageFormat::Vmdk => QemuFormat::Vmdk,
    };

    tracing::debug!(filename, ?format, "derived qemu conversion");

    Ok(QemuStageOptions {
        filename: filename.to_string(),
        format,
    })
}
