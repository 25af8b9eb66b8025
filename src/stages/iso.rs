//! Bootable ISO composition.
//!
//! The volume label ends up in three places: the ISO volume id, the kernel
//! command line and the xorrisofs volid. The installer finds its kickstart
//! through `inst.ks=hd:LABEL=<label>:<path>`, so all three come from
//! [`Product::iso_label`] and the kickstart path is shared with the
//! kickstart stage.

use serde::{Deserialize, Serialize};

use crate::arch::Arch;
use crate::error::{Result, StageError};
use crate::stages::installer::KICKSTART_PATH;

const BOOT_ISO_MONO_STAGE: &str = "org.osbuild.bootiso.mono";

/// Rootfs image size in MiB.
pub const ROOTFS_SIZE: u64 = 9216;
pub const ROOTFS_COMPRESSION: &str = "xz";
pub const EFI_VENDOR: &str = "redhat";
pub const LORAX_TEMPLATES: &str = "80-rhel";
pub const EFIBOOT_IMAGE: &str = "images/efiboot.img";
pub const ISOLINUX_IMAGE: &str = "isolinux/isolinux.bin";
pub const ISOLINUX_CATALOG: &str = "isolinux/boot.cat";
pub const ISOHYBRID_MBR: &str = "/usr/share/syslinux/isohdpfx.bin";

/// Product identity stamped onto installer media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub version: String,
    /// Volume label prefix, completed with the architecture.
    #[serde(skip)]
    pub label_prefix: String,
}

impl Product {
    pub fn iso_label(&self, arch: Arch) -> String {
        format!("{}-{}", self.label_prefix, arch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Efi {
    pub architectures: Vec<String>,
    pub vendor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Isolinux {
    pub enabled: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsCompressionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcj: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsCompression {
    pub method: String,
    pub options: FsCompressionOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFs {
    pub size: u64,
    pub compression: FsCompression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootIsoMonoStageOptions {
    pub product: Product,
    pub isolabel: String,
    pub kernel: String,
    pub kernel_opts: String,
    pub efi: Efi,
    pub isolinux: Isolinux,
    pub templates: String,
    pub rootfs: RootFs,
}

/// Kernel command line pointing anaconda at the kickstart on the ISO.
pub fn installer_kernel_opts(isolabel: &str) -> String {
    format!("inst.ks=hd:LABEL={}:{}", isolabel, KICKSTART_PATH)
}

/// Options for composing the bootable installer tree.
///
/// Fails for architectures without an entry in [`crate::arch::BOOT_MEDIA`].
pub fn boot_iso_mono_stage_options(
    kernel_ver: &str,
    arch: Arch,
    product: &Product,
) -> Result<BootIsoMonoStageOptions> {
    let media = arch.boot_media().ok_or_else(|| StageError::UnsupportedArch {
        arch: arch.to_string(),
        stage: BOOT_ISO_MONO_STAGE,
    })?;
    let isolabel = product.iso_label(arch);

    tracing::debug!(%arch, %isolabel, legacy_boot = media.legacy_boot, "derived boot media");

    Ok(BootIsoMonoStageOptions {
        product: product.clone(),
        kernel: kernel_ver.to_string(),
        kernel_opts: installer_kernel_opts(&isolabel),
        isolabel,
        efi: Efi {
            architectures: media
                .efi_architectures
                .iter()
                .map(|a| a.to_string())
                .collect(),
            vendor: EFI_VENDOR.to_string(),
        },
        isolinux: Isolinux {
            enabled: media.legacy_boot,
            debug: false,
        },
        templates: LORAX_TEMPLATES.to_string(),
        rootfs: RootFs {
            size: ROOTFS_SIZE,
            compression: FsCompression {
                method: ROOTFS_COMPRESSION.to_string(),
                options: FsCompressionOptions {
                    bcj: media.bcj_filter.map(str::to_string),
                },
            },
        },
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscinfoStageOptions {
    pub basearch: String,
    pub release: String,
}

pub fn discinfo_stage_options(arch: Arch, release: &str) -> DiscinfoStageOptions {
    DiscinfoStageOptions {
        basearch: arch.to_string(),
        release: release.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorrisofsBoot {
    pub image: String,
    pub catalog: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorrisofsStageOptions {
    pub filename: String,
    pub volid: String,
    pub sysid: String,
    pub efi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<XorrisofsBoot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isohybridmbr: Option<String>,
}

/// Options for writing the final ISO. BIOS boot records are only added when
/// `isolinux` is set.
pub fn xorrisofs_stage_options(
    filename: &str,
    arch: Arch,
    product: &Product,
    isolinux: bool,
) -> XorrisofsStageOptions {
    let (boot, isohybridmbr) = if isolinux {
        (
            Some(XorrisofsBoot {
                image: ISOLINUX_IMAGE.to_string(),
                catalog: ISOLINUX_CATALOG.to_string(),
            }),
            Some(ISOHYBRID_MBR.to_string()),
        )
    } else {
        (None, None)
    };

    XorrisofsStageOptions {
        filename: filename.to_string(),
        volid: product.iso_label(arch),
        sysid: "LINUX".to_string(),
        efi: EFIBOOT_IMAGE.to_string(),
        boot,
        isohybridmbr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "Red Hat Enterprise Linux".to_string(),
            version: "8.5".to_string(),
            label_prefix: "RHEL-8-5-0-BaseOS".to_string(),
        }
    }

    #[test]
    fn test_x86_boot_media() {
        let options = boot_iso_mono_stage_options("4.18.0", Arch::X86_64, &product()).unwrap();
        assert_eq!(options.efi.architectures, vec!["IA32", "X64"]);
        assert!(options.isolinux.enabled);
        assert_eq!(options.rootfs.compression.options.bcj.as_deref(), Some("x86"));
        assert_eq!(options.isolabel, "RHEL-8-5-0-BaseOS-x86_64");
    }

    #[test]
    fn test_aarch64_boot_media() {
        let options = boot_iso_mono_stage_options("4.18.0", Arch::Aarch64, &product()).unwrap();
        assert_eq!(options.efi.architectures, vec!["AA64"]);
        assert!(!options.isolinux.enabled);
        assert_eq!(options.efi.vendor, "redhat");
    }

    #[test]
    fn test_kernel_opts_point_at_kickstart() {
        let options = boot_iso_mono_stage_options("4.18.0", Arch::Aarch64, &product()).unwrap();
        assert_eq!(
            options.kernel_opts,
            "inst.ks=hd:LABEL=RHEL-8-5-0-BaseOS-aarch64:/osbuild.ks"
        );
    }

    #[test]
    fn test_no_boot_media_for_s390x() {
        let err = boot_iso_mono_stage_options("4.18.0", Arch::S390x, &product()).unwrap_err();
        assert_eq!(
            err,
            StageError::UnsupportedArch {
                arch: "s390x".to_string(),
                stage: "org.osbuild.bootiso.mono"
            }
        );
    }

    #[test]
    fn test_missing_bcj_filter_is_omitted() {
        let compression = FsCompression {
            method: "xz".to_string(),
            options: FsCompressionOptions::default(),
        };
        assert_eq!(
            serde_json::to_value(&compression).unwrap(),
            serde_json::json!({"method": "xz", "options": {}})
        );

        let parsed: FsCompressionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.bcj, None);
    }

    #[test]
    fn test_product_serializes_without_prefix() {
        let json = serde_json::to_value(product()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Red Hat Enterprise Linux", "version": "8.5"})
        );
    }

    #[test]
    fn test_xorrisofs_isolinux_fields() {
        let bios = xorrisofs_stage_options("installer.iso", Arch::X86_64, &product(), true);
        assert_eq!(bios.volid, "RHEL-8-5-0-BaseOS-x86_64");
        assert_eq!(bios.boot.unwrap().image, "isolinux/isolinux.bin");
        assert_eq!(bios.isohybridmbr.as_deref(), Some(ISOHYBRID_MBR));

        let efi_only = xorrisofs_stage_options("installer.iso", Arch::Aarch64, &product(), false);
        assert!(efi_only.boot.is_none());
        let json = serde_json::to_value(&efi_only).unwrap();
        assert!(json.get("isohybridmbr").is_none());
        assert_eq!(json["efi"], "images/efiboot.img");
    }

    #[test]
    fn test_discinfo() {
        let options = discinfo_stage_options(Arch::Aarch64, "202010217.n.0");
        assert_eq!(options.basearch, "aarch64");
        assert_eq!(options.release, "202010217.n.0");
    }
}
