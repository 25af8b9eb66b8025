//! Anaconda installer tree stages.

use serde::{Deserialize, Serialize};

use crate::arch::Arch;
use crate::stages::iso::Product;

/// Where the kickstart file lives inside the installer tree.
pub const KICKSTART_PATH: &str = "/osbuild.ks";

/// dracut modules for the installer initramfs, before per-arch additions.
const INSTALLER_DRACUT_MODULES: &[&str] = &[
    "bash",
    "systemd",
    "fips",
    "systemd-initrd",
    "modsign",
    "nss-softokn",
    "rdma",
    "rngd",
    "i18n",
    "convertfs",
    "network-manager",
    "network",
    "ifcfg",
    "url-lib",
    "drm",
    "plymouth",
    "prefixdevname",
    "prefixdevname-tools",
    "crypt",
    "dm",
    "dmsquash-live",
    "kernel-modules",
    "kernel-modules-extra",
    "kernel-network-modules",
    "livenet",
    "lvm",
    "mdraid",
    "multipath",
    "qemu",
    "qemu-net",
    "fcoe",
    "fcoe-uefi",
    "iscsi",
    "lunmask",
    "nfs",
    "resume",
    "rootfs-block",
    "terminfo",
    "udev-rules",
    "dracut-systemd",
    "pollcdrom",
    "usrmount",
    "base",
    "fs-lib",
    "img-lib",
    "shutdown",
    "uefi-lib",
];

const ANACONDA_KICKSTART_MODULES: &[&str] = &[
    "org.fedoraproject.Anaconda.Modules.Network",
    "org.fedoraproject.Anaconda.Modules.Payloads",
    "org.fedoraproject.Anaconda.Modules.Storage",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildstampStageOptions {
    pub arch: String,
    pub product: String,
    pub version: String,
    pub variant: String,
    #[serde(rename = "final")]
    pub is_final: bool,
}

pub fn buildstamp_stage_options(arch: Arch, product: &Product) -> BuildstampStageOptions {
    BuildstampStageOptions {
        arch: arch.to_string(),
        product: product.name.clone(),
        version: product.version.clone(),
        variant: "edge".to_string(),
        is_final: true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnacondaStageOptions {
    #[serde(rename = "kickstart-modules")]
    pub kickstart_modules: Vec<String>,
}

pub fn anaconda_stage_options() -> AnacondaStageOptions {
    AnacondaStageOptions {
        kickstart_modules: ANACONDA_KICKSTART_MODULES
            .iter()
            .map(|m| m.to_string())
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoraxScriptStageOptions {
    pub path: String,
    pub basearch: String,
}

pub fn lorax_script_stage_options(arch: Arch) -> LoraxScriptStageOptions {
    LoraxScriptStageOptions {
        path: "99-generic/runtime-postinstall.tmpl".to_string(),
        basearch: arch.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DracutStageOptions {
    pub kernel: Vec<String>,
    pub modules: Vec<String>,
    pub install: Vec<String>,
}

/// Options for the installer initramfs.
///
/// `biosdevname` is only added on x86_64. `extra_modules` come last.
pub fn dracut_stage_options(
    kernel_ver: &str,
    arch: Arch,
    extra_modules: &[String],
) -> DracutStageOptions {
    let mut modules: Vec<String> = INSTALLER_DRACUT_MODULES
        .iter()
        .map(|m| m.to_string())
        .collect();
    if arch == Arch::X86_64 {
        modules.push("biosdevname".to_string());
    }
    modules.extend(extra_modules.iter().cloned());

    DracutStageOptions {
        kernel: vec![kernel_ver.to_string()],
        modules,
        install: vec!["/.buildstamp".to_string()],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveImg {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OstreeKickstart {
    pub osname: String,
    pub url: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub gpg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickstartStageOptions {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveimg: Option<LiveImg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ostree: Option<OstreeKickstart>,
}

/// Kickstart that installs from a tarball.
pub fn tar_kickstart_stage_options(tar_url: &str) -> KickstartStageOptions {
    KickstartStageOptions {
        path: KICKSTART_PATH.to_string(),
        liveimg: Some(LiveImg {
            url: tar_url.to_string(),
        }),
        ostree: None,
    }
}

/// Kickstart that deploys an ostree commit.
pub fn ostree_kickstart_stage_options(ostree_url: &str, ostree_ref: &str) -> KickstartStageOptions {
    KickstartStageOptions {
        path: KICKSTART_PATH.to_string(),
        liveimg: None,
        ostree: Some(OstreeKickstart {
            osname: "rhel".to_string(),
            url: ostree_url.to_string(),
            reference: ostree_ref.to_string(),
            gpg: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dracut_biosdevname_only_on_x86() {
        let x86 = dracut_stage_options("4.18.0", Arch::X86_64, &[]);
        assert_eq!(x86.modules.last().map(String::as_str), Some("biosdevname"));

        let arm = dracut_stage_options("4.18.0", Arch::Aarch64, &[]);
        assert!(!arm.modules.iter().any(|m| m == "biosdevname"));
        assert_eq!(arm.modules.len(), INSTALLER_DRACUT_MODULES.len());
        assert_eq!(arm.kernel, vec!["4.18.0"]);
        assert_eq!(arm.install, vec!["/.buildstamp"]);
    }

    #[test]
    fn test_dracut_extra_modules_appended() {
        let extra = vec!["ifcfg".to_string(), "ostree".to_string()];
        let options = dracut_stage_options("4.18.0", Arch::X86_64, &extra);
        let n = options.modules.len();
        assert_eq!(&options.modules[n - 3..], &["biosdevname", "ifcfg", "ostree"]);
    }

    #[test]
    fn test_kickstart_variants() {
        let tar = tar_kickstart_stage_options("file:///liveimg.tar.gz");
        assert_eq!(tar.path, "/osbuild.ks");
        assert!(tar.ostree.is_none());

        let ostree = ostree_kickstart_stage_options("file:///ostree/repo", "rhel/8/x86_64/edge");
        let json = serde_json::to_value(&ostree).unwrap();
        assert_eq!(json["ostree"]["ref"], "rhel/8/x86_64/edge");
        assert_eq!(json["ostree"]["gpg"], false);
        assert!(json.get("liveimg").is_none());
    }

    #[test]
    fn test_buildstamp() {
        let product = Product {
            name: "Red Hat Enterprise Linux".to_string(),
            version: "8.5".to_string(),
            label_prefix: String::new(),
        };
        let json = serde_json::to_value(buildstamp_stage_options(Arch::X86_64, &product)).unwrap();
        assert_eq!(json["final"], true);
        assert_eq!(json["variant"], "edge");
        assert_eq!(json["version"], "8.5");
    }

    #[test]
    fn test_anaconda_modules() {
        let options = anaconda_stage_options();
        assert_eq!(options.kickstart_modules.len(), 3);
        let json = serde_json::to_value(&options).unwrap();
        assert!(json["kickstart-modules"].is_array());
    }
}
