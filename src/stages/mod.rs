//! Stage options handed to the pipeline executor.
//!
//! Each submodule derives the options for a family of stages:
//! - `disk` - partition table layout and zipl bootloader install
//! - `qemu` - image format conversion
//! - `iso` - bootable ISO composition (bootiso.mono, discinfo, xorrisofs)
//! - `installer` - anaconda installer tree (buildstamp, dracut, kickstart, ...)
//! - `tree` - small filesystem tree tweaks (selinux, chmod, mkdir, ...)
//!
//! Derivers are pure: no I/O, no clocks, no counters. Calling one twice with
//! the same input gives identical options.

pub mod disk;
pub mod installer;
pub mod iso;
pub mod qemu;
pub mod tree;

pub use disk::{sfdisk_stage_options, zipl_inst_stage_options};
pub use iso::{boot_iso_mono_stage_options, discinfo_stage_options, xorrisofs_stage_options};
pub use qemu::{qemu_stage_options, ImageFormat};

use serde::{Deserialize, Serialize};

/// One unit of work for the executor, serialized as `{"type", "options"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options")]
pub enum Stage {
    #[serde(rename = "org.osbuild.sfdisk")]
    Sfdisk(disk::SfdiskStageOptions),
    #[serde(rename = "org.osbuild.zipl.inst")]
    ZiplInst(disk::ZiplInstStageOptions),
    #[serde(rename = "org.osbuild.qemu")]
    Qemu(qemu::QemuStageOptions),
    #[serde(rename = "org.osbuild.bootiso.mono")]
    BootIsoMono(iso::BootIsoMonoStageOptions),
    #[serde(rename = "org.osbuild.discinfo")]
    Discinfo(iso::DiscinfoStageOptions),
    #[serde(rename = "org.osbuild.xorrisofs")]
    Xorrisofs(iso::XorrisofsStageOptions),
    #[serde(rename = "org.osbuild.buildstamp")]
    Buildstamp(installer::BuildstampStageOptions),
    #[serde(rename = "org.osbuild.anaconda")]
    Anaconda(installer::AnacondaStageOptions),
    #[serde(rename = "org.osbuild.lorax-script")]
    LoraxScript(installer::LoraxScriptStageOptions),
    #[serde(rename = "org.osbuild.dracut")]
    Dracut(installer::DracutStageOptions),
    #[serde(rename = "org.osbuild.kickstart")]
    Kickstart(installer::KickstartStageOptions),
    #[serde(rename = "org.osbuild.selinux")]
    Selinux(tree::SelinuxStageOptions),
    #[serde(rename = "org.osbuild.chmod")]
    Chmod(tree::ChmodStageOptions),
    #[serde(rename = "org.osbuild.mkdir")]
    Mkdir(tree::MkdirStageOptions),
    #[serde(rename = "org.osbuild.ostree.config")]
    OstreeConfig(tree::OstreeConfigStageOptions),
    #[serde(rename = "org.osbuild.nginx.conf")]
    NginxConfig(tree::NginxConfigStageOptions),
}

impl Stage {
    /// Stage name as the executor knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Sfdisk(_) => "org.osbuild.sfdisk",
            Stage::ZiplInst(_) => "org.osbuild.zipl.inst",
            Stage::Qemu(_) => "org.osbuild.qemu",
            Stage::BootIsoMono(_) => "org.osbuild.bootiso.mono",
            Stage::Discinfo(_) => "org.osbuild.discinfo",
            Stage::Xorrisofs(_) => "org.osbuild.xorrisofs",
            Stage::Buildstamp(_) => "org.osbuild.buildstamp",
            Stage::Anaconda(_) => "org.osbuild.anaconda",
            Stage::LoraxScript(_) => "org.osbuild.lorax-script",
            Stage::Dracut(_) => "org.osbuild.dracut",
            Stage::Kickstart(_) => "org.osbuild.kickstart",
            Stage::Selinux(_) => "org.osbuild.selinux",
            Stage::Chmod(_) => "org.osbuild.chmod",
            Stage::Mkdir(_) => "org.osbuild.mkdir",
            Stage::OstreeConfig(_) => "org.osbuild.ostree.config",
            Stage::NginxConfig(_) => "org.osbuild.nginx.conf",
        }
    }
}
