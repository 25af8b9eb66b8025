//! Image assembly - turns an image request into an ordered stage list.
//!
//! Requests are JSON documents:
//!
//! ```text
//! {
//!   "name": "guest-image",
//!   "arch": "x86_64",
//!   "kernel": "4.18.0-348.el8.x86_64",
//!   "filename": "disk.qcow2",
//!   "kind": {"disk": {"partition_table": {...}, "format": "qcow2"}}
//! }
//! ```
//!
//! Stage order matters to the executor (the partition table is written
//! before the bootloader is installed) and is fixed here per image kind.

use serde::{Deserialize, Serialize};

use crate::arch::Arch;
use crate::config::Config;
use crate::disk::PartitionTable;
use crate::error::Result;
use crate::stages::{installer, tree, Stage};
use crate::stages::{
    boot_iso_mono_stage_options, discinfo_stage_options, qemu_stage_options,
    sfdisk_stage_options, xorrisofs_stage_options, zipl_inst_stage_options,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub name: String,
    pub arch: Arch,
    pub kernel: String,
    pub filename: String,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Partitioned disk, optionally converted to a VM format.
    Disk {
        partition_table: PartitionTable,
        /// qcow2, vpc or vmdk. Omitted means the raw image is kept.
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        compat: Option<String>,
    },
    /// Bootable anaconda installer ISO.
    Installer {
        #[serde(default)]
        payload: Option<Payload>,
        #[serde(default)]
        dracut_modules: Vec<String>,
    },
    /// ostree commit tree.
    Commit {
        #[serde(default = "default_ostree_repo")]
        repo: String,
    },
    /// Container serving an ostree repo over http.
    Container {
        #[serde(default = "default_html_root")]
        html_root: String,
        #[serde(default = "default_listen")]
        listen: String,
    },
}

/// What the installer kickstart installs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Tar { url: String },
    Ostree {
        url: String,
        #[serde(rename = "ref")]
        reference: String,
    },
}

fn default_ostree_repo() -> String {
    "/ostree/repo".to_string()
}

fn default_html_root() -> String {
    "/usr/share/nginx/html".to_string()
}

fn default_listen() -> String {
    "8080".to_string()
}

impl ImageKind {
    pub fn label(&self) -> &'static str {
        match self {
            ImageKind::Disk { .. } => "disk",
            ImageKind::Installer { .. } => "installer",
            ImageKind::Commit { .. } => "commit",
            ImageKind::Container { .. } => "container",
        }
    }
}

/// Derive every stage for `request`, in execution order.
///
/// The first derivation error aborts the whole request.
pub fn assemble(request: &ImageRequest, config: &Config) -> Result<Vec<Stage>> {
    let arch = request.arch;
    let mut stages = Vec::new();

    match &request.kind {
        ImageKind::Disk {
            partition_table,
            format,
            compat,
        } => {
            stages.push(Stage::Sfdisk(sfdisk_stage_options(partition_table)?));
            if arch == Arch::S390x {
                stages.push(Stage::ZiplInst(zipl_inst_stage_options(
                    &request.kernel,
                    partition_table,
                )?));
            }
            if let Some(format) = format {
                let compat = compat.as_deref().unwrap_or(&config.qcow2_compat);
                stages.push(Stage::Qemu(qemu_stage_options(
                    &request.filename,
                    format,
                    compat,
                )?));
            }
        }
        ImageKind::Installer {
            payload,
            dracut_modules,
        } => {
            let product = config.product();
            // bootiso.mono goes first so unsupported arches fail before anything else
            let boot = boot_iso_mono_stage_options(&request.kernel, arch, &product)?;
            let isolinux = boot.isolinux.enabled;

            stages.push(Stage::Buildstamp(installer::buildstamp_stage_options(
                arch, &product,
            )));
            stages.push(Stage::Anaconda(installer::anaconda_stage_options()));
            stages.push(Stage::LoraxScript(installer::lorax_script_stage_options(arch)));
            stages.push(Stage::Dracut(installer::dracut_stage_options(
                &request.kernel,
                arch,
                dracut_modules,
            )));
            stages.push(Stage::Selinux(tree::selinux_stage_options(false)));
            match payload {
                Some(Payload::Tar { url }) => {
                    stages.push(Stage::Kickstart(installer::tar_kickstart_stage_options(url)));
                }
                Some(Payload::Ostree { url, reference }) => {
                    stages.push(Stage::Kickstart(installer::ostree_kickstart_stage_options(
                        url, reference,
                    )));
                }
                None => {}
            }
            stages.push(Stage::BootIsoMono(boot));
            stages.push(Stage::Discinfo(discinfo_stage_options(
                arch,
                &config.discinfo_release,
            )));
            stages.push(Stage::Xorrisofs(xorrisofs_stage_options(
                &request.filename,
                arch,
                &product,
                isolinux,
            )));
        }
        ImageKind::Commit { repo } => {
            stages.push(Stage::Selinux(tree::selinux_stage_options(false)));
            if arch.boot_media().is_some() {
                stages.push(Stage::Mkdir(tree::efi_mkdir_stage_options()));
            }
            stages.push(Stage::OstreeConfig(tree::ostree_config_stage_options(
                repo, true,
            )));
        }
        ImageKind::Container { html_root, listen } => {
            stages.push(Stage::NginxConfig(tree::nginx_config_stage_options(
                "/etc/nginx.conf",
                html_root,
                listen,
            )));
            stages.push(Stage::Chmod(tree::chmod_stage_options(html_root, "a+rX", true)));
        }
    }

    tracing::debug!(
        image = %request.name,
        kind = request.kind.label(),
        stages = stages.len(),
        "assembled pipeline"
    );

    Ok(stages)
}
