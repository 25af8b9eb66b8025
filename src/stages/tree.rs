//! Small filesystem tree adjustments.
//!
//! Keyed options (SELinux labels, chmod items) are `IndexMap`s: keys are
//! unique and insertion order is what gets serialized, so manifests come
//! out byte-identical between runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelinuxStageOptions {
    pub file_contexts: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
}

/// SELinux relabel options.
///
/// With `label_cp` set, cp and tar get `install_exec_t` so they can write
/// labels from inside the build root.
pub fn selinux_stage_options(label_cp: bool) -> SelinuxStageOptions {
    let mut labels = IndexMap::new();
    if label_cp {
        for bin in ["/usr/bin/cp", "/usr/bin/tar"] {
            labels.insert(
                bin.to_string(),
                "system_u:object_r:install_exec_t:s0".to_string(),
            );
        }
    }
    SelinuxStageOptions {
        file_contexts: "etc/selinux/targeted/contexts/files/file_contexts".to_string(),
        labels,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChmodPathOptions {
    pub mode: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChmodStageOptions {
    pub items: IndexMap<String, ChmodPathOptions>,
}

pub fn chmod_stage_options(path: &str, mode: &str, recursive: bool) -> ChmodStageOptions {
    let mut items = IndexMap::new();
    items.insert(
        path.to_string(),
        ChmodPathOptions {
            mode: mode.to_string(),
            recursive,
        },
    );
    ChmodStageOptions { items }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirPath {
    pub path: String,
    pub mode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirStageOptions {
    pub paths: Vec<MkdirPath>,
}

/// Mount point for the ESP.
pub fn efi_mkdir_stage_options() -> MkdirStageOptions {
    MkdirStageOptions {
        paths: vec![MkdirPath {
            path: "/boot/efi".to_string(),
            mode: 0o700,
        }],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysrootOptions {
    pub readonly: bool,
    pub bootloader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OstreeConfig {
    pub sysroot: SysrootOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OstreeConfigStageOptions {
    pub repo: String,
    pub config: OstreeConfig,
}

pub fn ostree_config_stage_options(repo: &str, read_only: bool) -> OstreeConfigStageOptions {
    OstreeConfigStageOptions {
        repo: repo.to_string(),
        config: OstreeConfig {
            sysroot: SysrootOptions {
                readonly: read_only,
                bootloader: "none".to_string(),
            },
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NginxConfig {
    pub listen: String,
    pub root: String,
    pub daemon: bool,
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NginxConfigStageOptions {
    pub path: String,
    pub config: NginxConfig,
}

/// nginx set up to run in the foreground of an unprivileged container.
pub fn nginx_config_stage_options(path: &str, html_root: &str, listen: &str) -> NginxConfigStageOptions {
    NginxConfigStageOptions {
        path: path.to_string(),
        config: NginxConfig {
            listen: listen.to_string(),
            root: html_root.to_string(),
            daemon: false,
            pid: "/tmp/nginx.pid".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selinux_labels_in_insertion_order() {
        let plain = selinux_stage_options(false);
        assert!(plain.labels.is_empty());
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("labels").is_none());

        let labelled = selinux_stage_options(true);
        let keys: Vec<_> = labelled.labels.keys().map(String::as_str).collect();
        assert_eq!(keys, ["/usr/bin/cp", "/usr/bin/tar"]);
        let text = serde_json::to_string(&labelled).unwrap();
        assert!(text.find("/usr/bin/cp").unwrap() < text.find("/usr/bin/tar").unwrap());
    }

    #[test]
    fn test_chmod_item() {
        let options = chmod_stage_options("/usr/share/nginx/html", "a+rX", true);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"items": {"/usr/share/nginx/html": {"mode": "a+rX", "recursive": true}}})
        );
    }

    #[test]
    fn test_efi_mkdir_mode() {
        let options = efi_mkdir_stage_options();
        assert_eq!(options.paths[0].path, "/boot/efi");
        assert_eq!(options.paths[0].mode, 448);
    }

    #[test]
    fn test_ostree_config_never_manages_bootloader() {
        let options = ostree_config_stage_options("/ostree/repo", true);
        assert!(options.config.sysroot.readonly);
        assert_eq!(options.config.sysroot.bootloader, "none");
    }

    #[test]
    fn test_nginx_runs_in_foreground() {
        let options = nginx_config_stage_options("/etc/nginx.conf", "/usr/share/nginx/html", "8080");
        assert!(!options.config.daemon);
        assert_eq!(options.config.pid, "/tmp/nginx.pid");
        assert_eq!(options.config.listen, "8080");
    }
}
