//! Configuration management for stagegen.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use std::collections::HashMap;
use std::path::Path;

use crate::stages::iso::Product;

pub const DEFAULT_PRODUCT_NAME: &str = "Red Hat Enterprise Linux";
pub const DEFAULT_OS_VERSION: &str = "8.5";
pub const DEFAULT_ISO_LABEL_PREFIX: &str = "RHEL-8-5-0-BaseOS";
pub const DEFAULT_QCOW2_COMPAT: &str = "1.1";
pub const DEFAULT_DISCINFO_RELEASE: &str = "202010217.n.0";

/// Stagegen configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Product name stamped on installer media
    pub product_name: String,
    /// Product version (e.g., "8.5")
    pub os_version: String,
    /// ISO volume label prefix, the architecture is appended
    pub iso_label_prefix: String,
    /// qcow2 compat level used when a request does not set one
    pub qcow2_compat: String,
    /// Release string written to .discinfo
    pub discinfo_release: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            os_version: DEFAULT_OS_VERSION.to_string(),
            iso_label_prefix: DEFAULT_ISO_LABEL_PREFIX.to_string(),
            qcow2_compat: DEFAULT_QCOW2_COMPAT.to_string(),
            discinfo_release: DEFAULT_DISCINFO_RELEASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    ///
    /// A missing or unreadable .env file is not an error.
    pub fn load(base_dir: &Path) -> Self {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if let Ok(iter) = dotenvy::from_path_iter(&env_path) {
            for item in iter {
                match item {
                    Ok((key, value)) => {
                        vars.insert(key, value);
                    }
                    Err(e) => {
                        tracing::warn!(path = %env_path.display(), "skipping bad .env line: {}", e);
                    }
                }
            }
        }

        // Environment variables override .env file. Non UTF-8 entries can't
        // be any of our keys.
        vars.extend(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }));

        Self::from_vars(&vars)
    }

    fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str, default: String| vars.get(key).cloned().unwrap_or(default);

        Self {
            product_name: get("STAGEGEN_PRODUCT_NAME", defaults.product_name),
            os_version: get("STAGEGEN_OS_VERSION", defaults.os_version),
            iso_label_prefix: get("STAGEGEN_ISO_LABEL_PREFIX", defaults.iso_label_prefix),
            qcow2_compat: get("STAGEGEN_QCOW2_COMPAT", defaults.qcow2_compat),
            discinfo_release: get("STAGEGEN_DISCINFO_RELEASE", defaults.discinfo_release),
        }
    }

    pub fn product(&self) -> Product {
        Product {
            name: self.product_name.clone(),
            version: self.os_version.clone(),
            label_prefix: self.iso_label_prefix.clone(),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  STAGEGEN_PRODUCT_NAME: {}", self.product_name);
        println!("  STAGEGEN_OS_VERSION: {}", self.os_version);
        println!("  STAGEGEN_ISO_LABEL_PREFIX: {}", self.iso_label_prefix);
        println!("  STAGEGEN_QCOW2_COMPAT: {}", self.qcow2_compat);
        println!("  STAGEGEN_DISCINFO_RELEASE: {}", self.discinfo_release);
    }
}
