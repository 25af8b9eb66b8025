//! Batch command - derives manifests for every request in a directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use stagegen::Config;

use super::manifest::derive_manifest;
use crate::timing::Timer;

const MANIFEST_SUFFIX: &str = ".manifest.json";

/// Request files under `dir`, sorted by path.
///
/// Previously written manifests are skipped so the output directory can sit
/// inside the request directory.
pub fn find_requests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut requests = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(MANIFEST_SUFFIX) {
            tracing::warn!(path = %entry.path().display(), "skipping existing manifest");
            continue;
        }
        if name.ends_with(".json") {
            requests.push(entry.into_path());
        }
    }
    Ok(requests)
}

/// Output path for `request`, mirroring its location below `dir` so requests
/// with the same file name in different subdirectories do not collide.
fn manifest_path(request: &Path, dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = request.strip_prefix(dir).unwrap_or(request);
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "request".to_string());
    let subdir = match relative.parent() {
        Some(parent) if request.starts_with(dir) => output_dir.join(parent),
        _ => output_dir.to_path_buf(),
    };
    subdir.join(format!("{}{}", stem, MANIFEST_SUFFIX))
}

/// Execute the batch command. Stops at the first request that fails.
///
/// Returns the number of manifests written.
pub fn cmd_batch(dir: &Path, output_dir: &Path, config: &Config) -> Result<usize> {
    let timer = Timer::start("batch");
    let requests = find_requests(dir)?;
    if requests.is_empty() {
        anyhow::bail!("No *.json image requests found in {}", dir.display());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    for request in &requests {
        let json = derive_manifest(request, config)?;
        let path = manifest_path(request, dir, output_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} -> {}", request.display(), path.display());
    }

    println!("\n{} manifest(s) written to {}", requests.len(), output_dir.display());
    timer.finish();
    Ok(requests.len())
}
