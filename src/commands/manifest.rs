//! Manifest command - derives the manifest for a single request.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use stagegen::{Config, ImageRequest, Manifest};

use crate::timing::Timer;

/// Read and parse an image request file.
pub fn read_request(path: &Path) -> Result<ImageRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid image request {}", path.display()))
}

/// Derive the manifest for `path`, returned as pretty JSON.
pub fn derive_manifest(path: &Path, config: &Config) -> Result<String> {
    let request = read_request(path)?;
    let manifest = Manifest::build(&request, config).with_context(|| {
        format!(
            "Cannot derive stages for image '{}' ({})",
            request.name,
            path.display()
        )
    })?;
    Ok(manifest.to_json()?)
}

/// Execute the manifest command.
pub fn cmd_manifest(request: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let timer = Timer::start("manifest");
    let json = derive_manifest(request, config)?;

    match output {
        Some(output) => {
            fs::write(output, json + "\n")
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), "wrote manifest");
        }
        None => println!("{}", json),
    }

    timer.finish();
    Ok(())
}
