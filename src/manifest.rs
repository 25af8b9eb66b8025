//! Manifests - assembled stages with content-derived ids.
//!
//! A stage id is the SHA-256 of the previous stage id followed by the
//! stage's JSON. Two pipelines that share a prefix of stages share ids for
//! that prefix, which lets the executor reuse cached trees.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{assemble, ImageRequest};
use crate::stages::Stage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestStage {
    pub id: String,
    #[serde(flatten)]
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub stages: Vec<ManifestStage>,
}

impl Manifest {
    /// Assemble `request` and assign stage ids.
    pub fn build(request: &ImageRequest, config: &Config) -> Result<Self> {
        let stages = assemble(request, config)?;
        let manifest = Self::from_stages(&request.name, stages);
        tracing::info!(
            image = %manifest.name,
            stages = manifest.stages.len(),
            tree = manifest.tree_id().unwrap_or("-"),
            "manifest assembled"
        );
        Ok(manifest)
    }

    pub fn from_stages(name: &str, stages: Vec<Stage>) -> Self {
        let mut previous = String::new();
        let stages = stages
            .into_iter()
            .map(|stage| {
                let id = stage_id(&previous, &stage);
                previous = id.clone();
                ManifestStage { id, stage }
            })
            .collect();

        Self {
            name: name.to_string(),
            stages,
        }
    }

    /// Id of the last stage, which identifies the finished tree.
    pub fn tree_id(&self) -> Option<&str> {
        self.stages.last().map(|s| s.id.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn stage_id(previous: &str, stage: &Stage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous.as_bytes());
    // Stage options are plain data, serializing them cannot fail
    let json = serde_json::to_vec(stage).unwrap_or_default();
    hasher.update(&json);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::tree;

    fn stages() -> Vec<Stage> {
        vec![
            Stage::Selinux(tree::selinux_stage_options(false)),
            Stage::Mkdir(tree::efi_mkdir_stage_options()),
        ]
    }

    #[test]
    fn test_ids_are_stable() {
        let a = Manifest::from_stages("a", stages());
        let b = Manifest::from_stages("a", stages());
        assert_eq!(a, b);
        assert_eq!(a.stages[0].id.len(), 64);
        assert_ne!(a.stages[0].id, a.stages[1].id);
        assert_eq!(a.tree_id(), Some(a.stages[1].id.as_str()));
    }

    #[test]
    fn test_ids_chain_over_prefix() {
        let short = Manifest::from_stages("short", stages()[..1].to_vec());
        let long = Manifest::from_stages("long", stages());
        assert_eq!(short.stages[0].id, long.stages[0].id);

        let mut reordered = stages();
        reordered.reverse();
        let reordered = Manifest::from_stages("long", reordered);
        assert_ne!(reordered.tree_id(), long.tree_id());
    }

    #[test]
    fn test_empty_manifest_has_no_tree() {
        assert_eq!(Manifest::from_stages("empty", vec![]).tree_id(), None);
    }

    #[test]
    fn test_json_flattens_stage() {
        let manifest = Manifest::from_stages("a", stages());
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        let first = &json["stages"][0];
        assert_eq!(first["type"], "org.osbuild.selinux");
        assert!(first["id"].is_string());
        assert!(first["options"]["file_contexts"].is_string());
    }
}
