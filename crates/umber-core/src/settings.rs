//! Per-run settings consumed by the pipeline
//!
//! These are loaded by an external collaborator (the CLI or a host
//! adapter) and passed in as plain immutable values per run, never as
//! ambient global state. That keeps per-entry parallel assembly sound.

use crate::axis::AxisConversion;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// How to treat the file's designated root bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootHandling {
    /// Keep the file root as the skeleton root
    #[default]
    KeepRoot,
    /// Drop the file's dummy root; its children are re-parented to a
    /// synthetic root and the old root's bind transform is folded into
    /// their bind transforms
    SyntheticRoot,
}

/// Resolved per-node settings carried on a build-plan entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub axis: AxisConversion,
    pub root: RootHandling,
    /// When false, animation translation keys are discarded and only
    /// rotation is applied. Suppresses root-motion artifacts from
    /// poorly authored sources.
    pub use_translation: bool,
    pub texture_path: Option<PathBuf>,
    pub material_file: Option<PathBuf>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            axis: AxisConversion::default(),
            root: RootHandling::default(),
            use_translation: true,
            texture_path: None,
            material_file: None,
        }
    }
}

impl ModelSettings {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Action-name skip list. Actions matching an entry are excluded before
/// binding: no track, no binding warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionFilters {
    pub skip: HashSet<String>,
}

impl ActionFilters {
    pub fn is_skipped(&self, action_name: &str) -> bool {
        self.skip.contains(action_name)
    }
}

/// A bone-to-bone copy-transform link between two armatures.
///
/// Inert configuration surface: the reference behavior ships this
/// disabled, so it is carried here for config compatibility but has no
/// runtime effect anywhere in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmatureLink {
    pub name: String,
    pub source_bone: String,
    pub target_bone: String,
}

/// The full (inert) armature-link table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmatureLinks {
    pub links: Vec<ArmatureLink>,
}
