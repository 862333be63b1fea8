//! The resolved build plan
//!
//! Output of graph resolution and input to the assembler: an ordered
//! list of model-build instructions, each with ordered mesh sources,
//! ordered layer-tagged animation sources, and resolved settings.

use std::path::PathBuf;
use umber_core::ModelSettings;

/// Whether a clip is the model's primary animation or a layered
/// additive clip meant to play concurrently with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipLayer {
    Primary,
    Additive,
}

/// One mesh file feeding a build-plan entry
#[derive(Debug, Clone)]
pub struct MeshSource {
    pub name: String,
    pub path: PathBuf,
    pub texture_path: Option<PathBuf>,
    pub material_file: Option<PathBuf>,
}

/// One animation file feeding a build-plan entry
#[derive(Debug, Clone)]
pub struct AnimationSource {
    pub name: String,
    pub path: PathBuf,
    pub layer: ClipLayer,
    pub use_translation: bool,
}

/// One target model to assemble
#[derive(Debug, Clone)]
pub struct BuildPlanEntry {
    pub name: String,
    pub settings: ModelSettings,
    /// False for mesh-only entries attached straight to the import
    /// root; they get no armature and accept no animations.
    pub build_skeleton: bool,
    pub meshes: Vec<MeshSource>,
    pub animations: Vec<AnimationSource>,
}

/// The ordered, validated set of model-assembly instructions
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    pub entries: Vec<BuildPlanEntry>,
}

impl BuildPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
