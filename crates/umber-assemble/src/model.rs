//! Assembled scene model
//!
//! The abstract build result handed to a host adapter. The adapter
//! turns these into actual scene objects (mesh object, armature,
//! animation tracks); the core never touches the scene itself.

use glam::{Quat, Vec3};
use std::path::PathBuf;
use umber_format::{BoneInfluence, Wedge};

/// Name given to a root bone synthesized during root handling
pub const SYNTHETIC_ROOT_NAME: &str = "scene_root";

/// Every surviving action is placed at this frame. No automatic
/// alignment between primary and additive track lengths is attempted;
/// aligning layered tracks is a downstream manual task.
pub const TRACK_START_FRAME: u32 = 1;

/// A triangle in the merged mesh. Wedge indices are re-based to the
/// merged wedge pool and the material slot to the merged slot table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFace {
    pub wedges: [u32; 3],
    pub material_slot: usize,
    pub smoothing_mask: u32,
}

/// One merged material slot. Texture/material overrides come from the
/// mesh source that first introduced the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSlot {
    pub name: String,
    pub texture_path: Option<PathBuf>,
    pub material_file: Option<PathBuf>,
}

/// Single merged vertex/triangle/material pool for one model
#[derive(Debug, Clone, Default)]
pub struct AssembledMesh {
    pub points: Vec<Vec3>,
    pub wedges: Vec<Wedge>,
    pub faces: Vec<SceneFace>,
    pub materials: Vec<MaterialSlot>,
    /// Per merged point, bone indices into the finalized skeleton.
    /// Empty when the entry builds no skeleton.
    pub influences: Vec<Vec<BoneInfluence>>,
}

/// A bone in the merged, finalized skeleton
#[derive(Debug, Clone)]
pub struct SceneBone {
    pub name: String,
    /// `None` only for the single root
    pub parent: Option<usize>,
    /// Bind translation relative to the parent, axis-converted
    pub position: Vec3,
    /// Bind orientation relative to the parent
    pub orientation: Quat,
}

/// Merged bone tree with exactly one root
#[derive(Debug, Clone, Default)]
pub struct SceneSkeleton {
    pub bones: Vec<SceneBone>,
}

impl SceneSkeleton {
    /// Index of the single root bone
    pub fn root_index(&self) -> Option<usize> {
        self.bones.iter().position(|b| b.parent.is_none())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }
}

/// Per-bone keyframe curves of one bound action
#[derive(Debug, Clone)]
pub struct BoneCurve {
    pub bone_name: String,
    /// Index into the finalized skeleton
    pub bone_index: usize,
    /// One rotation per frame
    pub rotations: Vec<Quat>,
    /// One translation per frame; `None` when translation keys were
    /// discarded by the use-translation setting
    pub translations: Option<Vec<Vec3>>,
    /// One scale per frame
    pub scales: Vec<Vec3>,
}

/// The placement of one bound action in the target scene's
/// animation-layering system
#[derive(Debug, Clone)]
pub struct BoundTrack {
    pub action: String,
    pub start_frame: u32,
    /// Tracks are created muted so a batch import never starts playback
    pub muted: bool,
    pub additive: bool,
    pub frame_count: usize,
    /// Playback rate in frames per second, as authored
    pub rate: f32,
    /// Curves for the clip bones that matched the skeleton. Skeleton
    /// bones with no curve stay at bind pose for this action.
    pub curves: Vec<BoneCurve>,
}

/// Everything the host adapter needs to realize one model
#[derive(Debug, Clone)]
pub struct AssembledModel {
    pub name: String,
    pub mesh: AssembledMesh,
    pub skeleton: Option<SceneSkeleton>,
    pub tracks: Vec<BoundTrack>,
}
