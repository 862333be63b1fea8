//! Parsed asset model
//!
//! CPU-side representations of a decoded mesh chunk and animation clip.
//! Pure data: these are built by the decoders, owned by the assembler
//! invocation that requested them, and dropped once folded into an
//! assembled model.

use glam::{Quat, Vec3};

/// Maximum bone influences kept per point. Extra influences are dropped
/// smallest-weight-first at decode time.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// A vertex instance carrying a UV coordinate and referencing a shared
/// point. Multiple wedges may reference the same point with different
/// UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub point_index: u32,
    pub uv: [f32; 2],
    pub material_index: u8,
}

/// A textured triangle referencing three wedges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub wedges: [u32; 3],
    pub material_index: u8,
    pub smoothing_mask: u32,
}

/// One entry of the material-name table
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    pub name: String,
    pub texture_index: u32,
    pub poly_flags: u32,
}

/// A bone: orientation and position relative to its parent
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// `None` for the root
    pub parent: Option<usize>,
    pub position: Vec3,
    pub orientation: Quat,
    pub flags: u32,
    pub num_children: i32,
}

/// One bone influence on a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    pub bone_index: u32,
    pub weight: f32,
}

/// A fully decoded mesh file
#[derive(Debug, Clone, Default)]
pub struct MeshChunk {
    pub points: Vec<Vec3>,
    pub wedges: Vec<Wedge>,
    pub faces: Vec<Face>,
    pub materials: Vec<MaterialEntry>,
    pub bones: Vec<Bone>,
    /// Per-point influence lists, parallel to `points`, capped at
    /// `MAX_BONE_INFLUENCES`. Empty when the file has no weights.
    pub influences: Vec<Vec<BoneInfluence>>,
    /// Extra UV sets written by some exporters. Preserved but not
    /// consumed by the assembler.
    pub extra_uvs: Vec<Vec<[f32; 2]>>,
}

impl MeshChunk {
    pub fn has_skeleton(&self) -> bool {
        !self.bones.is_empty()
    }
}

/// One key of one bone on one frame
#[derive(Debug, Clone, Copy)]
pub struct BoneKey {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Duration until the next key as written by the exporter
    pub time: f32,
}

impl Default for BoneKey {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            time: 0.0,
        }
    }
}

/// A named, contiguous keyframe range: one playable sequence
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub group: String,
    pub frame_count: usize,
    /// Playback rate in frames per second
    pub rate: f32,
    /// `frame_count * bone_count` keys in frame-major order: all bones
    /// for frame 0, then all bones for frame 1, and so on. Bone order
    /// matches the clip's reference bone-name list.
    pub keys: Vec<BoneKey>,
}

impl Action {
    /// Key for `bone_index` on `frame`, given the clip's bone count
    pub fn key(&self, frame: usize, bone_count: usize, bone_index: usize) -> &BoneKey {
        &self.keys[frame * bone_count + bone_index]
    }
}

/// A fully decoded animation file
#[derive(Debug, Clone, Default)]
pub struct AnimationClip {
    /// The skeleton the clip was authored against, in key order
    pub bone_names: Vec<String>,
    pub actions: Vec<Action>,
}
