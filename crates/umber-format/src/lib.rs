//! Umber Format - Binary decoders
//!
//! Parses the two chunk-stream formats (skeletal mesh and animation)
//! into the in-memory asset model. Decoders validate structure only;
//! cross-file checks (bone-name compatibility between a clip and a
//! mesh) belong to the assembler.

mod anim;
mod encode;
#[cfg(test)]
mod fixtures;
mod mesh;
mod reader;
mod types;

pub use anim::decode_animation;
pub use encode::{encode_animation, encode_mesh};
pub use mesh::decode_mesh;
pub use reader::{ChunkHeader, Reader, CHUNK_HEADER_SIZE};
pub use types::{
    Action, AnimationClip, Bone, BoneInfluence, BoneKey, Face, MaterialEntry, MeshChunk, Wedge,
    MAX_BONE_INFLUENCES,
};
