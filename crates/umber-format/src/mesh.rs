//! Skeletal/static mesh file decoder
//!
//! Chunk layout follows the ActorX convention: `ACTRHEAD`, then
//! points, wedges, faces, materials and optionally bones, raw weights
//! and extra UV sets. Unknown chunk ids are skipped so exporter
//! extensions do not break decoding.

use crate::reader::Reader;
use crate::types::{
    Bone, BoneInfluence, Face, MaterialEntry, MeshChunk, Wedge, MAX_BONE_INFLUENCES,
};
use glam::{Quat, Vec3};
use umber_core::{Result, UmberError};

const MESH_HEADER_ID: &str = "ACTRHEAD";

const POINT_SIZE: usize = 12;
const WEDGE_SIZE: usize = 16;
const FACE16_SIZE: usize = 12;
const FACE32_SIZE: usize = 18;
const MATERIAL_SIZE: usize = 88;
const BONE_SIZE: usize = 120;
const WEIGHT_SIZE: usize = 12;
const EXTRA_UV_SIZE: usize = 8;

/// Wedge chunks switch to 32-bit point indices above this record count
const WEDGE16_LIMIT: i32 = 65536;

/// Decode a mesh file into a [`MeshChunk`].
///
/// Fails with `MalformedChunk` on size/count mismatches, missing
/// required chunks or out-of-range indices, and `SkeletonStructure`
/// on a cyclic or out-of-range bone parent.
pub fn decode_mesh(bytes: &[u8]) -> Result<MeshChunk> {
    let mut r = Reader::new(bytes);

    let head = r
        .read_chunk_header()
        .filter(|h| h.id == MESH_HEADER_ID)
        .ok_or_else(|| UmberError::malformed(MESH_HEADER_ID, "missing file header"))?;
    r.skip_chunk(&head)?;

    let mut chunk = MeshChunk::default();
    let mut raw_weights: Vec<(f32, u32, u32)> = Vec::new();
    let mut seen = ChunkPresence::default();

    while let Some(header) = r.read_chunk_header() {
        match header.id.as_str() {
            "PNTS0000" => {
                let payload = r.chunk_payload(&header, POINT_SIZE)?;
                chunk.points = read_points(payload);
                seen.points = true;
            }
            "VTXW0000" => {
                let payload = r.chunk_payload(&header, WEDGE_SIZE)?;
                chunk.wedges = if header.data_count <= WEDGE16_LIMIT {
                    read_wedges16(payload)
                } else {
                    read_wedges32(payload)
                };
                seen.wedges = true;
            }
            "FACE0000" => {
                let payload = r.chunk_payload(&header, FACE16_SIZE)?;
                chunk.faces = read_faces16(payload);
                seen.faces = true;
            }
            "FACE3200" => {
                let payload = r.chunk_payload(&header, FACE32_SIZE)?;
                chunk.faces = read_faces32(payload);
                seen.faces = true;
            }
            "MATT0000" => {
                let payload = r.chunk_payload(&header, MATERIAL_SIZE)?;
                chunk.materials = read_materials(payload);
                seen.materials = true;
            }
            "REFSKELT" => {
                let payload = r.chunk_payload(&header, BONE_SIZE)?;
                chunk.bones = read_bones(payload)?;
            }
            "RAWWEIGHTS" => {
                let payload = r.chunk_payload(&header, WEIGHT_SIZE)?;
                raw_weights = read_weights(payload);
            }
            "EXTRAUVS0" | "EXTRAUVS1" | "EXTRAUVS2" => {
                let payload = r.chunk_payload(&header, EXTRA_UV_SIZE)?;
                chunk.extra_uvs.push(read_extra_uvs(payload));
            }
            _ => r.skip_chunk(&header)?,
        }
    }

    seen.require()?;
    validate_indices(&chunk)?;
    validate_skeleton(&chunk.bones)?;
    chunk.influences = group_influences(&chunk, raw_weights)?;

    Ok(chunk)
}

#[derive(Default)]
struct ChunkPresence {
    points: bool,
    wedges: bool,
    faces: bool,
    materials: bool,
}

impl ChunkPresence {
    fn require(&self) -> Result<()> {
        let missing = [
            ("PNTS0000", self.points),
            ("VTXW0000", self.wedges),
            ("FACE0000", self.faces),
            ("MATT0000", self.materials),
        ]
        .into_iter()
        .find(|(_, present)| !present);

        match missing {
            Some((id, _)) => Err(UmberError::malformed(id, "required chunk missing")),
            None => Ok(()),
        }
    }
}

fn read_points(payload: &[u8]) -> Vec<Vec3> {
    let mut r = Reader::new(payload);
    let mut points = Vec::with_capacity(payload.len() / POINT_SIZE);
    while r.remaining() >= POINT_SIZE {
        let x = r.read_f32().unwrap();
        let y = r.read_f32().unwrap();
        let z = r.read_f32().unwrap();
        points.push(Vec3::new(x, y, z));
    }
    points
}

fn read_wedges16(payload: &[u8]) -> Vec<Wedge> {
    let mut r = Reader::new(payload);
    let mut wedges = Vec::with_capacity(payload.len() / WEDGE_SIZE);
    while r.remaining() >= WEDGE_SIZE {
        let point_index = r.read_u16().unwrap() as u32;
        let _pad = r.read_u16().unwrap();
        let u = r.read_f32().unwrap();
        let v = r.read_f32().unwrap();
        let material_index = r.read_u8().unwrap();
        let _reserved = r.read_u8().unwrap();
        let _pad2 = r.read_u16().unwrap();
        wedges.push(Wedge {
            point_index,
            uv: [u, v],
            material_index,
        });
    }
    wedges
}

fn read_wedges32(payload: &[u8]) -> Vec<Wedge> {
    let mut r = Reader::new(payload);
    let mut wedges = Vec::with_capacity(payload.len() / WEDGE_SIZE);
    while r.remaining() >= WEDGE_SIZE {
        let point_index = r.read_u32().unwrap();
        let u = r.read_f32().unwrap();
        let v = r.read_f32().unwrap();
        let material_index = r.read_u8().unwrap();
        let _reserved = r.read_u8().unwrap();
        let _pad = r.read_u16().unwrap();
        wedges.push(Wedge {
            point_index,
            uv: [u, v],
            material_index,
        });
    }
    wedges
}

fn read_faces16(payload: &[u8]) -> Vec<Face> {
    let mut r = Reader::new(payload);
    let mut faces = Vec::with_capacity(payload.len() / FACE16_SIZE);
    while r.remaining() >= FACE16_SIZE {
        let w0 = r.read_u16().unwrap() as u32;
        let w1 = r.read_u16().unwrap() as u32;
        let w2 = r.read_u16().unwrap() as u32;
        let material_index = r.read_u8().unwrap();
        let _aux_material = r.read_u8().unwrap();
        let smoothing_mask = r.read_u32().unwrap();
        faces.push(Face {
            wedges: [w0, w1, w2],
            material_index,
            smoothing_mask,
        });
    }
    faces
}

fn read_faces32(payload: &[u8]) -> Vec<Face> {
    let mut r = Reader::new(payload);
    let mut faces = Vec::with_capacity(payload.len() / FACE32_SIZE);
    while r.remaining() >= FACE32_SIZE {
        let w0 = r.read_u32().unwrap();
        let w1 = r.read_u32().unwrap();
        let w2 = r.read_u32().unwrap();
        let material_index = r.read_u8().unwrap();
        let _aux_material = r.read_u8().unwrap();
        let smoothing_mask = r.read_u32().unwrap();
        faces.push(Face {
            wedges: [w0, w1, w2],
            material_index,
            smoothing_mask,
        });
    }
    faces
}

fn read_materials(payload: &[u8]) -> Vec<MaterialEntry> {
    let mut r = Reader::new(payload);
    let mut materials = Vec::with_capacity(payload.len() / MATERIAL_SIZE);
    while r.remaining() >= MATERIAL_SIZE {
        let name = r.read_fixed_str(64).unwrap();
        let texture_index = r.read_u32().unwrap();
        let poly_flags = r.read_u32().unwrap();
        let _aux_material = r.read_u32().unwrap();
        let _aux_flags = r.read_u32().unwrap();
        let _lod_bias = r.read_i32().unwrap();
        let _lod_style = r.read_i32().unwrap();
        materials.push(MaterialEntry {
            name,
            texture_index,
            poly_flags,
        });
    }
    materials
}

pub(crate) fn read_bones(payload: &[u8]) -> Result<Vec<Bone>> {
    let mut r = Reader::new(payload);
    let mut bones = Vec::with_capacity(payload.len() / BONE_SIZE);
    let mut index = 0usize;
    while r.remaining() >= BONE_SIZE {
        let name = r.read_fixed_str(64).unwrap();
        let flags = r.read_u32().unwrap();
        let num_children = r.read_i32().unwrap();
        let parent_index = r.read_i32().unwrap();
        let qx = r.read_f32().unwrap();
        let qy = r.read_f32().unwrap();
        let qz = r.read_f32().unwrap();
        let qw = r.read_f32().unwrap();
        let px = r.read_f32().unwrap();
        let py = r.read_f32().unwrap();
        let pz = r.read_f32().unwrap();
        let _length = r.read_f32().unwrap();
        let _sx = r.read_f32().unwrap();
        let _sy = r.read_f32().unwrap();
        let _sz = r.read_f32().unwrap();

        // the root bone points at itself by convention
        let parent = if index == 0 && parent_index == 0 {
            None
        } else if parent_index < 0 {
            return Err(UmberError::SkeletonStructure(format!(
                "bone '{}' has negative parent index {}",
                name, parent_index
            )));
        } else {
            Some(parent_index as usize)
        };

        bones.push(Bone {
            name,
            parent,
            position: Vec3::new(px, py, pz),
            orientation: Quat::from_xyzw(qx, qy, qz, qw),
            flags,
            num_children,
        });
        index += 1;
    }
    Ok(bones)
}

fn read_weights(payload: &[u8]) -> Vec<(f32, u32, u32)> {
    let mut r = Reader::new(payload);
    let mut weights = Vec::with_capacity(payload.len() / WEIGHT_SIZE);
    while r.remaining() >= WEIGHT_SIZE {
        let weight = r.read_f32().unwrap();
        let point_index = r.read_u32().unwrap();
        let bone_index = r.read_u32().unwrap();
        weights.push((weight, point_index, bone_index));
    }
    weights
}

fn read_extra_uvs(payload: &[u8]) -> Vec<[f32; 2]> {
    let mut r = Reader::new(payload);
    let mut uvs = Vec::with_capacity(payload.len() / EXTRA_UV_SIZE);
    while r.remaining() >= EXTRA_UV_SIZE {
        let u = r.read_f32().unwrap();
        let v = r.read_f32().unwrap();
        uvs.push([u, v]);
    }
    uvs
}

/// Every wedge must reference a valid point, and every face a valid
/// wedge and material slot
fn validate_indices(chunk: &MeshChunk) -> Result<()> {
    let point_count = chunk.points.len() as u32;
    for (i, wedge) in chunk.wedges.iter().enumerate() {
        if wedge.point_index >= point_count {
            return Err(UmberError::malformed(
                "VTXW0000",
                format!(
                    "wedge {} references point {} of {}",
                    i, wedge.point_index, point_count
                ),
            ));
        }
    }

    let wedge_count = chunk.wedges.len() as u32;
    let material_count = chunk.materials.len();
    for (i, face) in chunk.faces.iter().enumerate() {
        for &w in &face.wedges {
            if w >= wedge_count {
                return Err(UmberError::malformed(
                    "FACE0000",
                    format!("face {} references wedge {} of {}", i, w, wedge_count),
                ));
            }
        }
        if face.material_index as usize >= material_count {
            return Err(UmberError::malformed(
                "FACE0000",
                format!(
                    "face {} references material {} of {}",
                    i, face.material_index, material_count
                ),
            ));
        }
    }
    Ok(())
}

/// Bone parent indices must be in range and form a tree
pub(crate) fn validate_skeleton(bones: &[Bone]) -> Result<()> {
    for (i, bone) in bones.iter().enumerate() {
        let Some(parent) = bone.parent else { continue };
        if parent >= bones.len() {
            return Err(UmberError::SkeletonStructure(format!(
                "bone '{}' has out-of-range parent index {}",
                bone.name, parent
            )));
        }
        if parent == i {
            return Err(UmberError::SkeletonStructure(format!(
                "bone '{}' is its own parent",
                bone.name
            )));
        }
    }

    // walk each bone to the root; more steps than bones means a cycle
    for bone in bones {
        let mut cursor = bone.parent;
        let mut steps = 0usize;
        while let Some(parent) = cursor {
            steps += 1;
            if steps > bones.len() {
                return Err(UmberError::SkeletonStructure(format!(
                    "cycle in bone parents involving '{}'",
                    bone.name
                )));
            }
            cursor = bones[parent].parent;
        }
    }
    Ok(())
}

/// Group the flat weight records per point, capped at
/// [`MAX_BONE_INFLUENCES`] keeping the largest weights
fn group_influences(chunk: &MeshChunk, raw: Vec<(f32, u32, u32)>) -> Result<Vec<Vec<BoneInfluence>>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut influences = vec![Vec::new(); chunk.points.len()];
    for (weight, point_index, bone_index) in raw {
        if point_index as usize >= chunk.points.len() {
            return Err(UmberError::malformed(
                "RAWWEIGHTS",
                format!("weight references point {} of {}", point_index, chunk.points.len()),
            ));
        }
        if bone_index as usize >= chunk.bones.len() {
            return Err(UmberError::malformed(
                "RAWWEIGHTS",
                format!("weight references bone {} of {}", bone_index, chunk.bones.len()),
            ));
        }
        influences[point_index as usize].push(BoneInfluence { bone_index, weight });
    }

    for list in &mut influences {
        if list.len() > MAX_BONE_INFLUENCES {
            list.sort_by(|a, b| b.weight.total_cmp(&a.weight));
            list.truncate(MAX_BONE_INFLUENCES);
        }
    }
    Ok(influences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_mesh;
    use crate::fixtures::{simple_mesh, simple_skinned_mesh};

    #[test]
    fn decodes_a_simple_mesh() {
        let bytes = encode_mesh(&simple_mesh());
        let chunk = decode_mesh(&bytes).unwrap();
        assert_eq!(chunk.points.len(), 4);
        assert_eq!(chunk.wedges.len(), 4);
        assert_eq!(chunk.faces.len(), 2);
        assert_eq!(chunk.materials.len(), 1);
        assert_eq!(chunk.materials[0].name, "body_mat");
        assert!(!chunk.has_skeleton());
    }

    #[test]
    fn round_trips_point_wedge_face_data() {
        let original = simple_skinned_mesh();
        let decoded = decode_mesh(&encode_mesh(&original)).unwrap();
        assert_eq!(decoded.points, original.points);
        assert_eq!(decoded.wedges, original.wedges);
        assert_eq!(decoded.faces, original.faces);
        assert_eq!(decoded.materials, original.materials);
        assert_eq!(decoded.influences, original.influences);
    }

    #[test]
    fn skinned_mesh_carries_bones_and_weights() {
        let bytes = encode_mesh(&simple_skinned_mesh());
        let chunk = decode_mesh(&bytes).unwrap();
        assert!(chunk.has_skeleton());
        assert_eq!(chunk.bones.len(), 2);
        assert_eq!(chunk.bones[0].parent, None);
        assert_eq!(chunk.bones[1].parent, Some(0));
        assert_eq!(chunk.influences.len(), chunk.points.len());
        assert!(chunk.influences.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn missing_header_fails() {
        let err = decode_mesh(&[]).unwrap_err();
        assert!(matches!(
            err,
            umber_core::UmberError::MalformedChunk { ref chunk, .. } if chunk == "ACTRHEAD"
        ));
    }

    #[test]
    fn missing_required_chunk_fails() {
        // header only, no point/wedge/face/material chunks
        let mut bytes = vec![0u8; 20];
        bytes[..8].copy_from_slice(b"ACTRHEAD");
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        let err = decode_mesh(&bytes).unwrap_err();
        assert!(matches!(
            err,
            umber_core::UmberError::MalformedChunk { ref chunk, .. } if chunk == "PNTS0000"
        ));
    }

    #[test]
    fn out_of_range_wedge_index_fails() {
        let mut mesh = simple_mesh();
        mesh.wedges[0].point_index = 99;
        let err = decode_mesh(&encode_mesh(&mesh)).unwrap_err();
        assert!(matches!(
            err,
            umber_core::UmberError::MalformedChunk { ref chunk, .. } if chunk == "VTXW0000"
        ));
    }

    #[test]
    fn out_of_range_face_material_fails() {
        let mut mesh = simple_mesh();
        mesh.faces[1].material_index = 7;
        let err = decode_mesh(&encode_mesh(&mesh)).unwrap_err();
        assert!(matches!(
            err,
            umber_core::UmberError::MalformedChunk { ref chunk, .. } if chunk == "FACE0000"
        ));
    }

    #[test]
    fn out_of_range_bone_parent_fails() {
        let mut mesh = simple_skinned_mesh();
        mesh.bones[1].parent = Some(17);
        let err = decode_mesh(&encode_mesh(&mesh)).unwrap_err();
        assert!(matches!(err, umber_core::UmberError::SkeletonStructure(_)));
    }

    #[test]
    fn negative_bone_parent_fails() {
        let mut bytes = encode_mesh(&simple_skinned_mesh());
        // parent field of the second REFSKELT record: point, wedge,
        // face and material chunks, the bone chunk header, one full
        // bone record, then the name/flags/children fields
        let off = 32 + (32 + 48) + (32 + 64) + (32 + 24) + (32 + 88) + 32 + 120 + 72;
        bytes[off..off + 4].copy_from_slice(&(-5i32).to_le_bytes());
        let err = decode_mesh(&bytes).unwrap_err();
        assert!(matches!(err, umber_core::UmberError::SkeletonStructure(_)));
    }

    #[test]
    fn cyclic_bone_parents_fail() {
        let mut mesh = simple_skinned_mesh();
        // 0 <-> 1
        mesh.bones[0].parent = Some(1);
        let err = decode_mesh(&encode_mesh(&mesh)).unwrap_err();
        assert!(matches!(err, umber_core::UmberError::SkeletonStructure(_)));
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let mut bytes = encode_mesh(&simple_mesh());
        // append an unrecognised chunk with a payload
        let mut extra = vec![0u8; 20];
        extra[..8].copy_from_slice(b"MYSTERY0");
        extra.extend_from_slice(&0i32.to_le_bytes());
        extra.extend_from_slice(&4i32.to_le_bytes());
        extra.extend_from_slice(&2i32.to_le_bytes());
        extra.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&extra);
        let chunk = decode_mesh(&bytes).unwrap();
        assert_eq!(chunk.points.len(), 4);
    }

    #[test]
    fn influence_cap_keeps_largest_weights() {
        let mut mesh = simple_skinned_mesh();
        mesh.influences[0] = (0..6)
            .map(|i| BoneInfluence {
                bone_index: (i % 2) as u32,
                weight: 0.1 * (i + 1) as f32,
            })
            .collect();
        let decoded = decode_mesh(&encode_mesh(&mesh)).unwrap();
        let caps = &decoded.influences[0];
        assert_eq!(caps.len(), MAX_BONE_INFLUENCES);
        assert!(caps.iter().all(|inf| inf.weight >= 0.3 - 1e-6));
    }
}
