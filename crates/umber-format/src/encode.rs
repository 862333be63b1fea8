//! Chunk-stream encoders
//!
//! Mirror images of the decoders. Used by tests to build synthetic
//! files and by tooling that needs to write assets back out. Point,
//! wedge, face and material data round-trip exactly through
//! `encode_mesh` / `decode_mesh`.

use crate::types::{AnimationClip, MeshChunk};

fn push_fixed_str(out: &mut Vec<u8>, s: &str, width: usize) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(width);
    out.extend_from_slice(&bytes[..n]);
    out.resize(out.len() + (width - n), 0);
}

fn push_chunk_header(out: &mut Vec<u8>, id: &str, size: i32, count: i32) {
    push_fixed_str(out, id, 20);
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
}

/// Encode a [`MeshChunk`] as a chunk stream
pub fn encode_mesh(chunk: &MeshChunk) -> Vec<u8> {
    let mut out = Vec::new();
    push_chunk_header(&mut out, "ACTRHEAD", 0, 0);

    push_chunk_header(&mut out, "PNTS0000", 12, chunk.points.len() as i32);
    for p in &chunk.points {
        out.extend_from_slice(&p.x.to_le_bytes());
        out.extend_from_slice(&p.y.to_le_bytes());
        out.extend_from_slice(&p.z.to_le_bytes());
    }

    let wide_wedges = chunk.wedges.len() > 65536;
    push_chunk_header(&mut out, "VTXW0000", 16, chunk.wedges.len() as i32);
    for w in &chunk.wedges {
        if wide_wedges {
            out.extend_from_slice(&w.point_index.to_le_bytes());
        } else {
            out.extend_from_slice(&(w.point_index as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        out.extend_from_slice(&w.uv[0].to_le_bytes());
        out.extend_from_slice(&w.uv[1].to_le_bytes());
        out.push(w.material_index);
        out.push(0);
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    let wide_faces = chunk
        .faces
        .iter()
        .any(|f| f.wedges.iter().any(|&w| w > u16::MAX as u32));
    let (face_id, face_size) = if wide_faces {
        ("FACE3200", 18)
    } else {
        ("FACE0000", 12)
    };
    push_chunk_header(&mut out, face_id, face_size, chunk.faces.len() as i32);
    for f in &chunk.faces {
        for &w in &f.wedges {
            if wide_faces {
                out.extend_from_slice(&w.to_le_bytes());
            } else {
                out.extend_from_slice(&(w as u16).to_le_bytes());
            }
        }
        out.push(f.material_index);
        out.push(0);
        out.extend_from_slice(&f.smoothing_mask.to_le_bytes());
    }

    push_chunk_header(&mut out, "MATT0000", 88, chunk.materials.len() as i32);
    for m in &chunk.materials {
        push_fixed_str(&mut out, &m.name, 64);
        out.extend_from_slice(&m.texture_index.to_le_bytes());
        out.extend_from_slice(&m.poly_flags.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
    }

    if !chunk.bones.is_empty() {
        push_chunk_header(&mut out, "REFSKELT", 120, chunk.bones.len() as i32);
        for bone in &chunk.bones {
            push_bone(&mut out, &bone.name, bone.parent, bone.position.into(), {
                let q = bone.orientation;
                [q.x, q.y, q.z, q.w]
            });
        }
    }

    let weight_count: usize = chunk.influences.iter().map(|l| l.len()).sum();
    if weight_count > 0 {
        push_chunk_header(&mut out, "RAWWEIGHTS", 12, weight_count as i32);
        for (point_index, list) in chunk.influences.iter().enumerate() {
            for inf in list {
                out.extend_from_slice(&inf.weight.to_le_bytes());
                out.extend_from_slice(&(point_index as u32).to_le_bytes());
                out.extend_from_slice(&inf.bone_index.to_le_bytes());
            }
        }
    }

    for (set, uvs) in chunk.extra_uvs.iter().enumerate() {
        let id = format!("EXTRAUVS{set}");
        push_chunk_header(&mut out, &id, 8, uvs.len() as i32);
        for uv in uvs {
            out.extend_from_slice(&uv[0].to_le_bytes());
            out.extend_from_slice(&uv[1].to_le_bytes());
        }
    }

    out
}

fn push_bone(out: &mut Vec<u8>, name: &str, parent: Option<usize>, pos: [f32; 3], quat: [f32; 4]) {
    push_fixed_str(out, name, 64);
    out.extend_from_slice(&0u32.to_le_bytes()); // flags
    out.extend_from_slice(&0i32.to_le_bytes()); // num_children
    out.extend_from_slice(&(parent.unwrap_or(0) as i32).to_le_bytes());
    for q in quat {
        out.extend_from_slice(&q.to_le_bytes());
    }
    for p in pos {
        out.extend_from_slice(&p.to_le_bytes());
    }
    out.extend_from_slice(&0f32.to_le_bytes()); // length
    for _ in 0..3 {
        out.extend_from_slice(&1f32.to_le_bytes()); // size
    }
}

/// Encode an [`AnimationClip`] as a chunk stream.
///
/// Per-key scale is not representable in the flat key records, so
/// scale does not round-trip; everything else does.
pub fn encode_animation(clip: &AnimationClip) -> Vec<u8> {
    let mut out = Vec::new();
    push_chunk_header(&mut out, "ANIMHEAD", 0, 0);

    push_chunk_header(&mut out, "BONENAMES", 120, clip.bone_names.len() as i32);
    for (i, name) in clip.bone_names.iter().enumerate() {
        let parent = if i == 0 { None } else { Some(0) };
        push_bone(&mut out, name, parent, [0.0; 3], [0.0, 0.0, 0.0, 1.0]);
    }

    push_chunk_header(&mut out, "ANIMINFO", 168, clip.actions.len() as i32);
    let mut first_raw_frame = 0i32;
    for action in &clip.actions {
        push_fixed_str(&mut out, &action.name, 64);
        push_fixed_str(&mut out, &action.group, 64);
        out.extend_from_slice(&(clip.bone_names.len() as i32).to_le_bytes()); // total_bones
        out.extend_from_slice(&0i32.to_le_bytes()); // root_include
        out.extend_from_slice(&0i32.to_le_bytes()); // key_compression_style
        out.extend_from_slice(&0i32.to_le_bytes()); // key_quotum
        out.extend_from_slice(&0f32.to_le_bytes()); // key_reduction
        out.extend_from_slice(&(action.frame_count as f32).to_le_bytes()); // track_time
        out.extend_from_slice(&action.rate.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes()); // start_bone
        out.extend_from_slice(&first_raw_frame.to_le_bytes());
        out.extend_from_slice(&(action.frame_count as i32).to_le_bytes());
        first_raw_frame += action.frame_count as i32;
    }

    let key_count: usize = clip.actions.iter().map(|a| a.keys.len()).sum();
    push_chunk_header(&mut out, "ANIMKEYS", 32, key_count as i32);
    for action in &clip.actions {
        for key in &action.keys {
            out.extend_from_slice(&key.translation.x.to_le_bytes());
            out.extend_from_slice(&key.translation.y.to_le_bytes());
            out.extend_from_slice(&key.translation.z.to_le_bytes());
            out.extend_from_slice(&key.rotation.x.to_le_bytes());
            out.extend_from_slice(&key.rotation.y.to_le_bytes());
            out.extend_from_slice(&key.rotation.z.to_le_bytes());
            out.extend_from_slice(&key.rotation.w.to_le_bytes());
            out.extend_from_slice(&key.time.to_le_bytes());
        }
    }

    out
}
