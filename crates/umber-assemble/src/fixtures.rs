//! Hand-built inputs shared by the assembler tests

use glam::{Quat, Vec3};
use umber_format::{
    Action, AnimationClip, Bone, BoneInfluence, BoneKey, Face, MaterialEntry, MeshChunk, Wedge,
};
use umber_graph::{AnimationSource, ClipLayer, MeshSource};

/// Unit quad in the XY plane: 4 points, 4 wedges, 2 triangles, 1 material
pub(crate) fn quad_mesh(material: &str) -> MeshChunk {
    MeshChunk {
        points: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        wedges: (0..4)
            .map(|i| Wedge {
                point_index: i,
                uv: [i as f32 * 0.25, 0.0],
                material_index: 0,
            })
            .collect(),
        faces: vec![
            Face {
                wedges: [0, 1, 2],
                material_index: 0,
                smoothing_mask: 1,
            },
            Face {
                wedges: [0, 2, 3],
                material_index: 0,
                smoothing_mask: 1,
            },
        ],
        materials: vec![MaterialEntry {
            name: material.to_string(),
            texture_index: 0,
            poly_flags: 0,
        }],
        ..MeshChunk::default()
    }
}

/// The quad with a two-bone chain (root at origin, limb at y=1) and one
/// full-weight influence per point
pub(crate) fn skinned_quad(material: &str) -> MeshChunk {
    let mut chunk = quad_mesh(material);
    chunk.bones = vec![
        Bone {
            name: "root".to_string(),
            parent: None,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            flags: 0,
            num_children: 1,
        },
        Bone {
            name: "limb".to_string(),
            parent: Some(0),
            position: Vec3::new(0.0, 1.0, 0.0),
            orientation: Quat::IDENTITY,
            flags: 0,
            num_children: 0,
        },
    ];
    chunk.influences = (0..4)
        .map(|i| {
            vec![BoneInfluence {
                bone_index: if i < 2 { 0 } else { 1 },
                weight: 1.0,
            }]
        })
        .collect();
    chunk
}

/// Clip over ["root", "limb"] with actions "walk" (2 frames) and "idle"
/// (1 frame). Key translations encode `frame * 10 + bone` in x so tests
/// can spot-check slicing.
pub(crate) fn two_action_clip() -> AnimationClip {
    let bone_names = vec!["root".to_string(), "limb".to_string()];
    let action = |name: &str, frames: usize| Action {
        name: name.to_string(),
        group: String::new(),
        frame_count: frames,
        rate: 30.0,
        keys: (0..frames)
            .flat_map(|frame| {
                (0..bone_names.len()).map(move |bone| BoneKey {
                    translation: Vec3::new((frame * 10 + bone) as f32, 0.0, 0.0),
                    ..BoneKey::default()
                })
            })
            .collect(),
    };
    let actions = vec![action("walk", 2), action("idle", 1)];
    AnimationClip {
        bone_names,
        actions,
    }
}

pub(crate) fn mesh_source(name: &str) -> MeshSource {
    MeshSource {
        name: name.to_string(),
        path: format!("{name}.psk").into(),
        texture_path: None,
        material_file: None,
    }
}

pub(crate) fn animation_source(name: &str, layer: ClipLayer) -> AnimationSource {
    AnimationSource {
        name: name.to_string(),
        path: format!("{name}.psa").into(),
        layer,
        use_translation: true,
    }
}
