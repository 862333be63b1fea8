//! Shared hand-built fixtures for decoder tests

use crate::types::{
    Action, AnimationClip, Bone, BoneInfluence, BoneKey, Face, MaterialEntry, MeshChunk, Wedge,
};
use glam::{Quat, Vec3};

/// A quad: 4 points, 4 wedges, 2 triangles, 1 material, no skeleton
pub(crate) fn simple_mesh() -> MeshChunk {
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
                uv: [i as f32 * 0.25, 1.0 - i as f32 * 0.25],
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
            name: "body_mat".to_string(),
            texture_index: 0,
            poly_flags: 0,
        }],
        ..Default::default()
    }
}

/// The quad with a two-bone skeleton and one influence per point
pub(crate) fn simple_skinned_mesh() -> MeshChunk {
    let mut mesh = simple_mesh();
    mesh.bones = vec![
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
    mesh.influences = (0..4)
        .map(|i| {
            vec![BoneInfluence {
                bone_index: (i % 2) as u32,
                weight: 1.0,
            }]
        })
        .collect();
    mesh
}

/// Two bones, two actions ("walk": 2 frames, "idle": 1 frame).
/// Each key encodes `frame * 10 + bone_index` into translation.x so
/// tests can verify key addressing.
pub(crate) fn simple_clip() -> AnimationClip {
    let bone_names = vec!["root".to_string(), "limb".to_string()];
    let key = |frame: usize, bone: usize| BoneKey {
        translation: Vec3::new((frame * 10 + bone) as f32, 0.0, 0.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        time: 1.0,
    };

    AnimationClip {
        bone_names,
        actions: vec![
            Action {
                name: "walk".to_string(),
                group: "default".to_string(),
                frame_count: 2,
                rate: 30.0,
                keys: vec![key(0, 0), key(0, 1), key(1, 0), key(1, 1)],
            },
            Action {
                name: "idle".to_string(),
                group: "default".to_string(),
                frame_count: 1,
                rate: 30.0,
                keys: vec![key(0, 0), key(0, 1)],
            },
        ],
    }
}
