//! Mesh-chunk merging
//!
//! Chunks are concatenated into a single pool. Point and wedge indices
//! are re-based, material tables are merged by name with slot remap,
//! and bone tables are unified by name: the first occurrence defines
//! parent and bind pose, later name matches are checked and ignored,
//! and a structural mismatch is recorded as a bone conflict.

use crate::model::{AssembledMesh, MaterialSlot, SceneBone, SceneFace};
use std::collections::HashMap;
use umber_core::{AxisConversion, Diagnostic, Diagnostics};
use umber_format::{BoneInfluence, MeshChunk, Wedge};
use umber_graph::MeshSource;

pub(crate) struct MergeResult {
    pub mesh: AssembledMesh,
    /// Bones unified by name, before root handling
    pub bones: Vec<SceneBone>,
}

const BIND_POSE_EPSILON: f32 = 1e-4;

pub(crate) fn merge_chunks(
    sources: &[(MeshSource, MeshChunk)],
    axis: AxisConversion,
    diags: &mut Diagnostics,
) -> MergeResult {
    let mut mesh = AssembledMesh::default();
    let mut bones: Vec<SceneBone> = Vec::new();
    let mut bone_index_by_name: HashMap<String, usize> = HashMap::new();
    let mut slot_by_name: HashMap<String, usize> = HashMap::new();

    for (source, chunk) in sources {
        let point_offset = mesh.points.len() as u32;
        let wedge_offset = mesh.wedges.len() as u32;

        mesh.points.extend(chunk.points.iter().map(|&p| axis.apply(p)));
        mesh.wedges.extend(chunk.wedges.iter().map(|w| Wedge {
            point_index: w.point_index + point_offset,
            ..*w
        }));

        let slot_map: Vec<usize> = chunk
            .materials
            .iter()
            .map(|m| {
                *slot_by_name.entry(m.name.clone()).or_insert_with(|| {
                    mesh.materials.push(MaterialSlot {
                        name: m.name.clone(),
                        texture_path: source.texture_path.clone(),
                        material_file: source.material_file.clone(),
                    });
                    mesh.materials.len() - 1
                })
            })
            .collect();

        // decoding validated face material indices against the chunk's
        // material table, so the slot map lookup cannot miss
        mesh.faces.extend(chunk.faces.iter().map(|f| SceneFace {
            wedges: [
                f.wedges[0] + wedge_offset,
                f.wedges[1] + wedge_offset,
                f.wedges[2] + wedge_offset,
            ],
            material_slot: slot_map[f.material_index as usize],
            smoothing_mask: f.smoothing_mask,
        }));

        let chunk_bone_map = merge_bones(chunk, axis, &mut bones, &mut bone_index_by_name, diags);

        if !chunk.influences.is_empty() {
            // earlier chunks without weights contribute empty lists
            mesh.influences.resize(point_offset as usize, Vec::new());
            for list in &chunk.influences {
                mesh.influences.push(
                    list.iter()
                        .map(|inf| BoneInfluence {
                            bone_index: chunk_bone_map[inf.bone_index as usize] as u32,
                            weight: inf.weight,
                        })
                        .collect(),
                );
            }
        }
    }

    if !mesh.influences.is_empty() {
        mesh.influences.resize(mesh.points.len(), Vec::new());
    }

    MergeResult { mesh, bones }
}

/// Unify one chunk's bone table into the merged set, returning the
/// chunk-index to merged-index map
fn merge_bones(
    chunk: &MeshChunk,
    axis: AxisConversion,
    bones: &mut Vec<SceneBone>,
    bone_index_by_name: &mut HashMap<String, usize>,
    diags: &mut Diagnostics,
) -> Vec<usize> {
    let mut chunk_bone_map = Vec::with_capacity(chunk.bones.len());
    let mut is_new = Vec::with_capacity(chunk.bones.len());

    for bone in &chunk.bones {
        match bone_index_by_name.get(&bone.name) {
            Some(&existing) => {
                chunk_bone_map.push(existing);
                is_new.push(false);
            }
            None => {
                bones.push(SceneBone {
                    name: bone.name.clone(),
                    parent: None, // fixed up below once the whole table is mapped
                    position: axis.apply(bone.position),
                    orientation: bone.orientation,
                });
                bone_index_by_name.insert(bone.name.clone(), bones.len() - 1);
                chunk_bone_map.push(bones.len() - 1);
                is_new.push(true);
            }
        }
    }

    for (i, bone) in chunk.bones.iter().enumerate() {
        let merged_idx = chunk_bone_map[i];
        if is_new[i] {
            bones[merged_idx].parent = bone.parent.map(|p| chunk_bone_map[p]);
            continue;
        }

        // name collision with an earlier chunk: first definition wins,
        // but a structurally different redefinition is worth flagging
        let incoming_parent = bone.parent.map(|p| chunk.bones[p].name.as_str());
        let existing_parent = bones[merged_idx]
            .parent
            .map(|pi| bones[pi].name.clone());
        let position = axis.apply(bone.position);
        let same_parent = incoming_parent == existing_parent.as_deref();
        let same_pose = (position - bones[merged_idx].position).length() < BIND_POSE_EPSILON
            && bone.orientation.dot(bones[merged_idx].orientation).abs()
                > 1.0 - BIND_POSE_EPSILON;
        if !(same_parent && same_pose) {
            diags.push(Diagnostic::BoneConflict {
                bone: bone.name.clone(),
            });
        }
    }

    chunk_bone_map
}
