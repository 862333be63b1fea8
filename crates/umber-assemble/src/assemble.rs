//! Assembly of one build-plan entry
//!
//! Loads and decodes every referenced file, merges the mesh chunks,
//! finalizes the skeleton and binds the animations. Decode failures
//! and an unresolvable root abort the entry; everything else degrades
//! into diagnostics.

use crate::binding::{bind_clip, PrimaryShape};
use crate::merge::{merge_chunks, MergeResult};
use crate::model::{AssembledModel, SceneSkeleton};
use crate::skeleton::finalize_skeleton;
use crate::source::AssetSource;
use umber_core::{ActionFilters, Diagnostics, Result};
use umber_format::{decode_animation, decode_mesh, MeshChunk};
use umber_graph::{BuildPlanEntry, MeshSource};

/// Assemble one entry of a build plan into a scene model.
///
/// Diagnostics are returned even on success; an `Err` means the entry
/// produced nothing usable.
pub fn assemble(
    entry: &BuildPlanEntry,
    source: &dyn AssetSource,
    filters: &ActionFilters,
) -> Result<(AssembledModel, Diagnostics)> {
    let mut diags = Diagnostics::new();

    let mut chunks: Vec<(MeshSource, MeshChunk)> = Vec::with_capacity(entry.meshes.len());
    for mesh_source in &entry.meshes {
        log::debug!(
            "entry {:?}: decoding mesh {}",
            entry.name,
            mesh_source.path.display()
        );
        let bytes = source.load(&mesh_source.path)?;
        let chunk = decode_mesh(&bytes)?;
        chunks.push((mesh_source.clone(), chunk));
    }

    let MergeResult { mut mesh, bones } = merge_chunks(&chunks, entry.settings.axis, &mut diags);

    let skeleton = if entry.build_skeleton && !bones.is_empty() {
        let (skeleton, bone_map) = finalize_skeleton(bones, entry.settings.root)?;
        for influence in mesh.influences.iter_mut().flatten() {
            influence.bone_index = bone_map[influence.bone_index as usize] as u32;
        }
        Some(skeleton)
    } else {
        // mesh-only entries carry no weights into the scene
        mesh.influences.clear();
        None
    };

    let mut tracks = Vec::new();
    if !entry.animations.is_empty() {
        let unbound = SceneSkeleton::default();
        let bind_target = skeleton.as_ref().unwrap_or(&unbound);
        let mut primary: Option<PrimaryShape> = None;
        for anim_source in &entry.animations {
            log::debug!(
                "entry {:?}: decoding animation {}",
                entry.name,
                anim_source.path.display()
            );
            let bytes = source.load(&anim_source.path)?;
            let clip = decode_animation(&bytes, &mut diags)?;
            tracks.extend(bind_clip(
                &clip,
                anim_source,
                bind_target,
                filters,
                &mut primary,
                &mut diags,
            ));
        }
    }

    Ok((
        AssembledModel {
            name: entry.name.clone(),
            mesh,
            skeleton,
            tracks,
        },
        diags,
    ))
}
