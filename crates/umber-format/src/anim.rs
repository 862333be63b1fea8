//! Animation file decoder
//!
//! Chunks: `ANIMHEAD`, the reference bone-name table (`BONENAMES`),
//! per-action info records (`ANIMINFO`), the flat key stream
//! (`ANIMKEYS`) and optional per-frame scale keys (`SCALEKEYS`).
//! Actions slice the flat key stream in declared order, each taking
//! `total_bones * num_raw_frames` consecutive keys.

use crate::mesh::read_bones;
use crate::reader::Reader;
use crate::types::{Action, AnimationClip, BoneKey};
use glam::{Quat, Vec3};
use umber_core::{Diagnostic, Diagnostics, Result, UmberError};

const BONE_SIZE: usize = 120;
const ACTION_INFO_SIZE: usize = 168;
const KEY_SIZE: usize = 32;
const SCALE_KEY_SIZE: usize = 16;

struct ActionInfo {
    name: String,
    group: String,
    total_bones: usize,
    rate: f32,
    frame_count: usize,
}

/// Decode an animation file into an [`AnimationClip`].
///
/// A truncated action is dropped with a diagnostic; the remaining
/// actions in the same file still decode. Structural problems
/// (size/count mismatch, missing required chunks, a bone count that
/// disagrees with the reference bone table) fail the whole file.
pub fn decode_animation(bytes: &[u8], diags: &mut Diagnostics) -> Result<AnimationClip> {
    let mut r = Reader::new(bytes);

    // older exporters reuse the mesh header id for animation files
    let head = r
        .read_chunk_header()
        .filter(|h| h.id == "ANIMHEAD" || h.id == "ACTRHEAD")
        .ok_or_else(|| UmberError::malformed("ANIMHEAD", "missing file header"))?;
    r.skip_chunk(&head)?;

    let mut bone_names: Vec<String> = Vec::new();
    let mut infos: Vec<ActionInfo> = Vec::new();
    let mut keys: Vec<BoneKey> = Vec::new();
    let mut scale_keys: Vec<(Vec3, f32)> = Vec::new();
    let mut seen_bones = false;
    let mut seen_infos = false;

    while let Some(header) = r.read_chunk_header() {
        match header.id.as_str() {
            "BONENAMES" => {
                let payload = r.chunk_payload(&header, BONE_SIZE)?;
                bone_names = read_bones(payload)?.into_iter().map(|b| b.name).collect();
                seen_bones = true;
            }
            "ANIMINFO" => {
                let payload = r.chunk_payload(&header, ACTION_INFO_SIZE)?;
                infos = read_action_infos(payload);
                seen_infos = true;
            }
            "ANIMKEYS" => {
                let payload = r.chunk_payload(&header, KEY_SIZE)?;
                keys = read_keys(payload);
            }
            "SCALEKEYS" => {
                let payload = r.chunk_payload(&header, SCALE_KEY_SIZE)?;
                scale_keys = read_scale_keys(payload);
            }
            _ => r.skip_chunk(&header)?,
        }
    }

    if !seen_bones {
        return Err(UmberError::malformed("BONENAMES", "required chunk missing"));
    }
    if !seen_infos {
        return Err(UmberError::malformed("ANIMINFO", "required chunk missing"));
    }

    fold_scale_keys(&mut keys, &scale_keys, diags);

    let mut actions = Vec::with_capacity(infos.len());
    let mut offset = 0usize;
    for info in infos {
        if info.total_bones != bone_names.len() {
            return Err(UmberError::malformed(
                "ANIMINFO",
                format!(
                    "action '{}' declares {} bones but the bone table has {}",
                    info.name,
                    info.total_bones,
                    bone_names.len()
                ),
            ));
        }
        if info.frame_count == 0 {
            log::debug!("action '{}' has no frames, skipped", info.name);
            continue;
        }

        let needed = info.total_bones * info.frame_count;
        if offset + needed > keys.len() {
            diags.push(Diagnostic::TruncatedAction {
                action: info.name.clone(),
                needed,
                available: keys.len().saturating_sub(offset),
            });
            offset += needed;
            continue;
        }

        actions.push(Action {
            name: info.name,
            group: info.group,
            frame_count: info.frame_count,
            rate: info.rate,
            keys: keys[offset..offset + needed].to_vec(),
        });
        offset += needed;
    }

    Ok(AnimationClip {
        bone_names,
        actions,
    })
}

fn read_action_infos(payload: &[u8]) -> Vec<ActionInfo> {
    let mut r = Reader::new(payload);
    let mut infos = Vec::with_capacity(payload.len() / ACTION_INFO_SIZE);
    while r.remaining() >= ACTION_INFO_SIZE {
        let name = r.read_fixed_str(64).unwrap();
        let group = r.read_fixed_str(64).unwrap();
        let total_bones = r.read_i32().unwrap().max(0) as usize;
        let _root_include = r.read_i32().unwrap();
        let _key_compression_style = r.read_i32().unwrap();
        let _key_quotum = r.read_i32().unwrap();
        let _key_reduction = r.read_f32().unwrap();
        let _track_time = r.read_f32().unwrap();
        let rate = r.read_f32().unwrap();
        let _start_bone = r.read_i32().unwrap();
        let _first_raw_frame = r.read_i32().unwrap();
        let frame_count = r.read_i32().unwrap().max(0) as usize;
        infos.push(ActionInfo {
            name,
            group,
            total_bones,
            rate,
            frame_count,
        });
    }
    infos
}

fn read_keys(payload: &[u8]) -> Vec<BoneKey> {
    let mut r = Reader::new(payload);
    let mut keys = Vec::with_capacity(payload.len() / KEY_SIZE);
    while r.remaining() >= KEY_SIZE {
        let px = r.read_f32().unwrap();
        let py = r.read_f32().unwrap();
        let pz = r.read_f32().unwrap();
        let qx = r.read_f32().unwrap();
        let qy = r.read_f32().unwrap();
        let qz = r.read_f32().unwrap();
        let qw = r.read_f32().unwrap();
        let time = r.read_f32().unwrap();
        keys.push(BoneKey {
            translation: Vec3::new(px, py, pz),
            rotation: Quat::from_xyzw(qx, qy, qz, qw),
            scale: Vec3::ONE,
            time,
        });
    }
    keys
}

fn read_scale_keys(payload: &[u8]) -> Vec<(Vec3, f32)> {
    let mut r = Reader::new(payload);
    let mut keys = Vec::with_capacity(payload.len() / SCALE_KEY_SIZE);
    while r.remaining() >= SCALE_KEY_SIZE {
        let x = r.read_f32().unwrap();
        let y = r.read_f32().unwrap();
        let z = r.read_f32().unwrap();
        let time = r.read_f32().unwrap();
        keys.push((Vec3::new(x, y, z), time));
    }
    keys
}

/// Fold a scale-key stream into the main keys when it lines up
/// one-to-one, otherwise ignore it with a diagnostic
fn fold_scale_keys(keys: &mut [BoneKey], scale_keys: &[(Vec3, f32)], diags: &mut Diagnostics) {
    if scale_keys.is_empty() {
        return;
    }
    if scale_keys.len() != keys.len() {
        diags.push(Diagnostic::ScaleKeysIgnored {
            detail: format!(
                "{} scale keys against {} animation keys",
                scale_keys.len(),
                keys.len()
            ),
        });
        return;
    }
    for (key, (scale, _)) in keys.iter_mut().zip(scale_keys) {
        key.scale = *scale;
    }
}
