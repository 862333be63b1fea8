//! Animation binding
//!
//! Matches a decoded clip's bone list against the finalized skeleton
//! by exact name, materializes per-bone curves for every surviving
//! action, and places each as a muted track. Filtered actions are
//! dropped before binding so they produce neither tracks nor warnings.

use crate::model::{BoneCurve, BoundTrack, SceneSkeleton, TRACK_START_FRAME};
use umber_core::{ActionFilters, Diagnostic, Diagnostics};
use umber_format::AnimationClip;
use umber_graph::{AnimationSource, ClipLayer};

/// Shape of the entry's first surviving primary action, used to sanity
/// check additive clips layered on top of it
pub(crate) struct PrimaryShape {
    bone_names: Vec<String>,
    frame_count: usize,
}

pub(crate) fn bind_clip(
    clip: &AnimationClip,
    source: &AnimationSource,
    skeleton: &SceneSkeleton,
    filters: &ActionFilters,
    primary: &mut Option<PrimaryShape>,
    diags: &mut Diagnostics,
) -> Vec<BoundTrack> {
    let additive = source.layer == ClipLayer::Additive;

    // name match once per clip; every miss is reported exactly once
    let binding: Vec<Option<usize>> = clip
        .bone_names
        .iter()
        .map(|name| {
            let index = skeleton.index_of(name);
            if index.is_none() {
                diags.push(Diagnostic::MissingBone {
                    clip: source.name.clone(),
                    bone: name.clone(),
                });
            }
            index
        })
        .collect();

    if additive {
        match primary.as_ref() {
            Some(shape) if shape.bone_names != clip.bone_names => {
                diags.push(Diagnostic::AdditiveMismatch {
                    action: source.name.clone(),
                    detail: "bone list differs from the primary clip".to_string(),
                });
            }
            None => {
                diags.push(Diagnostic::AdditiveMismatch {
                    action: source.name.clone(),
                    detail: "no primary clip precedes this additive clip".to_string(),
                });
            }
            _ => {}
        }
    }

    let bone_count = clip.bone_names.len();
    let mut tracks = Vec::new();

    for action in &clip.actions {
        if filters.is_skipped(&action.name) {
            log::debug!("action {:?} is on the skip list, dropping", action.name);
            continue;
        }

        if additive {
            if let Some(shape) = primary.as_ref() {
                if action.frame_count != shape.frame_count {
                    diags.push(Diagnostic::AdditiveMismatch {
                        action: action.name.clone(),
                        detail: format!(
                            "{} frames layered over a {}-frame primary",
                            action.frame_count, shape.frame_count
                        ),
                    });
                }
            }
        } else if primary.is_none() {
            *primary = Some(PrimaryShape {
                bone_names: clip.bone_names.clone(),
                frame_count: action.frame_count,
            });
        }

        let mut curves = Vec::new();
        for (clip_bone, name) in clip.bone_names.iter().enumerate() {
            let Some(bone_index) = binding[clip_bone] else {
                continue;
            };
            let mut rotations = Vec::with_capacity(action.frame_count);
            let mut translations = source
                .use_translation
                .then(|| Vec::with_capacity(action.frame_count));
            let mut scales = Vec::with_capacity(action.frame_count);
            for frame in 0..action.frame_count {
                let key = action.key(frame, bone_count, clip_bone);
                rotations.push(key.rotation);
                if let Some(t) = translations.as_mut() {
                    t.push(key.translation);
                }
                scales.push(key.scale);
            }
            curves.push(BoneCurve {
                bone_name: name.clone(),
                bone_index,
                rotations,
                translations,
                scales,
            });
        }

        tracks.push(BoundTrack {
            action: action.name.clone(),
            start_frame: TRACK_START_FRAME,
            muted: true,
            additive,
            frame_count: action.frame_count,
            rate: action.rate,
            curves,
        });
    }

    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{animation_source, two_action_clip};
    use crate::model::SceneBone;
    use glam::{Quat, Vec3};

    fn two_bone_skeleton() -> SceneSkeleton {
        SceneSkeleton {
            bones: vec![
                SceneBone {
                    name: "root".to_string(),
                    parent: None,
                    position: Vec3::ZERO,
                    orientation: Quat::IDENTITY,
                },
                SceneBone {
                    name: "limb".to_string(),
                    parent: Some(0),
                    position: Vec3::new(0.0, 1.0, 0.0),
                    orientation: Quat::IDENTITY,
                },
            ],
        }
    }

    #[test]
    fn every_surviving_action_becomes_a_muted_track_at_frame_one() {
        let clip = two_action_clip();
        let source = animation_source("clip", ClipLayer::Primary);
        let skeleton = two_bone_skeleton();
        let mut primary = None;
        let mut diags = Diagnostics::new();

        let tracks = bind_clip(
            &clip,
            &source,
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );

        assert!(diags.is_empty());
        assert_eq!(tracks.len(), 2);
        for track in &tracks {
            assert!(track.muted);
            assert!(!track.additive);
            assert_eq!(track.start_frame, TRACK_START_FRAME);
            assert_eq!(track.curves.len(), 2);
        }
        assert_eq!(tracks[0].action, "walk");
        assert_eq!(tracks[0].frame_count, 2);
    }

    #[test]
    fn curves_carry_per_frame_keys_in_clip_bone_order() {
        let clip = two_action_clip();
        let source = animation_source("clip", ClipLayer::Primary);
        let skeleton = two_bone_skeleton();
        let mut primary = None;
        let mut diags = Diagnostics::new();

        let tracks = bind_clip(
            &clip,
            &source,
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );

        let limb = &tracks[0].curves[1];
        assert_eq!(limb.bone_name, "limb");
        assert_eq!(limb.bone_index, 1);
        let translations = limb.translations.as_ref().unwrap();
        assert_eq!(translations[0].x, 1.0);
        assert_eq!(translations[1].x, 11.0);
    }

    #[test]
    fn filtered_actions_produce_no_track_and_no_warnings() {
        let clip = two_action_clip();
        let source = animation_source("clip", ClipLayer::Primary);
        let mut filters = ActionFilters::default();
        filters.skip.insert("idle".to_string());
        let skeleton = two_bone_skeleton();
        let mut primary = None;
        let mut diags = Diagnostics::new();

        let tracks = bind_clip(&clip, &source, &skeleton, &filters, &mut primary, &mut diags);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].action, "walk");
        assert!(diags.is_empty());
    }

    #[test]
    fn missing_bones_warn_once_per_clip_and_bind_the_rest() {
        let clip = two_action_clip();
        let source = animation_source("clip", ClipLayer::Primary);
        let mut skeleton = two_bone_skeleton();
        skeleton.bones.truncate(1); // drop "limb"
        let mut primary = None;
        let mut diags = Diagnostics::new();

        let tracks = bind_clip(
            &clip,
            &source,
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );

        // one warning for the clip, not one per action
        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingBone { bone, .. } if bone == "limb")));
        assert_eq!(tracks.len(), 2);
        assert!(tracks
            .iter()
            .all(|t| t.curves.len() == 1 && t.curves[0].bone_name == "root"));
    }

    #[test]
    fn translation_curves_drop_when_disabled() {
        let clip = two_action_clip();
        let mut source = animation_source("clip", ClipLayer::Primary);
        source.use_translation = false;
        let skeleton = two_bone_skeleton();
        let mut primary = None;
        let mut diags = Diagnostics::new();

        let tracks = bind_clip(
            &clip,
            &source,
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );

        assert!(tracks
            .iter()
            .flat_map(|t| &t.curves)
            .all(|c| c.translations.is_none()));
        assert!(tracks
            .iter()
            .flat_map(|t| &t.curves)
            .all(|c| c.rotations.len() == 2 || c.rotations.len() == 1));
    }

    #[test]
    fn additive_clip_with_mismatched_frame_count_warns_but_still_binds() {
        let clip = two_action_clip();
        let skeleton = two_bone_skeleton();
        let mut primary = None;
        let mut diags = Diagnostics::new();

        // the 2-frame "walk" action establishes the primary shape
        bind_clip(
            &clip,
            &animation_source("base", ClipLayer::Primary),
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );
        assert!(diags.is_empty());

        let tracks = bind_clip(
            &clip,
            &animation_source("layer", ClipLayer::Additive),
            &skeleton,
            &ActionFilters::default(),
            &mut primary,
            &mut diags,
        );

        // "idle" has 1 frame against the 2-frame primary
        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .any(|d| matches!(d, Diagnostic::AdditiveMismatch { action, .. } if action == "idle")));
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.additive));
    }
}
