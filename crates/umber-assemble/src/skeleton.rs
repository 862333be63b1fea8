//! Root handling for the merged skeleton
//!
//! A finalized skeleton always has exactly one root. A lone root is
//! kept as-is under keep-root; under synthetic-root it is replaced by
//! a generated root and its bind transform folded into its former
//! children. Multiple merged roots always get a generated root above
//! them, whatever the setting says.

use crate::model::{SceneBone, SceneSkeleton, SYNTHETIC_ROOT_NAME};
use glam::{Quat, Vec3};
use umber_core::{Result, RootHandling, UmberError};

/// Returns the finalized skeleton and the old-index to new-index map
/// used to rebind influences.
pub(crate) fn finalize_skeleton(
    bones: Vec<SceneBone>,
    root: RootHandling,
) -> Result<(SceneSkeleton, Vec<usize>)> {
    let roots: Vec<usize> = bones
        .iter()
        .enumerate()
        .filter(|(_, b)| b.parent.is_none())
        .map(|(i, _)| i)
        .collect();

    if roots.is_empty() {
        return Err(UmberError::Assembly(
            "merged skeleton has no root bone".to_string(),
        ));
    }

    if root == RootHandling::KeepRoot && roots.len() == 1 {
        let map = (0..bones.len()).collect();
        return Ok((SceneSkeleton { bones }, map));
    }

    // the discarded original root, if any; its children inherit its
    // bind transform so their world pose is unchanged
    let discard = (root == RootHandling::SyntheticRoot).then(|| roots[0]);
    let (fold_rot, fold_pos) = discard
        .map(|d| (bones[d].orientation, bones[d].position))
        .unwrap_or((Quat::IDENTITY, Vec3::ZERO));

    let mut map = vec![0usize; bones.len()];
    let mut next = 1; // slot 0 is the generated root
    for (i, slot) in map.iter_mut().enumerate() {
        if Some(i) == discard {
            *slot = 0;
        } else {
            *slot = next;
            next += 1;
        }
    }

    let mut out = Vec::with_capacity(next);
    out.push(SceneBone {
        name: SYNTHETIC_ROOT_NAME.to_string(),
        parent: None,
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    });
    for (i, bone) in bones.into_iter().enumerate() {
        if Some(i) == discard {
            continue;
        }
        let (parent, position, orientation) = match bone.parent {
            None => (Some(0), bone.position, bone.orientation),
            Some(p) if Some(p) == discard => (
                Some(0),
                fold_rot * bone.position + fold_pos,
                fold_rot * bone.orientation,
            ),
            Some(p) => (Some(map[p]), bone.position, bone.orientation),
        };
        out.push(SceneBone {
            name: bone.name,
            parent,
            position,
            orientation,
        });
    }

    Ok((SceneSkeleton { bones: out }, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn bone(name: &str, parent: Option<usize>, position: Vec3, orientation: Quat) -> SceneBone {
        SceneBone {
            name: name.to_string(),
            parent,
            position,
            orientation,
        }
    }

    fn chain() -> Vec<SceneBone> {
        vec![
            bone(
                "pelvis",
                None,
                Vec3::new(1.0, 0.0, 0.0),
                Quat::from_rotation_z(FRAC_PI_2),
            ),
            bone("spine", Some(0), Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
            bone("head", Some(1), Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY),
        ]
    }

    #[test]
    fn lone_root_is_kept_verbatim() {
        let bones = chain();
        let (skeleton, map) = finalize_skeleton(bones, RootHandling::KeepRoot).unwrap();

        assert_eq!(skeleton.bones.len(), 3);
        assert_eq!(skeleton.bones[0].name, "pelvis");
        assert_eq!(skeleton.root_index(), Some(0));
        assert_eq!(map, vec![0, 1, 2]);
    }

    #[test]
    fn synthetic_root_replaces_and_folds_the_original() {
        let (skeleton, map) = finalize_skeleton(chain(), RootHandling::SyntheticRoot).unwrap();

        assert_eq!(skeleton.bones.len(), 3);
        assert_eq!(skeleton.bones[0].name, SYNTHETIC_ROOT_NAME);
        assert_eq!(skeleton.bones[0].parent, None);

        // the old root's 90-degree z rotation and (1,0,0) offset land on
        // its former child: (0,1,0) rotates to (-1,0,0), then offsets to
        // the origin
        let spine = &skeleton.bones[1];
        assert_eq!(spine.name, "spine");
        assert_eq!(spine.parent, Some(0));
        assert!(spine.position.length() < 1e-5);
        assert!(spine.orientation.dot(Quat::from_rotation_z(FRAC_PI_2)).abs() > 1.0 - 1e-5);

        // grandchildren keep their local transforms, remapped parents
        let head = &skeleton.bones[2];
        assert_eq!(head.parent, Some(1));
        assert_eq!(head.position, Vec3::new(0.0, 2.0, 0.0));

        // old root index maps onto the generated root
        assert_eq!(map, vec![0, 1, 2]);
    }

    #[test]
    fn multiple_roots_get_a_generated_root_even_under_keep_root() {
        let bones = vec![
            bone("left", None, Vec3::ZERO, Quat::IDENTITY),
            bone("right", None, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY),
        ];
        let (skeleton, map) = finalize_skeleton(bones, RootHandling::KeepRoot).unwrap();

        assert_eq!(skeleton.bones.len(), 3);
        assert_eq!(skeleton.bones[0].name, SYNTHETIC_ROOT_NAME);
        assert_eq!(skeleton.bones[1].parent, Some(0));
        assert_eq!(skeleton.bones[2].parent, Some(0));
        assert_eq!(map, vec![1, 2]);
    }

    #[test]
    fn rootless_bone_set_is_fatal() {
        let bones = vec![
            bone("a", Some(1), Vec3::ZERO, Quat::IDENTITY),
            bone("b", Some(0), Vec3::ZERO, Quat::IDENTITY),
        ];
        let err = finalize_skeleton(bones, RootHandling::KeepRoot).unwrap_err();
        assert!(matches!(err, UmberError::Assembly(_)));
    }
}
