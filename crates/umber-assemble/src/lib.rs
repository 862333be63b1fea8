//! Umber Assemble - executes a build plan
//!
//! For each build-plan entry this crate decodes the referenced files,
//! merges mesh chunks into one vertex/triangle/material pool, merges
//! and finalizes the skeleton, binds animation clips by bone name and
//! emits track placements. Partially-bad input degrades with
//! diagnostics; only decode failures and an unresolvable root bone
//! abort an entry, and a failed entry never aborts its siblings.

mod assemble;
mod binding;
#[cfg(test)]
mod fixtures;
mod merge;
mod model;
mod runner;
mod skeleton;
mod source;

pub use assemble::assemble;
pub use model::{
    AssembledMesh, AssembledModel, BoneCurve, BoundTrack, MaterialSlot, SceneBone, SceneFace,
    SceneSkeleton, SYNTHETIC_ROOT_NAME, TRACK_START_FRAME,
};
pub use runner::{run, EntryOutcome, RunReport};
pub use source::{AssetSource, FileSource, MemorySource};
