//! Non-fatal diagnostics collected while an entry is assembled
//!
//! The pipeline never aborts on partially-bad input; it records what it
//! had to skip or reconcile and keeps going. All diagnostics for a run
//! are returned alongside the assembled results so an adapter can show
//! the full trace instead of stopping at the first issue.

use std::fmt;

/// One non-fatal issue found during decoding or assembly
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A clip references a bone the merged skeleton does not have;
    /// that bone's keys are dropped for every action in the clip.
    MissingBone { clip: String, bone: String },

    /// Two merged mesh chunks define the same bone name with different
    /// parents or bind transforms. The first definition wins.
    BoneConflict { bone: String },

    /// An additive clip disagrees with the primary on frame count or
    /// bone order. The clip is still bound as-is.
    AdditiveMismatch { action: String, detail: String },

    /// An action's key slice ran past the end of the key stream and the
    /// action was dropped. Other actions in the same file still decode.
    TruncatedAction {
        action: String,
        needed: usize,
        available: usize,
    },

    /// A scale-key stream was present but did not line up with the key
    /// stream, so it was ignored.
    ScaleKeysIgnored { detail: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingBone { clip, bone } => {
                write!(f, "clip '{clip}': bone '{bone}' not in skeleton, keys dropped")
            }
            Diagnostic::BoneConflict { bone } => {
                write!(f, "bone '{bone}' redefined with different structure, first wins")
            }
            Diagnostic::AdditiveMismatch { action, detail } => {
                write!(f, "additive action '{action}' mismatches primary: {detail}")
            }
            Diagnostic::TruncatedAction {
                action,
                needed,
                available,
            } => write!(
                f,
                "action '{action}' truncated ({needed} keys declared, {available} available), dropped"
            ),
            Diagnostic::ScaleKeysIgnored { detail } => {
                write!(f, "scale keys ignored: {detail}")
            }
        }
    }
}

/// Ordered collection of diagnostics for one decode or assembly pass
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, mirroring it to the log
    pub fn push(&mut self, diag: Diagnostic) {
        log::warn!("{diag}");
        self.items.push(diag);
    }

    /// Move all diagnostics out of `other` into this collection
    pub fn absorb(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
