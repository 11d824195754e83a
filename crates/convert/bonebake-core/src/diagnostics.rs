//! Recovered, per-item conversion problems.
//!
//! Every component that can skip an item takes a `&mut Diagnostics` (or returns
//! one) instead of logging into shared state. Pushing a warning also forwards
//! it to the `log` facade.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Parent name matched no earlier bone; the bone was anchored to the root.
    UnresolvedParent { bone: String, parent: String },
    /// A later bone reused an earlier bone's name and now shadows it in lookups.
    DuplicateBoneName { bone: String },
    /// Attachment references a sprite absent from the atlas; it was skipped.
    MissingSlice { bone: String, attachment: String },
    /// Track references a bone absent from the armature; the track was skipped.
    UnknownTrackBone { animation: String, bone: String },
    /// Track has no keyframes; its curves are empty.
    EmptyTrack { animation: String, bone: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedParent { bone, parent } => write!(
                f,
                "bone '{bone}' names unknown parent '{parent}'; attached to root"
            ),
            Warning::DuplicateBoneName { bone } => {
                write!(f, "duplicate bone name '{bone}'; last declaration wins")
            }
            Warning::MissingSlice { bone, attachment } => write!(
                f,
                "attachment '{attachment}' on bone '{bone}' has no atlas slice; skipped"
            ),
            Warning::UnknownTrackBone { animation, bone } => write!(
                f,
                "animation '{animation}' animates unknown bone '{bone}'; track skipped"
            ),
            Warning::EmptyTrack { animation, bone } => {
                write!(f, "animation '{animation}' has no keyframes for bone '{bone}'")
            }
        }
    }
}

/// Ordered list of warnings collected during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Append warnings that were already logged (e.g. by a worker).
    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }
}
