//! Inversion tracking: when does a bone's authored scale go negative?
//!
//! A mirrored bone flips the apparent rotation direction of everything below
//! it, so the baker consults this timeline for every ancestor of the bone it
//! bakes. The timeline must be complete for the whole animation first: a
//! keyframe looks up the latest flag at or before its frame, which may come
//! from any keyframe of the ancestor's track.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::data::{AnimationDoc, BoneTrack};

/// Sparse per-bone `frame -> mirrored` flags for one animation.
/// Bones that are never mirrored have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InversionTimeline {
    bones: HashMap<String, BTreeMap<u32, bool>>,
}

impl InversionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every track of `anim`.
    pub fn track(anim: &AnimationDoc) -> Self {
        let mut timeline = Self::new();
        for track in &anim.tracks {
            timeline.record_track(track);
        }
        timeline
    }

    /// Record one bone's flags. A mirrored keyframe always sets its frame to
    /// `true`; an unmirrored one only fills a frame not yet recorded. Tracks
    /// without any mirrored keyframe are dropped. A second track for the
    /// same bone replaces the first.
    pub fn record_track(&mut self, track: &BoneTrack) {
        let mut flags = BTreeMap::new();
        let mut mirrored = false;
        for key in &track.keyframes {
            if key.is_mirrored() {
                flags.insert(key.frame_index, true);
                mirrored = true;
            } else {
                flags.entry(key.frame_index).or_insert(false);
            }
        }
        if mirrored {
            self.bones.insert(track.bone.clone(), flags);
        }
    }

    /// Record explicit flags for `bone`, later pairs overwriting earlier ones.
    pub fn record_flags(&mut self, bone: &str, flags: impl IntoIterator<Item = (u32, bool)>) {
        self.bones.entry(bone.to_string()).or_default().extend(flags);
    }

    pub fn contains(&self, bone: &str) -> bool {
        self.bones.contains_key(bone)
    }

    /// Flag of the latest recorded frame `<= frame`, or `false`.
    pub fn query(&self, bone: &str, frame: u32) -> bool {
        self.bones
            .get(bone)
            .and_then(|flags| flags.range(..=frame).next_back())
            .map(|(_, mirrored)| *mirrored)
            .unwrap_or(false)
    }

    /// Number of bones with a timeline.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
