//! Baking API: turn one animation's bone tracks into curves.
//!
//! Each keyframe of a track produces one key on the five bone curves
//! (position x/y, scale x/y, rotation z). Each resolved attachment of the bone
//! also gets three position curves on its sprite node, plus a visibility step
//! curve. Attachment positions go through a [`HeldChannel`], so a change of
//! draw depth jumps within one frame instead of sliding across the whole gap
//! between keyframes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::armature::{Armature, Attachment};
use crate::config::ConvertConfig;
use crate::curve::{Curve, CurveBinding, CurveProperty, HeldChannel};
use crate::data::{AnimationDoc, BoneTrack};
use crate::diagnostics::{Diagnostics, Warning};
use crate::ids::BoneId;
use crate::inversion::InversionTimeline;

/// Curves produced for one track (or merged across tracks).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BakedCurveSet {
    pub bindings: Vec<CurveBinding>,
}

impl BakedCurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: CurveBinding) {
        self.bindings.push(binding);
    }

    pub fn extend(&mut self, other: BakedCurveSet) {
        self.bindings.extend(other.bindings);
    }

    /// First curve bound to `property` at `path`.
    pub fn get(&self, path: &str, property: CurveProperty) -> Option<&Curve> {
        self.bindings
            .iter()
            .find(|b| b.path == path && b.property == property)
            .map(|b| &b.curve)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurveBinding> {
        self.bindings.iter()
    }
}

/// Rotation sign for `bone` at `frame`: -1 when any strict ancestor is
/// mirrored at that frame, else 1. Nested mirrored ancestors do not cancel.
pub fn rotation_direction(
    armature: &Armature,
    bone: BoneId,
    timeline: &InversionTimeline,
    frame: u32,
) -> f32 {
    let mut direction = 1.0;
    for ancestor in armature.ancestors(bone) {
        if timeline.contains(&ancestor.name) && timeline.query(&ancestor.name, frame) {
            direction = -1.0;
        }
    }
    direction
}

struct AttachmentChannels<'a> {
    attachment: &'a Attachment,
    path: String,
    base: [f32; 3],
    x: HeldChannel,
    y: HeldChannel,
    z: HeldChannel,
    active: Curve,
}

/// Bake one bone track. `timeline` must already cover the whole animation.
///
/// Unknown bones yield an empty set and an `UnknownTrackBone` warning; a track
/// without keyframes yields empty curves and an `EmptyTrack` warning.
pub fn bake_track(
    armature: &Armature,
    timeline: &InversionTimeline,
    animation: &str,
    track: &BoneTrack,
    cfg: &ConvertConfig,
) -> (BakedCurveSet, Diagnostics) {
    let mut diag = Diagnostics::new();
    let Some(bone) = armature.find(&track.bone) else {
        diag.push(Warning::UnknownTrackBone {
            animation: animation.to_string(),
            bone: track.bone.clone(),
        });
        return (BakedCurveSet::new(), diag);
    };
    if track.keyframes.is_empty() {
        diag.push(Warning::EmptyTrack {
            animation: animation.to_string(),
            bone: track.bone.clone(),
        });
    }

    let sample_rate = cfg.effective_sample_rate();
    let n = track.keyframes.len();
    let mut pos_x = Curve::with_capacity(n);
    let mut pos_y = Curve::with_capacity(n);
    let mut scale_x = Curve::with_capacity(n);
    let mut scale_y = Curve::with_capacity(n);
    let mut rot_z = Curve::with_capacity(n);

    let mut channels: Vec<AttachmentChannels<'_>> = bone
        .attachments
        .iter()
        .filter_map(|attachment| {
            let sprite = attachment.sprite.as_ref()?;
            Some(AttachmentChannels {
                attachment,
                path: armature.sprite_path(bone.id, attachment),
                base: sprite.position,
                x: HeldChannel::new(sample_rate),
                y: HeldChannel::new(sample_rate),
                z: HeldChannel::new(sample_rate),
                active: Curve::with_capacity(n),
            })
        })
        .collect();

    for key in &track.keyframes {
        let time = cfg.frame_time(key.frame_index);

        let rest = &bone.rest.position;
        pos_x.push_linear(time, rest[0] + cfg.to_engine_units(key.position.x));
        pos_y.push_linear(time, rest[1] + cfg.to_engine_units(key.position.y));
        scale_x.push_linear(time, key.scale.x);
        scale_y.push_linear(time, key.scale.y);

        let direction = rotation_direction(armature, bone.id, timeline, key.frame_index);
        if direction < 0.0 {
            log::debug!(
                "{animation}: rotation of '{}' inverted at frame {}",
                bone.name,
                key.frame_index
            );
        }
        let rotation = bone.rest.rotation + cfg.angle_unit.from_radians(key.rotation);
        rot_z.push_linear(time, direction * rotation);

        let depth = cfg.to_engine_units(key.z as f32);
        for ch in &mut channels {
            ch.x.push(key.frame_index, ch.base[0]);
            ch.y.push(key.frame_index, ch.base[1]);
            ch.z.push(key.frame_index, ch.base[2] - depth);
            let visible = ch.attachment.is_displayed(key.display_index);
            ch.active.push_step(time, if visible { 1.0 } else { 0.0 });
        }
    }

    let bone_path = armature.bone_path(bone.id);
    let mut set = BakedCurveSet::new();
    set.push(CurveBinding::new(bone_path.clone(), CurveProperty::PositionX, pos_x));
    set.push(CurveBinding::new(bone_path.clone(), CurveProperty::PositionY, pos_y));
    set.push(CurveBinding::new(bone_path.clone(), CurveProperty::ScaleX, scale_x));
    set.push(CurveBinding::new(bone_path.clone(), CurveProperty::ScaleY, scale_y));
    set.push(CurveBinding::new(bone_path, CurveProperty::RotationZ, rot_z));

    for ch in channels {
        let path = ch.path;
        for (property, curve) in [
            (CurveProperty::PositionX, ch.x.into_curve()),
            (CurveProperty::PositionY, ch.y.into_curve()),
            (CurveProperty::PositionZ, ch.z.into_curve()),
            (CurveProperty::Active, ch.active),
        ] {
            set.push(CurveBinding::new(path.clone(), property, curve));
        }
    }

    (set, diag)
}

/// Bake every track of `anim`, one curve set per track in declaration order.
///
/// The inversion timeline is built for the whole animation before any track
/// is baked. With `cfg.parallel` the tracks are baked on the rayon pool; the
/// result order does not change.
pub fn bake_animation(
    armature: &Armature,
    anim: &AnimationDoc,
    cfg: &ConvertConfig,
) -> (Vec<BakedCurveSet>, Diagnostics) {
    let timeline = InversionTimeline::track(anim);
    log::debug!(
        "animation '{}': {} tracks, {} mirrored bones",
        anim.name,
        anim.tracks.len(),
        timeline.len()
    );

    let bake = |track: &BoneTrack| bake_track(armature, &timeline, &anim.name, track, cfg);
    let per_track: Vec<(BakedCurveSet, Diagnostics)> = if cfg.parallel {
        anim.tracks.par_iter().map(bake).collect()
    } else {
        anim.tracks.iter().map(bake).collect()
    };

    let mut sets = Vec::with_capacity(per_track.len());
    let mut diag = Diagnostics::new();
    for (set, track_diag) in per_track {
        sets.push(set);
        diag.merge(track_diag);
    }
    (sets, diag)
}
