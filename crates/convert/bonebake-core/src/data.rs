//! Canonical input documents.
//!
//! These are what a loader hands the core: already-parsed armature, atlas and
//! animation data. Units are the exporter's (pixels, radians); conversion to
//! engine units happens in the armature builder and the baker.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Authored transform relative to the parent node.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransformDoc {
    pub position: Vec2,
    pub scale: Vec2,
    /// Radians about the depth axis.
    pub rotation: f32,
}

impl Default for TransformDoc {
    fn default() -> Self {
        Self {
            position: Vec2::default(),
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

/// A display slot on a bone. Its slot index is its position in the bone's list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttachmentDoc {
    /// Sprite name, matched against atlas slice names.
    pub name: String,
    #[serde(default)]
    pub transform: TransformDoc,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneDoc {
    pub name: String,
    /// Empty for bones attached to the armature root.
    #[serde(default)]
    pub parent: String,
    /// Slot shown in the rest pose; negative hides every slot.
    #[serde(default)]
    pub display_index: i32,
    /// Draw order.
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub transform: TransformDoc,
    #[serde(default)]
    pub attachments: Vec<AttachmentDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArmatureDoc {
    pub name: String,
    pub bones: Vec<BoneDoc>,
}

/// One packed sprite, bottom-left pixel origin.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpriteRecord {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AtlasDoc {
    /// Sheet height in pixels.
    pub sheet_height: i32,
    pub sprites: Vec<SpriteRecord>,
}

/// Tween settings of a keyframe. Carried through unchanged; the baker samples
/// keyframes as authored.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tween {
    pub easing: i32,
    pub tween_frame: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub frame_index: u32,
    /// Active slot for this frame.
    #[serde(default)]
    pub display_index: i32,
    /// Offset from the bone's rest position, source units.
    #[serde(default)]
    pub position: Vec2,
    /// Absolute scale; negative components mirror the bone.
    #[serde(default = "one")]
    pub scale: Vec2,
    /// Offset from the bone's rest rotation, radians.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub tween: Option<Tween>,
}

fn one() -> Vec2 {
    Vec2::ONE
}

impl Keyframe {
    /// Keyframe at `frame_index` with identity scale and no offsets.
    pub fn at(frame_index: u32) -> Self {
        Self {
            frame_index,
            display_index: 0,
            position: Vec2::default(),
            scale: Vec2::ONE,
            rotation: 0.0,
            z: 0,
            tween: None,
        }
    }

    /// True when either scale component is negative.
    pub fn is_mirrored(&self) -> bool {
        self.scale.x < 0.0 || self.scale.y < 0.0
    }
}

/// Keyframes of one bone. Order is declaration order, not necessarily sorted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneTrack {
    pub bone: String,
    pub keyframes: Vec<Keyframe>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationDoc {
    pub name: String,
    #[serde(default)]
    pub looping: bool,
    /// Authored duration in frames; 0 when the exporter left it out.
    #[serde(default)]
    pub duration_frames: u32,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationDoc {
    /// Highest frame index used by any keyframe.
    pub fn last_frame(&self) -> Option<u32> {
        self.tracks
            .iter()
            .flat_map(|t| t.keyframes.iter().map(|k| k.frame_index))
            .max()
    }
}

/// Everything read from one export file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportDoc {
    pub armature: Option<ArmatureDoc>,
    /// `None` when the export has no animation set at all.
    pub animations: Option<Vec<AnimationDoc>>,
    /// Atlas config files the export refers to (`config_file_path`).
    #[serde(default)]
    pub config_files: Vec<String>,
    /// Atlas textures the export refers to (`config_png_path`).
    #[serde(default)]
    pub texture_files: Vec<String>,
}
