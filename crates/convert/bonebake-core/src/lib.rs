//! Bonebake core (engine-agnostic)
//!
//! Converts a Cocos Studio armature export into a sliced texture atlas, a rest
//! pose, and one baked clip of scalar curves per animation. The pipeline runs
//! atlas slicing, armature building, inversion tracking, curve baking and clip
//! assembly in that order; see [`Converter`] for the driver.

pub mod armature;
pub mod atlas;
pub mod baking;
pub mod clip;
pub mod config;
pub mod convert;
pub mod curve;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod inversion;
pub mod sampling;
pub mod stored_export;

// Re-exports for consumers (importers, editors, tests)
pub use armature::{Armature, Attachment, Bone, LocalTransform, RestNode, RestNodeKind, RestPose};
pub use atlas::{PixelRect, SliceTable, SpriteSlice};
pub use baking::{bake_animation, bake_track, BakedCurveSet};
pub use clip::{AnimationClip, ClipSink, JsonDirSink, MemorySink};
pub use config::{AngleUnit, ConvertConfig};
pub use convert::{BakeOutput, ConversionReport, ConvertInput, Converter};
pub use curve::{
    Curve, CurveBinding, CurveKey, CurveProperty, CurveTarget, HeldChannel, Interpolation,
};
pub use data::{
    AnimationDoc, ArmatureDoc, AtlasDoc, AttachmentDoc, BoneDoc, BoneTrack, ExportDoc, Keyframe,
    SpriteRecord, TransformDoc, Tween, Vec2,
};
pub use diagnostics::{Diagnostics, Warning};
pub use error::{AtlasError, ConvertError, LoadError, SinkError};
pub use ids::BoneId;
pub use inversion::InversionTimeline;
pub use sampling::sample_curve;
pub use stored_export::{parse_atlas_json, parse_export_json};
