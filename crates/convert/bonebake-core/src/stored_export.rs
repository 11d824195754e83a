use serde::Deserialize;

use crate::data::{
    AnimationDoc, ArmatureDoc, AtlasDoc, AttachmentDoc, BoneDoc, BoneTrack, ExportDoc, Keyframe,
    SpriteRecord, TransformDoc, Tween, Vec2,
};
use crate::error::LoadError;

/// Public API: parse a Cocos Studio `.ExportJson` file into canonical documents (data.rs).
///
/// Notes:
/// - Only the first `armature_data` and `animation_data` entries are read, as the exporter
///   writes exactly one of each. When either is absent the document stays `None` and the
///   converter reports it as missing input. An animation set without movements is `Some(vec![])`.
/// - Skew `kX` is ignored; `kY` is the rotation in radians.
/// - Each display keeps its first `skin_data` entry as its rest transform.
/// - Scale fields default to 1 when omitted.
pub fn parse_export_json(s: &str) -> Result<ExportDoc, LoadError> {
    let raw: RawExport = serde_json::from_str(s).map_err(LoadError::Export)?;

    let armature = raw.armature_data.into_iter().next().map(|a| ArmatureDoc {
        name: a.name,
        bones: a.bone_data.into_iter().map(to_bone_doc).collect(),
    });

    let animations = raw
        .animation_data
        .into_iter()
        .next()
        .map(|a| a.mov_data.into_iter().map(to_animation_doc).collect());

    Ok(ExportDoc {
        armature,
        animations,
        config_files: raw.config_file_path,
        texture_files: raw.config_png_path,
    })
}

/// Public API: parse atlas metadata JSON (`{ "height": H, "frames": [...] }`) into an [`AtlasDoc`].
///
/// Frame coordinates are bottom-left origin pixels, as written by the atlas packer.
pub fn parse_atlas_json(s: &str) -> Result<AtlasDoc, LoadError> {
    let raw: RawAtlas = serde_json::from_str(s).map_err(LoadError::Atlas)?;
    Ok(AtlasDoc {
        sheet_height: raw.height,
        sprites: raw
            .frames
            .into_iter()
            .map(|f| SpriteRecord {
                name: f.name,
                x: f.x,
                y: f.y,
                width: f.width,
                height: f.height,
                offset_x: f.offset_x as f32,
                offset_y: f.offset_y as f32,
            })
            .collect(),
    })
}

fn to_bone_doc(b: RawBone) -> BoneDoc {
    BoneDoc {
        name: b.name,
        parent: b.parent.unwrap_or_default(),
        display_index: b.d_i,
        z: b.z,
        transform: transform(b.x, b.y, b.c_x, b.c_y, b.k_y),
        attachments: b
            .display_data
            .into_iter()
            .map(|d| AttachmentDoc {
                transform: d
                    .skin_data
                    .first()
                    .map(|s| transform(s.x, s.y, s.c_x, s.c_y, s.k_y))
                    .unwrap_or_default(),
                name: d.name,
            })
            .collect(),
    }
}

fn to_animation_doc(m: RawMovement) -> AnimationDoc {
    AnimationDoc {
        name: m.name,
        looping: m.lp,
        duration_frames: m.dr.max(0) as u32,
        tracks: m
            .mov_bone_data
            .into_iter()
            .map(|t| BoneTrack {
                bone: t.name,
                keyframes: t.frame_data.into_iter().map(to_keyframe).collect(),
            })
            .collect(),
    }
}

fn to_keyframe(f: RawFrame) -> Keyframe {
    let tween = if f.tw_e.is_some() || f.tween_frame.is_some() {
        Some(Tween {
            easing: f.tw_e.unwrap_or_default(),
            tween_frame: f.tween_frame.unwrap_or_default(),
        })
    } else {
        None
    };
    Keyframe {
        frame_index: f.fi,
        display_index: f.d_i,
        position: Vec2::new(f.x as f32, f.y as f32),
        scale: Vec2::new(f.c_x as f32, f.c_y as f32),
        rotation: f.k_y as f32,
        z: f.z,
        tween,
    }
}

fn transform(x: f64, y: f64, c_x: f64, c_y: f64, k_y: f64) -> TransformDoc {
    TransformDoc {
        position: Vec2::new(x as f32, y as f32),
        scale: Vec2::new(c_x as f32, c_y as f32),
        rotation: k_y as f32,
    }
}

fn unit() -> f64 {
    1.0
}

// ----- ExportJson schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawExport {
    #[serde(default)]
    armature_data: Vec<RawArmature>,
    #[serde(default)]
    animation_data: Vec<RawAnimationSet>,
    #[serde(default)]
    config_file_path: Vec<String>,
    #[serde(default)]
    config_png_path: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawArmature {
    name: String,
    #[serde(default)]
    bone_data: Vec<RawBone>,
}

#[derive(Debug, Deserialize)]
struct RawBone {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default, rename = "dI")]
    d_i: i32,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    z: i32,
    #[serde(default = "unit", rename = "cX")]
    c_x: f64,
    #[serde(default = "unit", rename = "cY")]
    c_y: f64,
    #[serde(default, rename = "kY")]
    k_y: f64,
    #[serde(default)]
    display_data: Vec<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    name: String,
    #[serde(default)]
    skin_data: Vec<RawSkin>,
}

#[derive(Debug, Deserialize)]
struct RawSkin {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default = "unit", rename = "cX")]
    c_x: f64,
    #[serde(default = "unit", rename = "cY")]
    c_y: f64,
    #[serde(default, rename = "kY")]
    k_y: f64,
}

#[derive(Debug, Deserialize)]
struct RawAnimationSet {
    #[serde(default)]
    mov_data: Vec<RawMovement>,
}

#[derive(Debug, Deserialize)]
struct RawMovement {
    name: String,
    #[serde(default)]
    dr: i32,
    #[serde(default)]
    lp: bool,
    #[serde(default)]
    mov_bone_data: Vec<RawBoneMovement>,
}

#[derive(Debug, Deserialize)]
struct RawBoneMovement {
    name: String,
    #[serde(default)]
    frame_data: Vec<RawFrame>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    fi: u32,
    #[serde(default, rename = "dI")]
    d_i: i32,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    z: i32,
    #[serde(default = "unit", rename = "cX")]
    c_x: f64,
    #[serde(default = "unit", rename = "cY")]
    c_y: f64,
    #[serde(default, rename = "kY")]
    k_y: f64,
    #[serde(default, rename = "twE")]
    tw_e: Option<i32>,
    #[serde(default, rename = "tweenFrame")]
    tween_frame: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawAtlas {
    height: i32,
    #[serde(default)]
    frames: Vec<RawAtlasFrame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAtlasFrame {
    name: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    offset_x: f64,
    #[serde(default)]
    offset_y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_leave_documents_empty() {
        let doc = parse_export_json("{}").unwrap();
        assert!(doc.armature.is_none());
        assert!(doc.animations.is_none());
    }

    #[test]
    fn animation_set_without_movements_is_present_but_empty() {
        let doc = parse_export_json(r#"{ "animation_data": [{ "name": "a" }] }"#).unwrap();
        assert_eq!(doc.animations, Some(Vec::new()));

        let doc = parse_export_json(r#"{ "animation_data": [] }"#).unwrap();
        assert!(doc.animations.is_none());
    }

    #[test]
    fn omitted_scale_defaults_to_one() {
        let doc = parse_export_json(
            r#"{ "armature_data": [{ "name": "a", "bone_data": [{ "name": "b", "x": 5 }] }] }"#,
        )
        .unwrap();
        let bone = &doc.armature.unwrap().bones[0];
        assert_eq!(bone.transform.scale, Vec2::ONE);
        assert_eq!(bone.transform.position.x, 5.0);
        assert_eq!(bone.parent, "");
    }

    #[test]
    fn malformed_atlas_is_reported() {
        let err = parse_atlas_json("{ \"frames\": [] }").unwrap_err();
        assert!(matches!(err, LoadError::Atlas(_)));
    }
}
