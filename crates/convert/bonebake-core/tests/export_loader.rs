use bonebake_core::{parse_atlas_json, parse_export_json, LoadError, Tween, Vec2};
use bonebake_test_fixtures as fixtures;

#[test]
fn walker_export_fields() {
    let doc = parse_export_json(&fixtures::exports::json("walker").unwrap()).unwrap();
    assert_eq!(doc.config_files, ["walker0.plist"]);
    assert_eq!(doc.texture_files, ["walker0.png"]);

    let armature = doc.armature.expect("armature_data");
    assert_eq!(armature.name, "walker");
    let names: Vec<&str> = armature.bones.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["body", "arm", "hand", "head", "tail"]);

    let arm = &armature.bones[1];
    assert_eq!(arm.parent, "body");
    assert_eq!(arm.z, 1);
    assert_eq!(arm.transform.position, Vec2::new(30.0, 40.0));
    assert_eq!(arm.transform.rotation, 0.5);
    assert_eq!(arm.attachments[0].name, "arm.png");
    assert_eq!(arm.attachments[0].transform.position, Vec2::new(5.0, -10.0));

    let tail = &armature.bones[4];
    assert_eq!(tail.display_index, -1);
    assert!(tail.attachments.is_empty());
}

#[test]
fn walker_animations() {
    let doc = parse_export_json(&fixtures::exports::json("walker").unwrap()).unwrap();
    let animations = doc.animations.expect("animation_data");
    let names: Vec<&str> = animations.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["wave", "idle"]);

    let wave = &animations[0];
    assert!(wave.looping);
    assert_eq!(wave.duration_frames, 60);
    assert_eq!(wave.tracks.len(), 5);

    let body = &wave.tracks[0].keyframes;
    assert!(body[1].is_mirrored());
    assert_eq!(
        body[0].tween,
        Some(Tween {
            easing: 0,
            tween_frame: true
        })
    );
    assert_eq!(wave.tracks[1].keyframes[0].tween, None);
    assert_eq!(wave.tracks[2].keyframes[1].display_index, 1);
    assert!(wave.tracks[3].keyframes.is_empty());

    let idle = &animations[1];
    assert!(!idle.looping);
    assert_eq!(idle.duration_frames, 0);
    assert_eq!(idle.last_frame(), Some(40));
}

#[test]
fn walker_atlas_fields() {
    let doc = parse_atlas_json(&fixtures::atlases::json("walker").unwrap()).unwrap();
    assert_eq!(doc.sheet_height, 256);
    assert_eq!(doc.sprites.len(), 5);
    let body = &doc.sprites[0];
    assert_eq!(body.name, "body.png");
    assert_eq!((body.width, body.height), (64, 96));
    assert_eq!((body.offset_x, body.offset_y), (2.0, -4.0));
}

#[test]
fn truncated_export_is_a_load_error() {
    let err = parse_export_json("{ \"armature_data\": [").unwrap_err();
    assert!(matches!(err, LoadError::Export(_)));
}
