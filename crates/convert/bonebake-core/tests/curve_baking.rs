use bonebake_core::baking::rotation_direction;
use bonebake_core::{
    bake_animation, AnimationDoc, Armature, ArmatureDoc, AttachmentDoc, BakedCurveSet, BoneDoc,
    BoneTrack, ConvertConfig, CurveProperty, Diagnostics, Interpolation, InversionTimeline,
    Keyframe, PixelRect, SliceTable, SpriteSlice, TransformDoc, Vec2, Warning,
};

const HAND: &str = "root/arm/hand";
const SLOT0: &str = "root/arm/hand/a0.png/0";
const SLOT1: &str = "root/arm/hand/a1.png/1";

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn bone(name: &str, parent: &str, x: f32, y: f32) -> BoneDoc {
    BoneDoc {
        name: name.to_string(),
        parent: parent.to_string(),
        display_index: 0,
        z: 0,
        transform: TransformDoc {
            position: Vec2::new(x, y),
            ..TransformDoc::default()
        },
        attachments: Vec::new(),
    }
}

/// root (50, -20, scale 2) -> arm (10, 0) -> hand [a0.png, a1.png]; root -> bare
fn rig() -> Armature {
    let mut root = bone("root", "", 50.0, -20.0);
    root.transform.scale = Vec2::new(2.0, 2.0);
    let mut hand = bone("hand", "arm", 0.0, 0.0);
    hand.attachments = ["a0.png", "a1.png"]
        .iter()
        .map(|name| AttachmentDoc {
            name: name.to_string(),
            transform: TransformDoc::default(),
        })
        .collect();
    let doc = ArmatureDoc {
        name: "rig".into(),
        bones: vec![
            root,
            bone("arm", "root", 10.0, 0.0),
            hand,
            bone("bare", "root", 0.0, 0.0),
        ],
    };

    let mut slices = SliceTable::new();
    for name in ["a0.png", "a1.png"] {
        slices.insert(SpriteSlice {
            name: name.into(),
            rect: PixelRect {
                x: 0,
                y: 0,
                width: 8,
                height: 8,
            },
            pivot: Vec2::default(),
        });
    }
    let mut diag = Diagnostics::new();
    let armature = Armature::build(&doc, &slices, &ConvertConfig::default(), &mut diag);
    assert!(diag.is_empty());
    armature
}

fn anim(tracks: Vec<BoneTrack>) -> AnimationDoc {
    AnimationDoc {
        name: "clip".into(),
        looping: true,
        duration_frames: 60,
        tracks,
    }
}

fn track(bone: &str, keys: Vec<Keyframe>) -> BoneTrack {
    BoneTrack {
        bone: bone.to_string(),
        keyframes: keys,
    }
}

fn bake(doc: &AnimationDoc) -> (BakedCurveSet, Diagnostics) {
    let (sets, diag) = bake_animation(&rig(), doc, &ConvertConfig::default());
    let mut merged = BakedCurveSet::new();
    for set in sets {
        merged.extend(set);
    }
    (merged, diag)
}

fn keys_of(set: &BakedCurveSet, path: &str, prop: CurveProperty) -> Vec<(f32, f32)> {
    set.get(path, prop)
        .unwrap_or_else(|| panic!("missing curve {path} {prop:?}"))
        .keys
        .iter()
        .map(|k| (k.time, k.value))
        .collect()
}

#[test]
fn position_is_rest_plus_delta_over_scale_factor() {
    let keys = [(0, 0.0, 0.0), (30, 25.0, -40.0), (60, 100.0, 100.0)]
        .into_iter()
        .map(|(fi, x, y)| Keyframe {
            position: Vec2::new(x, y),
            ..Keyframe::at(fi)
        })
        .collect();
    let (set, diag) = bake(&anim(vec![track("root", keys)]));
    assert!(diag.is_empty());

    let xs = keys_of(&set, "root", CurveProperty::PositionX);
    let ys = keys_of(&set, "root", CurveProperty::PositionY);
    let expected_times = [0.0, 0.5, 1.0];
    let expected_x = [0.5, 0.75, 1.5];
    let expected_y = [-0.2, -0.6, 0.8];
    for i in 0..3 {
        assert_eq!(xs[i].0, expected_times[i]);
        approx(xs[i].1, expected_x[i], 1e-6);
        approx(ys[i].1, expected_y[i], 1e-6);
    }
}

#[test]
fn scale_is_the_keyframe_value_not_composed_with_rest() {
    let key = Keyframe {
        scale: Vec2::new(0.5, 3.0),
        ..Keyframe::at(0)
    };
    let (set, _) = bake(&anim(vec![track("root", vec![key])]));
    assert_eq!(keys_of(&set, "root", CurveProperty::ScaleX), [(0.0, 0.5)]);
    assert_eq!(keys_of(&set, "root", CurveProperty::ScaleY), [(0.0, 3.0)]);
}

#[test]
fn rotation_flips_while_an_ancestor_is_mirrored() {
    let root_keys = [(0, 1.0), (10, -1.0), (30, 1.0)]
        .into_iter()
        .map(|(fi, sx)| Keyframe {
            scale: Vec2::new(sx, 1.0),
            rotation: 0.2,
            ..Keyframe::at(fi)
        })
        .collect();
    let arm_keys = [0, 20, 40]
        .into_iter()
        .map(|fi| Keyframe {
            rotation: 0.1,
            ..Keyframe::at(fi)
        })
        .collect();
    let (set, _) = bake(&anim(vec![
        track("arm", arm_keys),
        track("root", root_keys),
    ]));

    let deg = 0.1f32.to_degrees();
    let arm = keys_of(&set, "root/arm", CurveProperty::RotationZ);
    approx(arm[0].1, deg, 1e-4);
    approx(arm[1].1, -deg, 1e-4);
    approx(arm[2].1, deg, 1e-4);

    // The mirrored bone itself is not corrected.
    for (_, value) in keys_of(&set, "root", CurveProperty::RotationZ) {
        approx(value, 0.2f32.to_degrees(), 1e-4);
    }
}

#[test]
fn nested_mirrored_ancestors_do_not_cancel() {
    let mirrored = || Keyframe {
        scale: Vec2::new(-1.0, 1.0),
        ..Keyframe::at(0)
    };
    let doc = anim(vec![
        track("root", vec![mirrored()]),
        track("arm", vec![mirrored()]),
        track(
            "hand",
            vec![Keyframe {
                rotation: 0.5,
                ..Keyframe::at(0)
            }],
        ),
    ]);
    let armature = rig();
    let timeline = InversionTimeline::track(&doc);
    let hand = armature.find("hand").unwrap();
    assert_eq!(rotation_direction(&armature, hand.id, &timeline, 0), -1.0);

    let (set, _) = bake(&doc);
    approx(
        keys_of(&set, HAND, CurveProperty::RotationZ)[0].1,
        -(0.5f32.to_degrees()),
        1e-4,
    );
}

#[test]
fn attachment_depth_holds_until_one_frame_before_a_change() {
    let keys = vec![
        Keyframe::at(0),
        Keyframe {
            z: 5,
            ..Keyframe::at(30)
        },
    ];
    let (set, _) = bake(&anim(vec![track("hand", keys)]));

    let z = keys_of(&set, SLOT0, CurveProperty::PositionZ);
    assert_eq!(z.len(), 3);
    assert_eq!(z[0], (0.0, 0.0));
    approx(z[1].0, 29.0 / 60.0, 1e-6);
    assert_eq!(z[1].1, 0.0);
    assert_eq!(z[2].0, 0.5);
    approx(z[2].1, -0.05, 1e-6);

    let x = keys_of(&set, SLOT0, CurveProperty::PositionX);
    assert_eq!(x.len(), 3);
    assert!(x.iter().all(|(_, v)| *v == 0.0));
}

#[test]
fn depth_change_on_a_repeated_frame_zero_holds_at_time_zero() {
    let keys = vec![
        Keyframe::at(0),
        Keyframe {
            z: 2,
            ..Keyframe::at(0)
        },
    ];
    let (set, _) = bake(&anim(vec![track("hand", keys)]));
    let z = keys_of(&set, SLOT0, CurveProperty::PositionZ);
    assert_eq!(z.len(), 3);
    assert_eq!(z[0], (0.0, 0.0));
    assert_eq!(z[1], (0.0, 0.0));
    assert_eq!(z[2].0, 0.0);
    approx(z[2].1, -0.02, 1e-6);
}

#[test]
fn visibility_is_a_step_curve_per_slot() {
    let key = Keyframe {
        display_index: 1,
        ..Keyframe::at(10)
    };
    let (set, _) = bake(&anim(vec![track("hand", vec![key])]));

    let slot0 = set.get(SLOT0, CurveProperty::Active).unwrap();
    let slot1 = set.get(SLOT1, CurveProperty::Active).unwrap();
    assert_eq!(slot0.len(), 1);
    assert_eq!(slot1.len(), 1);
    approx(slot0.keys[0].time, 10.0 / 60.0, 1e-6);
    assert_eq!(slot0.keys[0].value, 0.0);
    assert_eq!(slot1.keys[0].value, 1.0);
    assert_eq!(slot0.keys[0].interpolation, Interpolation::Step);
    assert_eq!(slot1.keys[0].interpolation, Interpolation::Step);
}

#[test]
fn negative_display_index_hides_every_slot() {
    let key = Keyframe {
        display_index: -1,
        ..Keyframe::at(0)
    };
    let (set, _) = bake(&anim(vec![track("hand", vec![key])]));
    assert_eq!(keys_of(&set, SLOT0, CurveProperty::Active), [(0.0, 0.0)]);
    assert_eq!(keys_of(&set, SLOT1, CurveProperty::Active), [(0.0, 0.0)]);
}

#[test]
fn bone_without_attachments_gets_only_bone_curves() {
    let (set, _) = bake(&anim(vec![track("bare", vec![Keyframe::at(0)])]));
    let props: Vec<CurveProperty> = set.iter().map(|b| b.property).collect();
    assert_eq!(
        props,
        [
            CurveProperty::PositionX,
            CurveProperty::PositionY,
            CurveProperty::ScaleX,
            CurveProperty::ScaleY,
            CurveProperty::RotationZ,
        ]
    );
    assert!(set.iter().all(|b| b.path == "root/bare"));
}

#[test]
fn single_keyframe_yields_single_key_curves() {
    let (set, _) = bake(&anim(vec![track("hand", vec![Keyframe::at(12)])]));
    assert_eq!(set.len(), 5 + 2 * 4);
    for binding in set.iter() {
        assert_eq!(binding.curve.len(), 1, "{} {:?}", binding.path, binding.property);
        approx(binding.curve.keys[0].time, 0.2, 1e-6);
    }
}

#[test]
fn duplicate_frame_indices_are_kept_in_encounter_order() {
    let keys = vec![
        Keyframe {
            position: Vec2::new(0.0, 0.0),
            ..Keyframe::at(10)
        },
        Keyframe {
            position: Vec2::new(100.0, 0.0),
            ..Keyframe::at(10)
        },
    ];
    let (set, _) = bake(&anim(vec![track("root", keys)]));
    let xs = keys_of(&set, "root", CurveProperty::PositionX);
    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].0, xs[1].0);
    approx(xs[0].1, 0.5, 1e-6);
    approx(xs[1].1, 1.5, 1e-6);
}

#[test]
fn empty_track_yields_empty_curves_and_a_warning() {
    let (set, diag) = bake(&anim(vec![track("hand", Vec::new())]));
    assert_eq!(set.len(), 5 + 2 * 4);
    assert!(set.iter().all(|b| b.curve.is_empty()));
    assert_eq!(
        diag.warnings,
        vec![Warning::EmptyTrack {
            animation: "clip".into(),
            bone: "hand".into()
        }]
    );
}

#[test]
fn unknown_bone_track_is_skipped() {
    let (set, diag) = bake(&anim(vec![
        track("ghost", vec![Keyframe::at(0)]),
        track("bare", vec![Keyframe::at(0)]),
    ]));
    assert_eq!(set.len(), 5);
    assert_eq!(
        diag.warnings,
        vec![Warning::UnknownTrackBone {
            animation: "clip".into(),
            bone: "ghost".into()
        }]
    );
}

#[test]
fn parallel_baking_matches_sequential() {
    let doc = anim(vec![
        track("root", vec![Keyframe::at(0), Keyframe::at(30)]),
        track("hand", vec![Keyframe::at(0), Keyframe { z: 2, ..Keyframe::at(15) }]),
        track("ghost", vec![Keyframe::at(0)]),
        track("bare", vec![Keyframe::at(5)]),
    ]);
    let armature = rig();
    let sequential = bake_animation(&armature, &doc, &ConvertConfig::default());
    let parallel = bake_animation(
        &armature,
        &doc,
        &ConvertConfig {
            parallel: true,
            ..ConvertConfig::default()
        },
    );
    assert_eq!(sequential, parallel);
    assert_eq!(sequential, bake_animation(&armature, &doc, &ConvertConfig::default()));
}
